//! Parallel execution over an integer range.

use rayon::prelude::*;

use crate::limits::{MAX_GRAIN_SIZE, MIN_GRAIN_SIZE};

/// Picks a chunk size for `n_samples` items spread over the rayon pool.
///
/// ```text
/// grain = clamp(n_samples / threads, min_grain, max_grain)
/// ```
pub fn grain_size(n_samples: usize, min_grain: usize, max_grain: usize) -> usize {
    let threads = rayon::current_num_threads().max(1);
    let per_thread = n_samples / threads;
    if per_thread < min_grain {
        return min_grain;
    }
    if per_thread > max_grain {
        return max_grain;
    }
    per_thread
}

/// [`grain_size`] with the crate's default bounds.
pub fn default_grain_size(n_samples: usize) -> usize {
    grain_size(n_samples, MIN_GRAIN_SIZE, MAX_GRAIN_SIZE)
}

/// Runs `f(start, end)` over `[0, n)` split into chunks of at most `grain`.
///
/// Chunks run concurrently on the rayon pool and together cover every index
/// exactly once. Returns after all chunks have finished. A `grain` of 0 is
/// treated as 1.
pub fn parallel_for<F>(n: usize, grain: usize, f: F)
where
    F: Fn(usize, usize) + Send + Sync,
{
    let grain = grain.max(1);
    let chunks = n.div_ceil(grain);
    (0..chunks).into_par_iter().for_each(|chunk| {
        let start = chunk * grain;
        let end = (start + grain).min(n);
        f(start, end);
    });
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_covers_every_index_once() {
        let n = 1003;
        let hits: Vec<AtomicUsize> = (0..n).map(|_| AtomicUsize::new(0)).collect();
        parallel_for(n, 17, |start, end| {
            for hit in &hits[start..end] {
                hit.fetch_add(1, Ordering::Relaxed);
            }
        });
        assert!(hits.iter().all(|h| h.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn test_chunk_bounds() {
        let chunks = Mutex::new(Vec::new());
        parallel_for(10, 4, |start, end| chunks.lock().unwrap().push((start, end)));
        let mut chunks = chunks.into_inner().unwrap();
        chunks.sort();
        assert_eq!(chunks, vec![(0, 4), (4, 8), (8, 10)]);
    }

    #[test]
    fn test_empty_range() {
        let calls = AtomicUsize::new(0);
        parallel_for(0, 8, |_, _| {
            calls.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_zero_grain() {
        let calls = AtomicUsize::new(0);
        parallel_for(5, 0, |start, end| {
            assert_eq!(end - start, 1);
            calls.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(calls.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_grain_size_clamped() {
        assert_eq!(grain_size(0, 4, 64), 4);
        assert_eq!(grain_size(usize::MAX, 4, 64), 64);
        let g = grain_size(10_000, 1, 10_000);
        assert_eq!(g, 10_000 / rayon::current_num_threads());
        assert!((MIN_GRAIN_SIZE..=MAX_GRAIN_SIZE).contains(&default_grain_size(1 << 20)));
    }
}
