//! Benchmark for envelope encoding/decoding over a shared registry.
//!
//! Builds a mixed set of polymorphic values, then measures sequential and
//! parallel encode/decode and the size overhead of the envelope versus plain
//! JSON of the concrete values.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use polyreg::util::{default_grain_size, parallel_for};
use polyreg::{AbstractValue, Registry, Shape, decode, encode};
use serde::{Deserialize, Serialize};

// =============================================================================
// PAYLOAD TYPES
// =============================================================================

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Linear {
    weights: Vec<f64>,
    bias: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Huber {
    delta: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Label {
    name: String,
    index: u32,
}

fn build_registry() -> Registry {
    Registry::builder()
        .named::<Linear>("bench", "Linear", Shape::ByReference)
        .named::<Huber>("bench", "Huber", Shape::ByValue)
        .named::<Label>("bench", "Label", Shape::ByValue)
        .build()
}

/// Deterministic mixed workload; no randomness so runs are comparable.
fn make_values(count: usize) -> Vec<AbstractValue> {
    (0..count)
        .map(|i| match i % 3 {
            0 => AbstractValue::by_reference(Linear {
                weights: (0..16).map(|j| (i * 16 + j) as f64 * 0.001).collect(),
                bias: i as f64,
            }),
            1 => AbstractValue::by_value(Huber { delta: 1.0 + i as f64 / 7.0 }),
            _ => AbstractValue::by_value(Label {
                name: format!("label-{i}"),
                index: i as u32,
            }),
        })
        .collect()
}

fn plain_json_len(value: &AbstractValue) -> usize {
    serde_json::to_vec(value.get())
        .expect("Failed to encode plain JSON")
        .len()
}

fn main() {
    let count: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000);

    let registry = build_registry();
    let values = make_values(count);

    println!("=== Setup ===");
    println!("Values: {}", count);
    println!("Registered types: {}", registry.len());
    for key in registry.keys() {
        println!("  {}", key);
    }

    // Benchmark encoding (sequential)
    let encode_start = Instant::now();
    let encoded: Vec<Vec<u8>> = values
        .iter()
        .map(|v| encode(&registry, v).expect("Failed to encode"))
        .collect();
    let encode_time = encode_start.elapsed();
    let total_bytes: usize = encoded.iter().map(Vec::len).sum();

    println!("\nEncode (sequential): {} bytes in {:?}", total_bytes, encode_time);
    println!(
        "  Throughput: {:.2} MB/s",
        (total_bytes as f64 / 1_000_000.0) / encode_time.as_secs_f64()
    );

    // Benchmark encoding (parallel)
    let grain = default_grain_size(count);
    let slots: Vec<OnceLock<Vec<u8>>> = (0..count).map(|_| OnceLock::new()).collect();

    let par_encode_start = Instant::now();
    parallel_for(count, grain, |start, end| {
        for i in start..end {
            let bytes = encode(&registry, &values[i]).expect("Failed to encode");
            assert!(slots[i].set(bytes).is_ok(), "Chunks should not overlap");
        }
    });
    let par_encode_time = par_encode_start.elapsed();

    println!("\nEncode (parallel, grain {}): {:?}", grain, par_encode_time);
    println!(
        "  Speedup vs sequential: {:.1}x",
        encode_time.as_secs_f64() / par_encode_time.as_secs_f64()
    );
    for (slot, sequential) in slots.iter().zip(&encoded) {
        assert_eq!(slot.get(), Some(sequential), "Parallel encoding should match sequential");
    }

    // Benchmark decoding (sequential)
    let decode_start = Instant::now();
    let decoded: Vec<AbstractValue> = encoded
        .iter()
        .map(|b| decode(&registry, b).expect("Failed to decode"))
        .collect();
    let decode_time = decode_start.elapsed();

    println!("\nDecode (sequential): {:?}", decode_time);
    println!(
        "  Throughput: {:.2} MB/s",
        (total_bytes as f64 / 1_000_000.0) / decode_time.as_secs_f64()
    );
    assert_eq!(decoded, values, "Decoded values should match originals");

    // Benchmark decoding (parallel)
    let matched = AtomicUsize::new(0);
    let par_decode_start = Instant::now();
    parallel_for(count, grain, |start, end| {
        for i in start..end {
            let value = decode(&registry, &encoded[i]).expect("Failed to decode");
            if value == values[i] {
                matched.fetch_add(1, Ordering::Relaxed);
            }
        }
    });
    let par_decode_time = par_decode_start.elapsed();

    println!("\nDecode (parallel, grain {}): {:?}", grain, par_decode_time);
    println!(
        "  Speedup vs sequential: {:.1}x",
        decode_time.as_secs_f64() / par_decode_time.as_secs_f64()
    );
    assert_eq!(matched.load(Ordering::Relaxed), count);

    // Summary
    let plain_bytes: usize = values.iter().map(plain_json_len).sum();
    println!("\n=== Summary ===");
    println!(
        "Plain JSON size: {} bytes ({:.1} MB)",
        plain_bytes,
        plain_bytes as f64 / 1_000_000.0
    );
    println!(
        "Envelope size: {} bytes ({:.1} MB)",
        total_bytes,
        total_bytes as f64 / 1_000_000.0
    );
    if plain_bytes > 0 {
        println!(
            "Envelope overhead: {:.1}%",
            100.0 * (total_bytes as f64 - plain_bytes as f64) / plain_bytes as f64
        );
    }
    println!("Registry fingerprint: {:02x?}", registry.fingerprint());
}
