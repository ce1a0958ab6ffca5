//! Format constants and default limits.

/// Appended to a type key when the value was registered by reference.
pub const REFERENCE_MARKER: char = '*';

/// Separates the namespace from the type name in a type key.
pub const NAMESPACE_SEPARATOR: char = '/';

/// Default maximum envelope size produced or accepted by the codec (64 MiB).
pub const MAX_ENVELOPE_SIZE: usize = 64 * 1024 * 1024;

/// Smallest chunk handed to a worker by default.
pub const MIN_GRAIN_SIZE: usize = 1;

/// Largest chunk handed to a worker by default.
pub const MAX_GRAIN_SIZE: usize = 1024;
