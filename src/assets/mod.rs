//! Source asset handling.

/// Decode uploaded bytes into source rasters.
pub mod decode;
