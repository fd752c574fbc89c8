//! Shared foundation: core data model and the crate error taxonomy.

/// Core value types: edit parameters, source rasters, regions, presets.
pub mod core;
/// Crate error taxonomy and result alias.
pub mod error;
