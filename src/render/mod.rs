//! CPU rendering: target surface, per-region drawing, layout compositing.

/// Fixed layouts and the compositor.
pub mod layout;
/// Single-region rendering.
pub mod region;
/// Owned RGBA8 target canvas.
pub mod surface;
