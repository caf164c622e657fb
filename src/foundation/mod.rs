//! Shared primitives: error taxonomy, colors, and strip geometry.

/// Color value with hex parsing and the preset palette.
pub mod color;
/// Error taxonomy and crate-wide result alias.
pub mod error;
/// Fixed strip geometry and center-crop math.
pub mod geom;
