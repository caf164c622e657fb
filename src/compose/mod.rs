//! The deterministic strip compositor: pixel primitives, tone math, filter
//! presets, stickers, footer text, and the static and animated render paths.

/// Animated (looping video) render path.
pub mod animate;
/// Capture filter presets and color matrices.
pub mod filter;
/// CPU drawing primitives.
pub mod raster;
/// Composition parameter model.
pub mod spec;
/// Sticker decoding and stamping.
pub mod sticker;
/// Static strip render path.
pub mod strip;
/// Footer text rasterization.
pub mod text;
/// Tone knobs, normalization, and overlay derivation.
pub mod tone;
