//! LumaBooth is a photobooth capture and composition engine.
//!
//! The crate turns a live frame source into a finished, shareable photostrip in
//! three stages:
//!
//! # Pipeline overview
//!
//! 1. **Capture**: [`CaptureEngine::run_session`] runs a 4-shot countdown session
//!    against a [`FrameSource`], sampling low-res pre-roll frames concurrently
//!    with each countdown and snapping one still per slot.
//! 2. **Compose**: [`render_strip`] (static) and [`render_animation`] (looping
//!    video) paint the fixed-geometry strip: background, cropped slots, tone
//!    filter, temperature/tint overlays, stickers, footer text.
//! 3. **Export**: finished strips encode to PNG or JPEG bytes; animated renders
//!    stream through a [`FrameSink`] (in-memory, or MP4 via the system `ffmpeg`
//!    binary). JPEG bytes can enter the expiring [`ShareStore`].
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic compositing**: rendering the same inputs twice produces
//!   byte-identical pixels; no timestamps or randomness reach the canvas.
//! - **No IO in renderers**: stills, stickers, and fonts are decoded up front
//!   ([`PreparedStickers`], [`FooterFonts`]); render calls are pure CPU work.
//! - **Cooperative cancellation**: every capture suspension point observes one
//!   shared cancellation token; a capture already in flight is never aborted.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod capture;
mod compose;
mod export;
mod foundation;
mod share;

pub use capture::sampler::{FrameSampler, SampleProfile, PREROLL_SIZE, STILL_SIZE};
pub use capture::session::{
    CaptureEngine, CaptureOptions, Countdown, Session, SessionEvent, SessionManifest,
    PREROLL_FPS, PREROLL_MAX_KEPT, SHOTS_PER_SESSION,
};
pub use capture::source::{FrameSource, SyntheticSource};
pub use capture::preroll::PrerollGroup;
#[cfg(all(
    feature = "camera",
    any(target_os = "windows", target_os = "macos", target_os = "linux")
))]
pub use capture::camera::CameraSource;
pub use compose::animate::{render_animation, AnimateOptions, AnimateStats, Pacing};
pub use compose::filter::FilterPreset;
pub use compose::spec::{
    builtin_themes, CompositionSpec, Footer, FontSpec, OutputFormat, StickerPlacement,
    StickerTheme,
};
pub use compose::sticker::PreparedStickers;
pub use compose::strip::{load_slot_image, render_strip};
pub use compose::text::FooterFonts;
pub use compose::tone::{norm, temperature_overlay, tint_overlay, Overlay, ToneTransform};
pub use export::encode::{encode_jpeg, encode_png, SHARE_JPEG_QUALITY};
pub use export::ffmpeg::{is_ffmpeg_on_path, FfmpegSink};
pub use export::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::color::{preset_palette, Color};
pub use foundation::error::{BoothError, BoothResult};
pub use foundation::geom::{center_crop, CropRect, StripGeometry};
pub use share::store::{ShareGetError, ShareReceipt, ShareStore, Shared, SHARE_TTL};
