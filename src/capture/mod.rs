//! Camera capture: frame sources, the sampler, pre-roll buffering, and the
//! countdown/capture state machine.

/// Webcam source behind the `camera` cargo feature.
#[cfg(all(
    feature = "camera",
    any(target_os = "windows", target_os = "macos", target_os = "linux")
))]
pub mod camera;
/// Bounded pre-roll frame buffer.
pub mod preroll;
/// Crop/filter/scale frame sampler.
pub mod sampler;
/// Session value object and the capture state machine.
pub mod session;
/// The `FrameSource` seam and the synthetic test source.
pub mod source;
