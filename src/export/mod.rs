//! Export pipeline: still-image encoders and the recording sinks.

/// PNG and JPEG byte encoding.
pub mod encode;
/// MP4 encoding through the system `ffmpeg` binary.
pub mod ffmpeg;
/// The `FrameSink` contract and the in-memory sink.
pub mod sink;
