use image::RgbaImage;

use crate::foundation::error::{BoothError, BoothResult};

/// Configuration handed to a [`FrameSink`] before any frames are pushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Output frames per second.
    pub fps: u32,
}

/// Recording sink contract for the animated export path.
///
/// `push_frame` is called with strictly increasing frame indices; `end` is
/// called exactly once, including when the render loop exits early with an
/// error, so implementations can always flush their buffered output.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed. A sink that cannot record on
    /// this platform fails here, before any rendering work happens.
    fn begin(&mut self, cfg: SinkConfig) -> BoothResult<()>;
    /// Push one opaque RGBA frame in timeline order.
    fn push_frame(&mut self, idx: u64, frame: &RgbaImage) -> BoothResult<()>;
    /// Called once after the last frame (or after a failed render) to flush.
    fn end(&mut self) -> BoothResult<()>;
}

/// In-memory sink for tests and offline inspection.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, RgbaImage)>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// The captured frames in push order.
    pub fn frames(&self) -> &[(u64, RgbaImage)] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BoothResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(BoothError::validation("sink dimensions must be non-zero"));
        }
        if cfg.fps == 0 {
            return Err(BoothError::validation("sink fps must be non-zero"));
        }
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &RgbaImage) -> BoothResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| BoothError::validation("sink not started"))?;
        if frame.width() != cfg.width || frame.height() != cfg.height {
            return Err(BoothError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(BoothError::validation("out-of-order frame index"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> BoothResult<()> {
        self.ended = true;
        Ok(())
    }
}
