use async_trait::async_trait;
use image::RgbaImage;

use crate::foundation::error::{BoothError, BoothResult};

/// Object-safe seam over a live video source.
///
/// One reader at a time: a still capture and a pre-roll sample each borrow the
/// source exclusively for the duration of a single `read_frame` call.
#[async_trait]
pub trait FrameSource: Send {
    /// Resolve until the source can report dimensions and serve frames.
    ///
    /// Sources backed by real devices report dimensions only after their
    /// metadata settles; callers must await this before the first read.
    async fn ready(&mut self) -> BoothResult<()>;

    /// Native frame dimensions, once known.
    fn dimensions(&self) -> Option<(u32, u32)>;

    /// Read the source's current frame as straight-alpha RGBA.
    async fn read_frame(&mut self) -> BoothResult<RgbaImage>;
}

/// Deterministic procedural source: a color gradient with a moving bar, so
/// consecutive frames differ and tests can tell them apart.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frame_counter: u32,
}

impl SyntheticSource {
    /// Create a synthetic source with the given native resolution.
    pub fn new(width: u32, height: u32) -> BoothResult<Self> {
        if width == 0 || height == 0 {
            return Err(BoothError::source_unavailable(
                "synthetic source dimensions must be non-zero",
            ));
        }
        Ok(Self {
            width,
            height,
            frame_counter: 0,
        })
    }

    /// Number of frames read so far.
    pub fn frames_read(&self) -> u32 {
        self.frame_counter
    }
}

#[async_trait]
impl FrameSource for SyntheticSource {
    async fn ready(&mut self) -> BoothResult<()> {
        Ok(())
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.width, self.height))
    }

    async fn read_frame(&mut self) -> BoothResult<RgbaImage> {
        let t = self.frame_counter;
        self.frame_counter += 1;
        let (w, h) = (self.width, self.height);
        let bar_x = (t * 7) % w;
        Ok(RgbaImage::from_fn(w, h, move |x, y| {
            if x == bar_x {
                image::Rgba([255, 255, 255, 255])
            } else {
                let r = (x * 255 / w) as u8;
                let g = (y * 255 / h) as u8;
                let b = (t % 256) as u8;
                image::Rgba([r, g, b, 255])
            }
        }))
    }
}
