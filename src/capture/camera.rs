//! Webcam frame source over `nokhwa` (cargo feature `camera`).

use async_trait::async_trait;
use image::RgbaImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

use crate::capture::source::FrameSource;
use crate::foundation::error::{BoothError, BoothResult};

/// A live webcam behind the [`FrameSource`] seam.
pub struct CameraSource {
    cam: Camera,
    dimensions: Option<(u32, u32)>,
}

impl CameraSource {
    /// Open camera `index` (0 is the default device) and start streaming at
    /// the device's best available RGB format.
    pub fn open(index: u32) -> BoothResult<Self> {
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| BoothError::source_unavailable(format!("open camera {index}: {e}")))?;
        cam.open_stream()
            .map_err(|e| BoothError::source_unavailable(format!("open camera stream: {e}")))?;
        Ok(Self {
            cam,
            dimensions: None,
        })
    }
}

#[async_trait]
impl FrameSource for CameraSource {
    async fn ready(&mut self) -> BoothResult<()> {
        if self.dimensions.is_some() {
            return Ok(());
        }
        // Camera metadata settles with the first decodable frame.
        let frame = self
            .cam
            .frame()
            .map_err(|e| BoothError::source_unavailable(format!("camera frame: {e}")))?;
        let res = frame.resolution();
        if res.width() == 0 || res.height() == 0 {
            return Err(BoothError::source_unavailable(
                "camera reported zero dimensions",
            ));
        }
        self.dimensions = Some((res.width(), res.height()));
        Ok(())
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    async fn read_frame(&mut self) -> BoothResult<RgbaImage> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| BoothError::source_unavailable(format!("camera frame: {e}")))?;
        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| BoothError::source_unavailable(format!("decode camera frame: {e}")))?;
        Ok(image::DynamicImage::ImageRgb8(rgb).to_rgba8())
    }
}
