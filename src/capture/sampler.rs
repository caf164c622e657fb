use image::RgbaImage;

use crate::capture::source::FrameSource;
use crate::compose::filter::FilterPreset;
use crate::compose::raster;
use crate::foundation::error::{BoothError, BoothResult};
use crate::foundation::geom::center_crop;

/// Output resolution for final stills.
pub const STILL_SIZE: (u32, u32) = (1200, 900);
/// Output resolution for pre-roll samples, kept small for memory.
pub const PREROLL_SIZE: (u32, u32) = (360, 270);

/// Which fixed output profile a sample targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleProfile {
    /// A final 1200x900 still.
    Still,
    /// A 360x270 pre-roll frame.
    Preroll,
}

impl SampleProfile {
    /// The profile's fixed output size.
    pub fn output_size(self) -> (u32, u32) {
        match self {
            SampleProfile::Still => STILL_SIZE,
            SampleProfile::Preroll => PREROLL_SIZE,
        }
    }
}

/// Produces one cropped, filtered, fixed-resolution frame from a live source.
///
/// The crop is the largest centered 4:3 window of the source frame; the filter
/// is baked in here and never reapplied downstream. Mirroring defaults to on
/// for both profiles so stills and pre-roll frames always match the mirrored
/// live preview.
#[derive(Clone, Copy, Debug)]
pub struct FrameSampler {
    /// Capture filter baked into every sampled frame.
    pub filter: FilterPreset,
    /// Mirror horizontally. One flag covers stills and pre-roll so the two
    /// can never diverge.
    pub mirror: bool,
    /// Vertical crop bias in [-1, 1] for narrow viewports; 0 is centered.
    pub vertical_bias: f64,
}

impl FrameSampler {
    /// A sampler with the given filter, mirrored, centered crop.
    pub fn new(filter: FilterPreset) -> Self {
        Self {
            filter,
            mirror: true,
            vertical_bias: 0.0,
        }
    }

    /// Sample one frame at the profile's fixed output size.
    pub async fn sample(
        &self,
        source: &mut dyn FrameSource,
        profile: SampleProfile,
    ) -> BoothResult<RgbaImage> {
        source.ready().await?;
        let (src_w, src_h) = source
            .dimensions()
            .ok_or_else(|| BoothError::source_unavailable("source reported no dimensions"))?;
        let (out_w, out_h) = profile.output_size();
        let target_ar = f64::from(out_w) / f64::from(out_h);
        let crop = center_crop(src_w, src_h, target_ar, self.vertical_bias)?;

        let frame = source.read_frame().await?;
        if frame.width() != src_w || frame.height() != src_h {
            return Err(BoothError::source_unavailable(format!(
                "source frame size {}x{} does not match reported {}x{}",
                frame.width(),
                frame.height(),
                src_w,
                src_h
            )));
        }

        let mut out = raster::crop_scale(&frame, crop, out_w, out_h);
        self.filter.matrix().apply(&mut out);
        if self.mirror {
            raster::mirror_in_place(&mut out);
        }
        Ok(out)
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new(FilterPreset::None)
    }
}
