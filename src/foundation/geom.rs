use crate::foundation::error::{BoothError, BoothResult};

/// Crop window within a source frame, in source pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Window width.
    pub width: u32,
    /// Window height.
    pub height: u32,
}

/// Largest centered rectangle of `target_ar` (width/height) that fits inside
/// `src_w x src_h`.
///
/// When the source is wider than the target the window is cropped left/right;
/// otherwise top/bottom. `vertical_bias` in `[-1, 1]` shifts a top/bottom crop
/// window within the source (-1 = top, 0 = centered, 1 = bottom) and is
/// ignored when there is no vertical slack; the window never leaves source
/// bounds.
pub fn center_crop(
    src_w: u32,
    src_h: u32,
    target_ar: f64,
    vertical_bias: f64,
) -> BoothResult<CropRect> {
    if src_w == 0 || src_h == 0 {
        return Err(BoothError::source_unavailable(
            "source frame has zero dimensions",
        ));
    }
    if !(target_ar.is_finite() && target_ar > 0.0) {
        return Err(BoothError::validation("crop aspect ratio must be positive"));
    }
    if !(-1.0..=1.0).contains(&vertical_bias) {
        return Err(BoothError::validation(
            "crop vertical bias must be in [-1, 1]",
        ));
    }

    let src_ar = f64::from(src_w) / f64::from(src_h);
    if src_ar > target_ar {
        // Height-bound: crop left/right, no vertical slack for the bias.
        let height = src_h;
        let width = ((f64::from(src_h) * target_ar).round() as u32).min(src_w);
        let x = ((f64::from(src_w - width) / 2.0).round() as u32).min(src_w - width);
        Ok(CropRect {
            x,
            y: 0,
            width,
            height,
        })
    } else {
        let width = src_w;
        let height = ((f64::from(src_w) / target_ar).round() as u32).min(src_h);
        let slack = src_h - height;
        let y = ((f64::from(slack) / 2.0 * (1.0 + vertical_bias)).round() as u32).min(slack);
        Ok(CropRect {
            x: 0,
            y,
            width,
            height,
        })
    }
}

/// Fixed pixel layout of the photostrip, shared by every export path.
///
/// All three outputs (PNG, JPEG, MP4) must render with the same geometry so
/// the visual result is consistent across formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripGeometry {
    /// Outer padding around the whole strip.
    pub pad: u32,
    /// Vertical gap between photo frames.
    pub gap: u32,
    /// Photo frame width.
    pub frame_width: u32,
    /// Photo frame height (frame is 4:3).
    pub frame_height: u32,
    /// Footer band height at the bottom of the strip.
    pub footer_height: u32,
    /// Number of photo slots.
    pub slots: u32,
}

impl StripGeometry {
    /// The canonical strip layout: 660x2040 canvas with four 600x450 frames.
    pub const DEFAULT: Self = Self {
        pad: 30,
        gap: 20,
        frame_width: 600,
        frame_height: 450,
        footer_height: 120,
        slots: 4,
    };

    /// Full canvas width.
    pub fn canvas_width(&self) -> u32 {
        self.frame_width + 2 * self.pad
    }

    /// Full canvas height.
    pub fn canvas_height(&self) -> u32 {
        2 * self.pad
            + self.slots * self.frame_height
            + self.slots.saturating_sub(1) * self.gap
            + self.footer_height
    }

    /// Top-left corner of a photo slot (0-based, top to bottom).
    pub fn slot_origin(&self, slot: u32) -> (u32, u32) {
        (self.pad, self.pad + slot * (self.frame_height + self.gap))
    }

    /// Top edge of the footer band.
    pub fn footer_top(&self) -> u32 {
        self.canvas_height() - self.footer_height
    }

    /// Photo frame aspect ratio (width / height).
    pub fn frame_aspect(&self) -> f64 {
        f64::from(self.frame_width) / f64::from(self.frame_height)
    }

    /// Check the layout holds at least one non-degenerate slot.
    pub fn validate(&self) -> BoothResult<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(BoothError::validation("strip frame size must be non-zero"));
        }
        if self.slots == 0 {
            return Err(BoothError::validation("strip must have at least one slot"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_crop_landscape_source_is_height_bound() {
        let r = center_crop(1920, 1080, 4.0 / 3.0, 0.0).unwrap();
        assert_eq!(
            r,
            CropRect {
                x: 240,
                y: 0,
                width: 1440,
                height: 1080,
            }
        );
    }

    #[test]
    fn center_crop_portrait_source_is_width_bound() {
        let r = center_crop(1080, 1920, 4.0 / 3.0, 0.0).unwrap();
        assert_eq!(r.width, 1080);
        assert_eq!(r.height, 810);
        assert_eq!(r.x, 0);
        assert_eq!(r.y, 555);
    }

    #[test]
    fn center_crop_bias_shifts_and_clamps() {
        let top = center_crop(1080, 1920, 4.0 / 3.0, -1.0).unwrap();
        assert_eq!(top.y, 0);
        let bottom = center_crop(1080, 1920, 4.0 / 3.0, 1.0).unwrap();
        assert_eq!(bottom.y, 1920 - 810);
        // No vertical slack on a landscape source, bias is a no-op.
        let landscape = center_crop(1920, 1080, 4.0 / 3.0, 1.0).unwrap();
        assert_eq!(landscape.y, 0);
    }

    #[test]
    fn center_crop_matching_aspect_is_identity() {
        let r = center_crop(360, 270, 4.0 / 3.0, 0.0).unwrap();
        assert_eq!(
            r,
            CropRect {
                x: 0,
                y: 0,
                width: 360,
                height: 270,
            }
        );
    }

    #[test]
    fn center_crop_rejects_bad_inputs() {
        assert!(center_crop(0, 100, 4.0 / 3.0, 0.0).is_err());
        assert!(center_crop(100, 100, 0.0, 0.0).is_err());
        assert!(center_crop(100, 100, 4.0 / 3.0, 1.5).is_err());
    }

    #[test]
    fn default_geometry_matches_canonical_canvas() {
        let g = StripGeometry::DEFAULT;
        assert_eq!(g.canvas_width(), 660);
        assert_eq!(g.canvas_height(), 2040);
        assert_eq!(g.slot_origin(0), (30, 30));
        assert_eq!(g.slot_origin(3), (30, 30 + 3 * 470));
        assert_eq!(g.footer_top(), 1920);
        assert!(g.validate().is_ok());
    }
}
