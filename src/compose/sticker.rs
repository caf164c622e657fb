use std::path::Path;

use image::RgbaImage;

use crate::compose::raster;
use crate::compose::spec::StickerPlacement;

/// Sticker placements with their images decoded up front.
///
/// Stickers are decorative: a placement whose asset is missing or undecodable
/// is dropped here with a warning and the render proceeds without it.
pub struct PreparedStickers {
    items: Vec<(StickerPlacement, RgbaImage)>,
}

impl PreparedStickers {
    /// No stickers.
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Decode every placement's asset relative to `root`, skipping failures.
    pub fn prepare(placements: &[StickerPlacement], root: &Path) -> Self {
        let mut items = Vec::with_capacity(placements.len());
        for placement in placements {
            let path = root.join(&placement.asset);
            match image::open(&path) {
                Ok(img) => items.push((placement.clone(), img.to_rgba8())),
                Err(e) => {
                    tracing::warn!(asset = %path.display(), "skipping sticker: {e}");
                }
            }
        }
        Self { items }
    }

    /// Build directly from decoded images (tests, embedded assets).
    pub fn from_images(items: Vec<(StickerPlacement, RgbaImage)>) -> Self {
        Self { items }
    }

    /// Number of stickers that survived preparation.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no stickers survived preparation.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stamp every sticker onto the canvas in placement order.
    pub(crate) fn draw(&self, canvas: &mut RgbaImage) {
        let w = f64::from(canvas.width());
        let h = f64::from(canvas.height());
        for (placement, img) in &self.items {
            raster::stamp(
                canvas,
                img,
                placement.x * w,
                placement.y * h,
                placement.width * w,
                placement.rotation,
                placement.mirror,
                placement.opacity as f32,
            );
        }
    }
}
