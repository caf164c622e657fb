use std::path::Path;

use image::RgbaImage;

use crate::compose::raster;
use crate::compose::spec::CompositionSpec;
use crate::compose::sticker::PreparedStickers;
use crate::compose::text::FooterFonts;
use crate::foundation::color::Color;
use crate::foundation::error::{BoothError, BoothResult};
use crate::foundation::geom::{center_crop, StripGeometry};

/// Footer title size in pixels.
const TITLE_PX: f32 = 36.0;
/// Footer date size in pixels.
const DATE_PX: f32 = 18.0;
/// Title center sits this far above the footer band's vertical center.
const TITLE_RAISE: i64 = 10;
/// Date center sits this far below the footer band's vertical center.
const DATE_DROP: i64 = 24;

/// Decode one slot image from disk.
///
/// Unlike stickers, a still that fails to decode rejects the whole
/// composition, so this surfaces [`BoothError::LoadFailure`].
pub fn load_slot_image(path: &Path) -> BoothResult<RgbaImage> {
    let img = image::open(path)
        .map_err(|e| BoothError::load_failure(format!("'{}': {e}", path.display())))?;
    Ok(img.to_rgba8())
}

/// Render the static photostrip.
///
/// `slots` holds up to 4 stills top-to-bottom; `None` (or a missing trailing
/// slot) renders a neutral placeholder. The output is deterministic: the same
/// inputs always produce byte-identical pixels.
#[tracing::instrument(skip_all, fields(slots = slots.len(), stickers = stickers.len()))]
pub fn render_strip(
    slots: &[Option<RgbaImage>],
    spec: &CompositionSpec,
    stickers: &PreparedStickers,
    fonts: &FooterFonts,
) -> BoothResult<RgbaImage> {
    if slots.is_empty() || slots.iter().all(Option::is_none) {
        return Err(BoothError::NoPhotos);
    }
    spec.validate()?;
    let borrowed: Vec<Option<&RgbaImage>> = slots.iter().map(Option::as_ref).collect();
    draw_frame(&borrowed, spec, stickers, fonts)
}

/// Paint one complete strip frame. Shared by the static path and by every
/// frame of the animated path; the caller guarantees `spec` is validated.
pub(crate) fn draw_frame(
    slots: &[Option<&RgbaImage>],
    spec: &CompositionSpec,
    stickers: &PreparedStickers,
    fonts: &FooterFonts,
) -> BoothResult<RgbaImage> {
    let geo = StripGeometry::DEFAULT;
    let mut canvas = RgbaImage::new(geo.canvas_width(), geo.canvas_height());
    raster::fill(&mut canvas, spec.background);

    let tone_matrix = spec.tone.matrix();
    let placeholder = spec.background.darken(0.08);

    for slot in 0..geo.slots {
        let (x, y) = geo.slot_origin(slot);
        match slots.get(slot as usize).copied().flatten() {
            Some(img) => {
                let crop = center_crop(img.width(), img.height(), geo.frame_aspect(), 0.0)?;
                let mut framed = raster::crop_scale(img, crop, geo.frame_width, geo.frame_height);
                tone_matrix.apply(&mut framed);
                raster::blit(&mut canvas, &framed, x, y);
            }
            None => {
                raster::fill_rect(&mut canvas, x, y, geo.frame_width, geo.frame_height, placeholder);
            }
        }
    }

    // Temperature then tint, full canvas; the footer band is repainted after,
    // so overlay bleed below the photos never shows.
    let temperature = spec.tone.temperature_overlay();
    if temperature.alpha > 0.0 {
        raster::color_blend(&mut canvas, temperature.color, temperature.alpha);
    }
    let tint = spec.tone.tint_overlay();
    if tint.alpha > 0.0 {
        raster::color_blend(&mut canvas, tint.color, tint.alpha);
    }

    raster::fill_rect(
        &mut canvas,
        0,
        geo.footer_top(),
        geo.canvas_width(),
        geo.footer_height,
        spec.background,
    );

    stickers.draw(&mut canvas);

    let text_color = if spec.background.is_dark() {
        Color::WHITE
    } else {
        Color::BLACK
    };
    let cx = geo.canvas_width() / 2;
    let footer_center = i64::from(geo.footer_top()) + i64::from(geo.footer_height) / 2;
    fonts.draw_title(
        &mut canvas,
        &spec.footer.title,
        TITLE_PX,
        cx,
        (footer_center - TITLE_RAISE).max(0) as u32,
        text_color,
    );
    fonts.draw_date(
        &mut canvas,
        &spec.footer.date,
        DATE_PX,
        cx,
        (footer_center + DATE_DROP).max(0) as u32,
        text_color,
    );

    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/strip.rs"]
mod tests;
