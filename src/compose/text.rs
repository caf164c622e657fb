//! Footer text rasterization with `fontdue`.
//!
//! Fonts are decorative chrome: a missing or unreadable face degrades to a
//! text-less footer instead of failing the render.

use std::path::Path;

use fontdue::{Font, FontSettings};
use image::RgbaImage;

use crate::compose::spec::FontSpec;
use crate::foundation::color::Color;

/// Decoded footer fonts: a serif face for the title and a sans face for the
/// date line. Either may be absent.
pub struct FooterFonts {
    title: Option<Font>,
    date: Option<Font>,
}

impl FooterFonts {
    /// Fonts explicitly absent; footer text is skipped.
    pub fn none() -> Self {
        Self {
            title: None,
            date: None,
        }
    }

    /// Load the faces named by `spec`, probing system font paths for any that
    /// are unset. Unreadable files degrade to `None` with a warning.
    pub fn load(spec: &FontSpec) -> Self {
        let title = spec
            .title
            .as_deref()
            .and_then(load_face)
            .or_else(|| probe(SERIF_CANDIDATES));
        let date = spec
            .date
            .as_deref()
            .and_then(load_face)
            .or_else(|| probe(SANS_CANDIDATES));
        if title.is_none() || date.is_none() {
            tracing::warn!("no usable footer font found; footer text will be skipped");
        }
        Self { title, date }
    }

    /// Build from raw TTF/OTF bytes (tests, embedded assets).
    pub fn from_bytes(title: Option<&[u8]>, date: Option<&[u8]>) -> Self {
        let parse = |bytes: &[u8]| Font::from_bytes(bytes.to_vec(), FontSettings::default()).ok();
        Self {
            title: title.and_then(parse),
            date: date.and_then(parse),
        }
    }

    /// Whether at least one face is available.
    pub fn any_loaded(&self) -> bool {
        self.title.is_some() || self.date.is_some()
    }

    /// Draw the footer title centered at `(cx, cy)` (text box center).
    pub(crate) fn draw_title(&self, img: &mut RgbaImage, text: &str, px: f32, cx: u32, cy: u32, color: Color) {
        if let Some(font) = &self.title {
            draw_centered(img, font, text, px, cx, cy, color);
        }
    }

    /// Draw the footer date line centered at `(cx, cy)`.
    pub(crate) fn draw_date(&self, img: &mut RgbaImage, text: &str, px: f32, cx: u32, cy: u32, color: Color) {
        if let Some(font) = &self.date {
            draw_centered(img, font, text, px, cx, cy, color);
        }
    }
}

fn load_face(path: &Path) -> Option<Font> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(path = %path.display(), "footer font unreadable: {e}");
            return None;
        }
    };
    match Font::from_bytes(bytes, FontSettings::default()) {
        Ok(f) => Some(f),
        Err(e) => {
            tracing::warn!(path = %path.display(), "footer font failed to parse: {e}");
            None
        }
    }
}

fn probe(candidates: &[&str]) -> Option<Font> {
    candidates
        .iter()
        .map(Path::new)
        .filter(|p| p.exists())
        .find_map(load_face)
}

const SERIF_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSerif-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman Bold.ttf",
    "C:\\Windows\\Fonts\\timesbd.ttf",
];

const SANS_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Measure `text`, then rasterize it centered on `(cx, cy)` with coverage
/// blending onto the canvas.
fn draw_centered(
    img: &mut RgbaImage,
    font: &Font,
    text: &str,
    px: f32,
    cx: u32,
    cy: u32,
    color: Color,
) {
    // Measure pass.
    let mut total_width: i32 = 0;
    let mut max_ascent: i32 = 0;
    let mut max_descent: i32 = 0;
    for ch in text.chars() {
        let (metrics, _) = font.rasterize(ch, px);
        let ascent = metrics.height as i32 + metrics.ymin;
        let descent = -metrics.ymin;
        max_ascent = max_ascent.max(ascent);
        max_descent = max_descent.max(descent);
        total_width += metrics.advance_width.round() as i32;
    }
    let text_h = max_ascent + max_descent;
    let origin_x = i64::from(cx) - i64::from(total_width) / 2;
    let origin_y = i64::from(cy) - i64::from(text_h) / 2;

    // Glyph pass.
    let mut cursor_x: i64 = 0;
    for ch in text.chars() {
        let (metrics, bitmap) = font.rasterize(ch, px);
        let glyph_x = origin_x + cursor_x + i64::from(metrics.xmin);
        let glyph_y = origin_y + i64::from(max_ascent - (metrics.height as i32 + metrics.ymin));
        for gy in 0..metrics.height {
            for gx in 0..metrics.width {
                let coverage = bitmap[gy * metrics.width + gx];
                if coverage == 0 {
                    continue;
                }
                let x = glyph_x + gx as i64;
                let y = glyph_y + gy as i64;
                if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
                    continue;
                }
                let a = f32::from(coverage) / 255.0;
                let d = img.get_pixel_mut(x as u32, y as u32);
                let src = color.rgba8();
                for c in 0..3 {
                    let v = f32::from(src[c]) * a + f32::from(d[c]) * (1.0 - a);
                    d[c] = v.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
        cursor_x += i64::from(metrics.advance_width.round() as i32);
    }
}
