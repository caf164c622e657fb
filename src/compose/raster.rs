//! CPU drawing primitives shared by the static and animated compositors.
//!
//! All buffers are straight-alpha RGBA8 (`image::RgbaImage`); the strip canvas
//! itself is always fully opaque.

use image::RgbaImage;

use crate::foundation::color::Color;
use crate::foundation::geom::CropRect;

/// Fill the whole image with an opaque color.
pub(crate) fn fill(img: &mut RgbaImage, color: Color) {
    let px = image::Rgba(color.rgba8());
    for p in img.pixels_mut() {
        *p = px;
    }
}

/// Fill an axis-aligned rectangle, clipped to the image bounds.
pub(crate) fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Color) {
    let px = image::Rgba(color.rgba8());
    let x1 = (x + w).min(img.width());
    let y1 = (y + h).min(img.height());
    for yy in y.min(img.height())..y1 {
        for xx in x.min(img.width())..x1 {
            img.put_pixel(xx, yy, px);
        }
    }
}

/// Copy `src` opaquely into `dst` at `(x, y)`, clipped to `dst` bounds.
pub(crate) fn blit(dst: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32) {
    let w = src.width().min(dst.width().saturating_sub(x));
    let h = src.height().min(dst.height().saturating_sub(y));
    for sy in 0..h {
        for sx in 0..w {
            dst.put_pixel(x + sx, y + sy, *src.get_pixel(sx, sy));
        }
    }
}

/// Crop `src` to `crop` and scale the window to `out_w x out_h` with bilinear
/// sampling.
pub(crate) fn crop_scale(src: &RgbaImage, crop: CropRect, out_w: u32, out_h: u32) -> RgbaImage {
    let mut out = RgbaImage::new(out_w, out_h);
    if crop.width == 0 || crop.height == 0 || out_w == 0 || out_h == 0 {
        return out;
    }
    let sx_step = f64::from(crop.width) / f64::from(out_w);
    let sy_step = f64::from(crop.height) / f64::from(out_h);
    for oy in 0..out_h {
        let sy = f64::from(crop.y) + (f64::from(oy) + 0.5) * sy_step - 0.5;
        for ox in 0..out_w {
            let sx = f64::from(crop.x) + (f64::from(ox) + 0.5) * sx_step - 0.5;
            out.put_pixel(ox, oy, image::Rgba(sample_bilinear(src, sx, sy)));
        }
    }
    out
}

/// Bilinear sample at fractional source coordinates, clamped to the edges.
fn sample_bilinear(src: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    let max_x = f64::from(src.width() - 1);
    let max_y = f64::from(src.height() - 1);
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(src.width() - 1);
    let y1 = (y0 + 1).min(src.height() - 1);
    let fx = (x - f64::from(x0)) as f32;
    let fy = (y - f64::from(y0)) as f32;

    let p00 = src.get_pixel(x0, y0).0;
    let p10 = src.get_pixel(x1, y0).0;
    let p01 = src.get_pixel(x0, y1).0;
    let p11 = src.get_pixel(x1, y1).0;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f32::from(p00[c]) * (1.0 - fx) + f32::from(p10[c]) * fx;
        let bot = f32::from(p01[c]) * (1.0 - fx) + f32::from(p11[c]) * fx;
        out[c] = (top * (1.0 - fy) + bot * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Mirror the image horizontally in place.
pub(crate) fn mirror_in_place(img: &mut RgbaImage) {
    let (w, h) = img.dimensions();
    for y in 0..h {
        for x in 0..w / 2 {
            let a = *img.get_pixel(x, y);
            let b = *img.get_pixel(w - 1 - x, y);
            img.put_pixel(x, y, b);
            img.put_pixel(w - 1 - x, y, a);
        }
    }
}

/// Blend a solid color over the whole canvas with the non-separable "color"
/// blend mode at strength `alpha`.
///
/// The blended color takes the overlay's hue and saturation and the backdrop
/// pixel's luminosity (PDF/CSS `color` blend), then alpha-composites over the
/// backdrop at `alpha`. A zero alpha is a no-op.
pub(crate) fn color_blend(img: &mut RgbaImage, overlay: Color, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let ov = [
        f32::from(overlay.r) / 255.0,
        f32::from(overlay.g) / 255.0,
        f32::from(overlay.b) / 255.0,
    ];
    for px in img.pixels_mut() {
        let back = [
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
        ];
        let blended = set_lum(ov, lum(back));
        for c in 0..3 {
            let v = back[c] * (1.0 - alpha) + blended[c] * alpha;
            px[c] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
}

fn lum(c: [f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

/// PDF SetLum: shift to the target luminosity, then clip into gamut.
fn set_lum(c: [f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color([c[0] + d, c[1] + d, c[2] + d])
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(c);
    let min = c[0].min(c[1]).min(c[2]);
    let max = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if min < 0.0 {
        for v in &mut out {
            *v = l + (*v - l) * l / (l - min);
        }
    }
    if max > 1.0 {
        for v in &mut out {
            *v = l + (*v - l) * (1.0 - l) / (max - l);
        }
    }
    out
}

/// Draw `src` over `dst` centered at `(cx, cy)`, scaled to `width` pixels wide
/// (aspect preserved), rotated by `rotation_degrees`, optionally mirrored,
/// composited at `opacity`.
///
/// Uses inverse mapping over the destination bounding box with bilinear
/// sampling, so rotated edges stay smooth.
pub(crate) fn stamp(
    dst: &mut RgbaImage,
    src: &RgbaImage,
    cx: f64,
    cy: f64,
    width: f64,
    rotation_degrees: f64,
    mirror: bool,
    opacity: f32,
) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src.width() == 0 || src.height() == 0 || width <= 0.0 {
        return;
    }
    let scale = width / f64::from(src.width());
    let height = f64::from(src.height()) * scale;
    let (sin, cos) = rotation_degrees.to_radians().sin_cos();

    // Conservative destination bounds: the rotated half-diagonal around (cx, cy).
    let radius = (width * width + height * height).sqrt() / 2.0 + 1.0;
    let x0 = ((cx - radius).floor().max(0.0)) as u32;
    let y0 = ((cy - radius).floor().max(0.0)) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(dst.width());
    let y1 = ((cy + radius).ceil() as u32).min(dst.height());

    for dy in y0..y1 {
        for dx in x0..x1 {
            // Rotate the destination point back into sticker space.
            let rel_x = f64::from(dx) + 0.5 - cx;
            let rel_y = f64::from(dy) + 0.5 - cy;
            let mut ux = (rel_x * cos + rel_y * sin) / scale + f64::from(src.width()) / 2.0;
            let uy = (-rel_x * sin + rel_y * cos) / scale + f64::from(src.height()) / 2.0;
            if mirror {
                ux = f64::from(src.width()) - ux;
            }
            if ux < 0.0
                || uy < 0.0
                || ux >= f64::from(src.width())
                || uy >= f64::from(src.height())
            {
                continue;
            }
            let s = sample_bilinear(src, ux - 0.5, uy - 0.5);
            let sa = f32::from(s[3]) / 255.0 * opacity;
            if sa <= 0.0 {
                continue;
            }
            let d = dst.get_pixel_mut(dx, dy);
            for c in 0..3 {
                let v = f32::from(s[c]) * sa + f32::from(d[c]) * (1.0 - sa);
                d[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}
