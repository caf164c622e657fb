use std::fmt;
use std::str::FromStr;

use image::RgbaImage;

use crate::foundation::error::BoothError;

/// Capture-time filter preset baked into every sampled frame.
///
/// The preset is applied once by the frame sampler; the compositor never
/// reapplies it, so stills and pre-roll frames always match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterPreset {
    /// Identity.
    #[default]
    None,
    /// Warm, saturated late-afternoon look.
    GoldenHour,
    /// Faded sepia film look.
    Nostalgia,
    /// Desaturated cool-shifted look.
    Frosted,
    /// Fresh green-shifted look.
    LeafyLight,
    /// Muted sepia with a sage tilt.
    SepiaSage,
    /// Punchy high-contrast look.
    PolaroidPop,
}

impl FilterPreset {
    /// All presets in presentation order.
    pub const ALL: [FilterPreset; 7] = [
        FilterPreset::None,
        FilterPreset::GoldenHour,
        FilterPreset::Nostalgia,
        FilterPreset::Frosted,
        FilterPreset::LeafyLight,
        FilterPreset::SepiaSage,
        FilterPreset::PolaroidPop,
    ];

    /// The preset's stable kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            FilterPreset::None => "none",
            FilterPreset::GoldenHour => "golden-hour",
            FilterPreset::Nostalgia => "nostalgia",
            FilterPreset::Frosted => "frosted",
            FilterPreset::LeafyLight => "leafy-light",
            FilterPreset::SepiaSage => "sepia-sage",
            FilterPreset::PolaroidPop => "polaroid-pop",
        }
    }

    /// Compile the preset's operation chain into one color matrix.
    pub(crate) fn matrix(self) -> ColorMatrix {
        match self {
            FilterPreset::None => ColorMatrix::identity(),
            FilterPreset::GoldenHour => ColorMatrix::identity()
                .then(ColorMatrix::brightness(1.05))
                .then(ColorMatrix::contrast(1.05))
                .then(ColorMatrix::saturate(1.25))
                .then(ColorMatrix::sepia(0.25))
                .then(ColorMatrix::hue_rotate(10.0)),
            FilterPreset::Nostalgia => ColorMatrix::identity()
                .then(ColorMatrix::sepia(0.85))
                .then(ColorMatrix::contrast(0.95))
                .then(ColorMatrix::brightness(1.05)),
            FilterPreset::Frosted => ColorMatrix::identity()
                .then(ColorMatrix::brightness(1.10))
                .then(ColorMatrix::contrast(0.90))
                .then(ColorMatrix::saturate(0.80))
                .then(ColorMatrix::hue_rotate(180.0)),
            FilterPreset::LeafyLight => ColorMatrix::identity()
                .then(ColorMatrix::saturate(1.10))
                .then(ColorMatrix::hue_rotate(60.0)),
            FilterPreset::SepiaSage => ColorMatrix::identity()
                .then(ColorMatrix::sepia(0.60))
                .then(ColorMatrix::hue_rotate(25.0))
                .then(ColorMatrix::saturate(1.10)),
            FilterPreset::PolaroidPop => ColorMatrix::identity()
                .then(ColorMatrix::contrast(1.20))
                .then(ColorMatrix::brightness(1.05))
                .then(ColorMatrix::saturate(1.25)),
        }
    }
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterPreset {
    type Err = BoothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| BoothError::validation(format!("unknown filter preset '{s}'")))
    }
}

/// A 3x4 color matrix acting on RGB with an additive offset column, in
/// normalized [0, 1] channel space. Alpha passes through untouched.
///
/// Rows are `[rr, rg, rb, r_off; gr, gg, gb, g_off; br, bg, bb, b_off]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ColorMatrix {
    m: [f32; 12],
}

// Rec. 709-ish luminance weights used by the CSS filter-effects matrices.
const LUM_R: f32 = 0.213;
const LUM_G: f32 = 0.715;
const LUM_B: f32 = 0.072;

impl ColorMatrix {
    pub(crate) fn identity() -> Self {
        Self {
            m: [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0,
            ],
        }
    }

    /// `brightness(a)`: scale RGB by `a`.
    pub(crate) fn brightness(a: f32) -> Self {
        Self {
            m: [
                a, 0.0, 0.0, 0.0, //
                0.0, a, 0.0, 0.0, //
                0.0, 0.0, a, 0.0,
            ],
        }
    }

    /// `contrast(a)`: map each channel `c -> (c - 0.5) * a + 0.5`.
    pub(crate) fn contrast(a: f32) -> Self {
        let off = 0.5 - 0.5 * a;
        Self {
            m: [
                a, 0.0, 0.0, off, //
                0.0, a, 0.0, off, //
                0.0, 0.0, a, off,
            ],
        }
    }

    /// `saturate(s)`: the standard luminance-weighted saturation matrix.
    pub(crate) fn saturate(s: f32) -> Self {
        Self {
            m: [
                LUM_R + (1.0 - LUM_R) * s,
                LUM_G * (1.0 - s),
                LUM_B * (1.0 - s),
                0.0,
                LUM_R * (1.0 - s),
                LUM_G + (1.0 - LUM_G) * s,
                LUM_B * (1.0 - s),
                0.0,
                LUM_R * (1.0 - s),
                LUM_G * (1.0 - s),
                LUM_B + (1.0 - LUM_B) * s,
                0.0,
            ],
        }
    }

    /// `sepia(a)`: blend between identity (a = 0) and the full sepia matrix.
    pub(crate) fn sepia(a: f32) -> Self {
        let t = a.clamp(0.0, 1.0);
        let lerp = |id: f32, sep: f32| id + (sep - id) * t;
        Self {
            m: [
                lerp(1.0, 0.393),
                lerp(0.0, 0.769),
                lerp(0.0, 0.189),
                0.0,
                lerp(0.0, 0.349),
                lerp(1.0, 0.686),
                lerp(0.0, 0.168),
                0.0,
                lerp(0.0, 0.272),
                lerp(0.0, 0.534),
                lerp(1.0, 0.131),
                0.0,
            ],
        }
    }

    /// `hue-rotate(deg)`: the standard hue rotation matrix.
    pub(crate) fn hue_rotate(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            m: [
                LUM_R + cos * (1.0 - LUM_R) - sin * LUM_R,
                LUM_G - cos * LUM_G - sin * LUM_G,
                LUM_B - cos * LUM_B + sin * (1.0 - LUM_B),
                0.0,
                LUM_R - cos * LUM_R + sin * 0.143,
                LUM_G + cos * (1.0 - LUM_G) + sin * 0.140,
                LUM_B - cos * LUM_B - sin * 0.283,
                0.0,
                LUM_R - cos * LUM_R - sin * (1.0 - LUM_R),
                LUM_G - cos * LUM_G + sin * LUM_G,
                LUM_B + cos * (1.0 - LUM_B) + sin * LUM_B,
                0.0,
            ],
        }
    }

    /// Compose so that `self` applies first, then `next`.
    pub(crate) fn then(self, next: Self) -> Self {
        let a = &next.m;
        let b = &self.m;
        let mut m = [0.0f32; 12];
        for row in 0..3 {
            for col in 0..3 {
                m[row * 4 + col] =
                    a[row * 4] * b[col] + a[row * 4 + 1] * b[4 + col] + a[row * 4 + 2] * b[8 + col];
            }
            m[row * 4 + 3] = a[row * 4] * b[3]
                + a[row * 4 + 1] * b[7]
                + a[row * 4 + 2] * b[11]
                + a[row * 4 + 3];
        }
        Self { m }
    }

    pub(crate) fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Transform one RGB triple, clamping to [0, 255].
    pub(crate) fn transform(&self, r: u8, g: u8, b: u8) -> (u8, u8, u8) {
        let rf = f32::from(r) / 255.0;
        let gf = f32::from(g) / 255.0;
        let bf = f32::from(b) / 255.0;
        let m = &self.m;
        let out = |row: usize| {
            let v = m[row * 4] * rf + m[row * 4 + 1] * gf + m[row * 4 + 2] * bf + m[row * 4 + 3];
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        };
        (out(0), out(1), out(2))
    }

    /// Apply in place to every pixel of an RGBA buffer.
    pub(crate) fn apply(&self, img: &mut RgbaImage) {
        if self.is_identity() {
            return;
        }
        for px in img.pixels_mut() {
            let (r, g, b) = self.transform(px[0], px[1], px[2]);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
    }
}
