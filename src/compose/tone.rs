use crate::compose::filter::ColorMatrix;
use crate::foundation::color::Color;
use crate::foundation::error::{BoothError, BoothResult};

/// Alpha cap for the temperature overlay at knob extremes.
const TEMPERATURE_ALPHA_CAP: f32 = 0.35;
/// Alpha cap for the tint overlay at knob extremes.
const TINT_ALPHA_CAP: f32 = 0.25;

const WARM: Color = Color::rgb(255, 140, 0);
const COOL: Color = Color::rgb(0, 120, 255);
const MAGENTA: Color = Color::rgb(255, 0, 170);
const GREEN: Color = Color::rgb(0, 255, 170);

/// Normalize a percentage knob: `clamp(-1, 1, (p - 100) / 100)`.
///
/// 100 is neutral (0), 0 maps to -1, 200 maps to +1.
pub fn norm(percent: f64) -> f64 {
    ((percent - 100.0) / 100.0).clamp(-1.0, 1.0)
}

/// A derived overlay pass: a solid color blended over the strip at `alpha`.
///
/// Alpha is 0 exactly when the underlying knob is 100, in which case the
/// compositor skips the pass entirely.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlay {
    /// Overlay color.
    pub color: Color,
    /// Blend strength in [0, cap].
    pub alpha: f32,
}

impl Overlay {
    fn from_knob(percent: f64, positive: Color, negative: Color, cap: f32) -> Self {
        let n = norm(percent);
        let color = if n >= 0.0 { positive } else { negative };
        let alpha = (n.abs() as f32 * cap).min(cap);
        Self { color, alpha }
    }
}

/// Temperature overlay: warm orange above 100, cool blue below, cap 0.35.
pub fn temperature_overlay(percent: f64) -> Overlay {
    Overlay::from_knob(percent, WARM, COOL, TEMPERATURE_ALPHA_CAP)
}

/// Tint overlay: magenta above 100, green below, cap 0.25.
pub fn tint_overlay(percent: f64) -> Overlay {
    Overlay::from_knob(percent, MAGENTA, GREEN, TINT_ALPHA_CAP)
}

/// The 5-knob tone adjustment applied uniformly to all strip slots.
///
/// Each knob is a percentage in [0, 200] where 100 is the identity.
/// Saturation, brightness, and contrast compose into one color matrix applied
/// while drawing the photos; temperature and tint become [`Overlay`] passes
/// blended over the finished photo region.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ToneTransform {
    /// Saturation percentage.
    pub saturation: f64,
    /// Brightness percentage.
    pub brightness: f64,
    /// Contrast percentage.
    pub contrast: f64,
    /// Temperature percentage (warm/cool overlay).
    pub temperature: f64,
    /// Tint percentage (magenta/green overlay).
    pub tint: f64,
}

impl ToneTransform {
    /// The all-neutral transform.
    pub const NEUTRAL: Self = Self {
        saturation: 100.0,
        brightness: 100.0,
        contrast: 100.0,
        temperature: 100.0,
        tint: 100.0,
    };

    /// Check every knob is inside [0, 200].
    pub fn validate(&self) -> BoothResult<()> {
        let knobs = [
            ("saturation", self.saturation),
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("temperature", self.temperature),
            ("tint", self.tint),
        ];
        for (name, value) in knobs {
            if !(0.0..=200.0).contains(&value) {
                return Err(BoothError::validation(format!(
                    "tone {name} must be in [0, 200], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// The combined saturate/brightness/contrast matrix for the photo pass.
    ///
    /// Temperature and tint are deliberately not part of this matrix; they are
    /// separate overlay passes.
    pub(crate) fn matrix(&self) -> ColorMatrix {
        ColorMatrix::saturate((self.saturation / 100.0) as f32)
            .then(ColorMatrix::brightness((self.brightness / 100.0) as f32))
            .then(ColorMatrix::contrast((self.contrast / 100.0) as f32))
    }

    /// The temperature overlay derived from the temperature knob.
    pub fn temperature_overlay(&self) -> Overlay {
        temperature_overlay(self.temperature)
    }

    /// The tint overlay derived from the tint knob.
    pub fn tint_overlay(&self) -> Overlay {
        tint_overlay(self.tint)
    }
}

impl Default for ToneTransform {
    fn default() -> Self {
        Self::NEUTRAL
    }
}
