use std::path::PathBuf;

use crate::compose::tone::ToneTransform;
use crate::foundation::color::{preset_palette, Color};
use crate::foundation::error::{BoothError, BoothResult};

/// Immutable input to one compositor invocation.
///
/// The slot images themselves are decoded by the caller and passed to
/// [`render_strip`](crate::render_strip) /
/// [`render_animation`](crate::render_animation) separately; `slots` here is
/// the file manifest used by spec files on disk.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CompositionSpec {
    /// Slot image paths for spec files, top to bottom; `null` renders a
    /// placeholder. Decoded by the caller, never by the renderer.
    #[serde(default)]
    pub slots: Vec<Option<PathBuf>>,
    /// Strip background color.
    #[serde(default = "default_background")]
    pub background: Color,
    /// The 5-knob tone transform.
    #[serde(default)]
    pub tone: ToneTransform,
    /// Decorative sticker placements, drawn in order.
    #[serde(default)]
    pub stickers: Vec<StickerPlacement>,
    /// Footer title and date.
    pub footer: Footer,
    /// Footer font files; unset entries fall back to a system-path probe.
    #[serde(default)]
    pub fonts: FontSpec,
    /// Requested static output encoding.
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_background() -> Color {
    Color::WHITE
}

impl CompositionSpec {
    /// A spec with the given footer and all other fields at their defaults.
    pub fn new(footer: Footer) -> Self {
        Self {
            slots: Vec::new(),
            background: Color::WHITE,
            tone: ToneTransform::NEUTRAL,
            stickers: Vec::new(),
            footer,
            fonts: FontSpec::default(),
            output: OutputFormat::Png,
        }
    }

    /// Validate the spec's parameters.
    pub fn validate(&self) -> BoothResult<()> {
        if self.slots.len() > 4 {
            return Err(BoothError::validation(format!(
                "a strip holds at most 4 slots, got {}",
                self.slots.len()
            )));
        }
        self.tone.validate()?;
        for (i, sticker) in self.stickers.iter().enumerate() {
            sticker
                .validate()
                .map_err(|e| BoothError::validation(format!("sticker {i}: {e}")))?;
        }
        Ok(())
    }
}

/// Static export encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless PNG, the download path.
    #[default]
    Png,
    /// JPEG at reduced quality, the share/QR path.
    Jpeg,
}

/// Footer text block at the bottom of the strip.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Footer {
    /// Large serif title line.
    pub title: String,
    /// Smaller sans date line. Supplied by the caller, never generated, so
    /// renders stay deterministic.
    pub date: String,
}

/// Footer font file paths.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    /// Serif face for the title.
    #[serde(default)]
    pub title: Option<PathBuf>,
    /// Sans face for the date.
    #[serde(default)]
    pub date: Option<PathBuf>,
}

/// One decorative overlay placement.
///
/// Positions and width are relative to the canvas so placements are geometry
/// independent; a sticker that fails to load is skipped at render time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StickerPlacement {
    /// Image file path, resolved against the spec's asset root.
    pub asset: PathBuf,
    /// Center x as a fraction of canvas width, in [0, 1].
    pub x: f64,
    /// Center y as a fraction of canvas height, in [0, 1].
    pub y: f64,
    /// Width as a fraction of canvas width; aspect ratio is preserved.
    pub width: f64,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Mirror horizontally before rotating.
    #[serde(default)]
    pub mirror: bool,
    /// Opacity in [0, 1].
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl StickerPlacement {
    /// Validate relative coordinates and opacity.
    pub fn validate(&self) -> BoothResult<()> {
        if !(0.0..=1.0).contains(&self.x) || !(0.0..=1.0).contains(&self.y) {
            return Err(BoothError::validation(
                "sticker position must be in [0, 1] of the canvas",
            ));
        }
        if !(self.width > 0.0 && self.width <= 1.0) {
            return Err(BoothError::validation(
                "sticker width must be in (0, 1] of the canvas width",
            ));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(BoothError::validation("sticker opacity must be in [0, 1]"));
        }
        Ok(())
    }
}

/// A named, versioned preset bundling a background color and a sticker list.
///
/// Applying a theme atomically replaces both on the target spec.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StickerTheme {
    /// Stable theme name.
    pub name: String,
    /// Preset version, bumped when a theme's placements change.
    pub version: u32,
    /// Strip background.
    pub background: Color,
    /// Sticker placements the theme installs.
    pub stickers: Vec<StickerPlacement>,
}

impl StickerTheme {
    /// Replace the spec's background and sticker list with this theme's.
    pub fn apply(&self, spec: &mut CompositionSpec) {
        spec.background = self.background;
        spec.stickers = self.stickers.clone();
    }
}

/// The built-in themes: one per palette color, with a small corner-sticker
/// arrangement referencing conventional asset paths.
pub fn builtin_themes() -> Vec<StickerTheme> {
    preset_palette()
        .iter()
        .map(|(name, color)| StickerTheme {
            name: (*name).to_string(),
            version: 1,
            background: *color,
            stickers: corner_stickers(name),
        })
        .collect()
}

fn corner_stickers(theme: &str) -> Vec<StickerPlacement> {
    let asset = |file: &str| PathBuf::from(format!("stickers/{theme}/{file}"));
    vec![
        StickerPlacement {
            asset: asset("top.png"),
            x: 0.13,
            y: 0.015,
            width: 0.16,
            rotation: -12.0,
            mirror: false,
            opacity: 1.0,
        },
        StickerPlacement {
            asset: asset("top.png"),
            x: 0.87,
            y: 0.015,
            width: 0.16,
            rotation: 12.0,
            mirror: true,
            opacity: 1.0,
        },
        StickerPlacement {
            asset: asset("footer.png"),
            x: 0.10,
            y: 0.975,
            width: 0.12,
            rotation: 0.0,
            mirror: false,
            opacity: 0.9,
        },
    ]
}
