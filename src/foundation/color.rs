use crate::foundation::error::{BoothError, BoothResult};

/// Opaque RGB color used for strip backgrounds, overlays, and footer text.
///
/// Serializes to and from a `#rrggbb` hex string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Build a color from channel values.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` (or bare `rrggbb`) hex string.
    pub fn from_hex(s: &str) -> BoothResult<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BoothError::validation(format!(
                "expected '#rrggbb' hex color, got '{s}'"
            )));
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        Ok(Self::rgb(byte(0), byte(2), byte(4)))
    }

    /// Format as a `#rrggbb` hex string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// ITU-R BT.601 luma in [0, 255].
    pub fn luma(self) -> u8 {
        let y = 0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b);
        y.round().clamp(0.0, 255.0) as u8
    }

    /// Whether footer text over this background should be white.
    pub fn is_dark(self) -> bool {
        self.luma() < 128
    }

    /// Scale all channels toward black by `amount` in [0, 1].
    pub fn darken(self, amount: f32) -> Self {
        let k = (1.0 - amount.clamp(0.0, 1.0)).clamp(0.0, 1.0);
        let scale = |c: u8| (f32::from(c) * k).round().clamp(0.0, 255.0) as u8;
        Self::rgb(scale(self.r), scale(self.g), scale(self.b))
    }

    /// The color as an opaque RGBA8 pixel.
    pub fn rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

static PALETTE: [(&str, Color); 6] = [
    ("white", Color::rgb(0xff, 0xff, 0xff)),
    ("blue", Color::rgb(0xbc, 0xd6, 0xff)),
    ("green", Color::rgb(0xc9, 0xff, 0xc9)),
    ("purple", Color::rgb(0xe8, 0xc9, 0xff)),
    ("red", Color::rgb(0xff, 0xb3, 0xb3)),
    ("black", Color::rgb(0x2b, 0x2b, 0x2b)),
];

/// The built-in strip background palette, in presentation order.
pub fn preset_palette() -> &'static [(&'static str, Color)] {
    &PALETTE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let c = Color::from_hex("#bcd6ff").unwrap();
        assert_eq!(c, Color::rgb(0xbc, 0xd6, 0xff));
        assert_eq!(c.to_hex(), "#bcd6ff");
        assert_eq!(Color::from_hex("2b2b2b").unwrap(), Color::rgb(43, 43, 43));
    }

    #[test]
    fn hex_rejects_malformed_input() {
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn palette_is_static_and_ordered() {
        let palette = preset_palette();
        assert_eq!(palette.len(), 6);
        assert_eq!(palette[0], ("white", Color::WHITE));
        assert_eq!(palette[5], ("black", Color::rgb(0x2b, 0x2b, 0x2b)));
    }

    #[test]
    fn dark_classification_matches_palette() {
        // Only the black preset takes white footer text.
        for (name, color) in preset_palette() {
            assert_eq!(color.is_dark(), *name == "black", "preset {name}");
        }
    }

    #[test]
    fn darken_scales_toward_black() {
        let c = Color::rgb(200, 100, 50).darken(0.5);
        assert_eq!(c, Color::rgb(100, 50, 25));
        assert_eq!(Color::WHITE.darken(0.0), Color::WHITE);
        assert_eq!(Color::WHITE.darken(1.0), Color::BLACK);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let c: Color = serde_json::from_str("\"#ffb3b3\"").unwrap();
        assert_eq!(c, Color::rgb(0xff, 0xb3, 0xb3));
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#ffb3b3\"");
    }
}
