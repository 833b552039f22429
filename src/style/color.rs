use serde::{Deserialize, Serialize};

/// RGB color stored as normalized lowercase `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    pub const WHITE: &'static str = "#ffffff";
    pub const BLACK: &'static str = "#000000";

    /// Parse `#rrggbb` or `rrggbb` (any case). Anything else is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(format!("#{}", digits.to_ascii_lowercase())))
    }

    /// Parse, falling back to `fallback` when `s` is malformed.
    pub fn parse_or(s: &str, fallback: &str) -> Self {
        match Self::parse(s) {
            Some(c) => c,
            None => {
                tracing::warn!(value = s, fallback, "malformed hex color replaced");
                Self(fallback.to_owned())
            }
        }
    }

    pub fn white() -> Self {
        Self(Self::WHITE.to_owned())
    }

    pub fn black() -> Self {
        Self(Self::BLACK.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer channels of the stored string. An unparsable pair yields 0 for that channel.
    pub fn channels(&self) -> [u8; 3] {
        hex_channels(&self.0)
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Channel extraction over an arbitrary hex string (`#` optional).
pub fn hex_channels(s: &str) -> [u8; 3] {
    let s = s.trim();
    let digits = s.strip_prefix('#').unwrap_or(s);
    let pair = |i: usize| -> u8 {
        digits
            .get(i..i + 2)
            .and_then(|p| u8::from_str_radix(p, 16).ok())
            .unwrap_or(0)
    };
    [pair(0), pair(2), pair(4)]
}

/// Serde helper: text colors default to white when malformed.
pub(crate) fn de_text_color<'de, D>(deserializer: D) -> Result<HexColor, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(HexColor::parse_or(&s, HexColor::WHITE))
}

/// Serde helper: box backgrounds default to black when malformed.
pub(crate) fn de_box_color<'de, D>(deserializer: D) -> Result<HexColor, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(HexColor::parse_or(&s, HexColor::BLACK))
}

/// A resolved paint: straight RGB plus an alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Paint {
    pub fn opaque(color: &HexColor) -> Self {
        let [r, g, b] = color.channels();
        Self { r, g, b, alpha: 1.0 }
    }

    /// Blend a hex color with a `0..=100` opacity percentage. Values above 100 saturate.
    pub fn from_hex_opacity(hex: &str, opacity_pct: u8) -> Self {
        let [r, g, b] = hex_channels(hex);
        let pct = opacity_pct.min(100);
        Self {
            r,
            g,
            b,
            alpha: f64::from(pct) / 100.0,
        }
    }

    pub fn transparent(self) -> Self {
        Self { alpha: 0.0, ..self }
    }

    pub fn is_transparent(self) -> bool {
        self.alpha <= 0.0
    }

    /// Alpha quantized to a byte.
    pub fn alpha_u8(self) -> u8 {
        (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.alpha_u8()]
    }

    /// CSS `rgba()` form, e.g. `rgba(0, 0, 0, 0.8)`.
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.alpha)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
