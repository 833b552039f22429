use serde::{Deserialize, Serialize};

use crate::style::color::{HexColor, de_box_color, de_text_color};

pub const FONT_SIZE_MIN: u32 = 12;
pub const FONT_SIZE_MAX: u32 = 72;
pub const OPACITY_MAX: u8 = 100;
pub const PADDING_MAX: u8 = 50;

/// Known font tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    Sans,
    Serif,
    Display,
    Script,
    Mono,
}

impl FontFamily {
    pub const ALL: [FontFamily; 5] = [
        FontFamily::Sans,
        FontFamily::Serif,
        FontFamily::Display,
        FontFamily::Script,
        FontFamily::Mono,
    ];

    pub fn token(self) -> &'static str {
        match self {
            FontFamily::Sans => "sans",
            FontFamily::Serif => "serif",
            FontFamily::Display => "display",
            FontFamily::Script => "script",
            FontFamily::Mono => "mono",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.token() == token)
    }

    /// CSS font stack for preview hosts.
    pub fn css_stack(self) -> &'static str {
        match self {
            FontFamily::Sans => "\"Noto Sans\", sans-serif",
            FontFamily::Serif => "\"Noto Serif\", serif",
            FontFamily::Display => "\"Cinzel\", serif",
            FontFamily::Script => "\"Dancing Script\", cursive",
            FontFamily::Mono => "\"JetBrains Mono\", monospace",
        }
    }

    /// Font file looked up in the exporter's fonts directory.
    pub fn file_name(self) -> &'static str {
        match self {
            FontFamily::Sans => "NotoSans-Regular.ttf",
            FontFamily::Serif => "NotoSerif-Regular.ttf",
            FontFamily::Display => "Cinzel-Regular.ttf",
            FontFamily::Script => "DancingScript-Regular.ttf",
            FontFamily::Mono => "JetBrainsMono-Regular.ttf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: FontFamily,
    pub font_size: u32,
    #[serde(deserialize_with = "de_text_color")]
    pub color: HexColor,
    pub has_outline: bool,
    pub is_italic: bool,
}

/// Box treatment discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BoxKind {
    Gradient,
    Solid,
    Fantasy,
    Romance,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxStyle {
    #[serde(rename = "type")]
    pub kind: BoxKind,
    #[serde(deserialize_with = "de_box_color")]
    pub background_color: HexColor,
    pub opacity: u8, // percent
    pub padding: u8, // percent of container height
    pub text_align: TextAlign,
}
