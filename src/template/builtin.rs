use std::sync::LazyLock;

use crate::style::color::HexColor;
use crate::style::schema::{BoxKind, BoxStyle, FontFamily, TextAlign, TextStyle};
use crate::template::model::{Template, TemplateId};

pub const CINEMATIC_ID: &str = "cinematic";
pub const FANTASY_ID: &str = "fantasy";
pub const ROMANCE_ID: &str = "romance";

static BUILTINS: LazyLock<[Template; 3]> = LazyLock::new(|| [cinematic(), fantasy(), romance()]);

/// The fixed built-in catalog in declaration order.
pub fn list_builtins() -> &'static [Template] {
    BUILTINS.as_slice()
}

/// A fresh copy of `cinematic`, the template of a new scene.
pub fn default_template() -> Template {
    BUILTINS[0].clone()
}

pub fn find_builtin(id: &str) -> Option<&'static Template> {
    list_builtins().iter().find(|t| t.id.as_str() == id)
}

pub fn is_builtin_id(id: &str) -> bool {
    find_builtin(id).is_some()
}

fn text(family: FontFamily, size: u32, color: &str, outline: bool, italic: bool) -> TextStyle {
    TextStyle {
        font_family: family,
        font_size: size,
        color: HexColor::parse_or(color, HexColor::WHITE),
        has_outline: outline,
        is_italic: italic,
    }
}

fn cinematic() -> Template {
    Template {
        id: TemplateId::from_raw(CINEMATIC_ID),
        name: "Cinematic".to_owned(),
        name_style: text(FontFamily::Sans, 28, "#ffd166", true, false),
        dialogue_style: text(FontFamily::Sans, 24, "#ffffff", true, false),
        secondary_dialogue_style: text(FontFamily::Sans, 18, "#cccccc", true, true),
        box_style: BoxStyle {
            kind: BoxKind::Gradient,
            background_color: HexColor::black(),
            opacity: 80,
            padding: 5,
            text_align: TextAlign::Left,
        },
    }
}

fn fantasy() -> Template {
    Template {
        id: TemplateId::from_raw(FANTASY_ID),
        name: "Fantasy".to_owned(),
        name_style: text(FontFamily::Display, 30, "#f5d76e", false, false),
        dialogue_style: text(FontFamily::Serif, 22, "#f4ecd8", false, false),
        secondary_dialogue_style: text(FontFamily::Serif, 17, "#c9b99a", false, true),
        box_style: BoxStyle {
            kind: BoxKind::Fantasy,
            background_color: HexColor::parse_or("#1f1a3a", HexColor::BLACK),
            opacity: 90,
            padding: 4,
            text_align: TextAlign::Left,
        },
    }
}

fn romance() -> Template {
    Template {
        id: TemplateId::from_raw(ROMANCE_ID),
        name: "Romance".to_owned(),
        name_style: text(FontFamily::Script, 32, "#d6336c", false, false),
        dialogue_style: text(FontFamily::Sans, 22, "#4a2c3a", false, false),
        secondary_dialogue_style: text(FontFamily::Sans, 17, "#8a5a6e", false, true),
        box_style: BoxStyle {
            kind: BoxKind::Romance,
            background_color: HexColor::parse_or("#fff0f5", HexColor::BLACK),
            opacity: 85,
            padding: 4,
            text_align: TextAlign::Center,
        },
    }
}
