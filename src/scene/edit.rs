//! Editing boundary for the live template.
//!
//! Raw control values are clamped here before they reach the state; malformed colors are
//! dropped. Nothing in this module returns an error.

use crate::scene::state::SceneState;
use crate::style::color::HexColor;
use crate::style::schema::{
    BoxKind, FONT_SIZE_MAX, FONT_SIZE_MIN, FontFamily, OPACITY_MAX, PADDING_MAX, TextAlign,
    TextStyle,
};

/// Which text line of the live template an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum TextTarget {
    Name,
    Dialogue,
    Secondary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextEdit {
    FontFamily(FontFamily),
    /// Clamped to `[12, 72]`.
    FontSize(i64),
    /// Ignored unless it parses as `#rrggbb`.
    Color(String),
    Outline(bool),
    Italic(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoxEdit {
    Kind(BoxKind),
    /// Ignored unless it parses as `#rrggbb`.
    BackgroundColor(String),
    /// Clamped to `[0, 100]`.
    Opacity(i64),
    /// Clamped to `[0, 50]`.
    Padding(i64),
    TextAlign(TextAlign),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StyleEdit {
    Text(TextTarget, TextEdit),
    Box(BoxEdit),
}

pub fn clamp_font_size(v: i64) -> u32 {
    v.clamp(i64::from(FONT_SIZE_MIN), i64::from(FONT_SIZE_MAX)) as u32
}

pub fn clamp_opacity(v: i64) -> u8 {
    v.clamp(0, i64::from(OPACITY_MAX)) as u8
}

pub fn clamp_padding(v: i64) -> u8 {
    v.clamp(0, i64::from(PADDING_MAX)) as u8
}

/// Apply one style edit to the live template, returning the next state.
pub fn apply_edit(state: &SceneState, edit: &StyleEdit) -> SceneState {
    let mut next = state.clone();
    match edit {
        StyleEdit::Text(target, e) => {
            let style = text_style_mut(&mut next, *target);
            apply_text_edit(style, e);
        }
        StyleEdit::Box(e) => {
            let b = &mut next.template.box_style;
            match e {
                BoxEdit::Kind(k) => b.kind = *k,
                BoxEdit::BackgroundColor(s) => match HexColor::parse(s) {
                    Some(c) => b.background_color = c,
                    None => tracing::warn!(value = %s, "ignored malformed box color"),
                },
                BoxEdit::Opacity(v) => b.opacity = clamp_opacity(*v),
                BoxEdit::Padding(v) => b.padding = clamp_padding(*v),
                BoxEdit::TextAlign(a) => b.text_align = *a,
            }
        }
    }
    next
}

/// Apply several edits as one transition.
pub fn apply_edits(state: &SceneState, edits: &[StyleEdit]) -> SceneState {
    edits
        .iter()
        .fold(state.clone(), |acc, e| apply_edit(&acc, e))
}

fn text_style_mut(state: &mut SceneState, target: TextTarget) -> &mut TextStyle {
    let t = &mut state.template;
    match target {
        TextTarget::Name => &mut t.name_style,
        TextTarget::Dialogue => &mut t.dialogue_style,
        TextTarget::Secondary => &mut t.secondary_dialogue_style,
    }
}

fn apply_text_edit(style: &mut TextStyle, e: &TextEdit) {
    match e {
        TextEdit::FontFamily(f) => style.font_family = *f,
        TextEdit::FontSize(v) => style.font_size = clamp_font_size(*v),
        TextEdit::Color(s) => match HexColor::parse(s) {
            Some(c) => style.color = c,
            None => tracing::warn!(value = %s, "ignored malformed text color"),
        },
        TextEdit::Outline(v) => style.has_outline = *v,
        TextEdit::Italic(v) => style.is_italic = *v,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/edit.rs"]
mod tests;
