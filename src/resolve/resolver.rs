use crate::resolve::plan::{
    BoxPaint, Decoration, GradientFade, LineRole, PanelBox, RenderPlan, TextLine,
};
use crate::scene::edit::{clamp_font_size, clamp_opacity, clamp_padding};
use crate::scene::state::SceneState;
use crate::style::color::Paint;
use crate::style::schema::{BoxKind, BoxStyle, TextAlign, TextStyle};

pub const FADE_MARGIN_PX: f64 = 96.0;
pub const GRADIENT_TEXT_INSET_PX: f64 = 48.0;
pub const PANEL_SIDE_INSET_PX: f64 = 32.0;
pub const PANEL_INNER_PADDING_PX: f64 = 24.0;

const SOLID_RADIUS_PX: f64 = 12.0;
const FANTASY_RADIUS_PX: f64 = 6.0;
const ROMANCE_RADIUS_PX: f64 = 28.0;
const FANTASY_BORDER: &str = "#d4af37";
const ROMANCE_BORDER: &str = "#ffc0cb";

/// Resolve the live template and scene text into a render plan.
///
/// Empty and whitespace-only fields produce no line. Out-of-range sizes, opacity and padding
/// are clamped to their documented bounds.
pub fn resolve(state: &SceneState) -> RenderPlan {
    let t = &state.template;
    let align = t.box_style.text_align;

    let lines = [
        (LineRole::Name, &state.character_name, &t.name_style),
        (LineRole::Dialogue, &state.dialogue, &t.dialogue_style),
        (
            LineRole::Secondary,
            &state.secondary_dialogue,
            &t.secondary_dialogue_style,
        ),
    ]
    .into_iter()
    .filter_map(|(role, text, style)| text_line(role, text, style, align))
    .collect();

    RenderPlan {
        lines,
        box_paint: box_paint(&t.box_style),
    }
}

fn text_line(
    role: LineRole,
    text: &str,
    style: &TextStyle,
    align: TextAlign,
) -> Option<TextLine> {
    if text.trim().is_empty() {
        return None;
    }
    Some(TextLine {
        role,
        display_text: text.to_owned(),
        font_family: style.font_family,
        font_size_px: clamp_font_size(i64::from(style.font_size)),
        color: Paint::opaque(&style.color),
        italic: style.is_italic,
        outline: style.has_outline,
        align,
    })
}

fn box_paint(b: &BoxStyle) -> BoxPaint {
    let opacity = clamp_opacity(i64::from(b.opacity));
    let fill = Paint::from_hex_opacity(b.background_color.as_str(), opacity);
    let pad_frac = f64::from(clamp_padding(i64::from(b.padding))) / 100.0;

    let panel = |corner_radius_px: f64, decoration: Decoration| {
        BoxPaint::Panel(PanelBox {
            fill,
            side_inset_px: PANEL_SIDE_INSET_PX,
            bottom_margin_frac: pad_frac,
            inner_padding_px: PANEL_INNER_PADDING_PX,
            corner_radius_px,
            decoration,
        })
    };

    match b.kind {
        BoxKind::Gradient => BoxPaint::Gradient(GradientFade {
            color: fill,
            bottom_padding_frac: pad_frac,
            fade_margin_px: FADE_MARGIN_PX,
            text_inset_px: GRADIENT_TEXT_INSET_PX,
        }),
        BoxKind::Solid => panel(SOLID_RADIUS_PX, Decoration::None),
        BoxKind::Fantasy => panel(
            FANTASY_RADIUS_PX,
            Decoration::Ornate {
                border_width_px: 4.0,
                border: Paint::from_hex_opacity(FANTASY_BORDER, 100),
                glow_radius_px: 18.0,
                glow: Paint::from_hex_opacity(FANTASY_BORDER, 45),
            },
        ),
        BoxKind::Romance => panel(
            ROMANCE_RADIUS_PX,
            Decoration::Delicate {
                border_width_px: 1.5,
                border: Paint::from_hex_opacity(ROMANCE_BORDER, 100),
            },
        ),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/resolver.rs"]
mod tests;
