use super::*;
use crate::foundation::core::Canvas;
use crate::resolve::plan::stack_height;
use crate::style::color::HexColor;
use crate::template::builtin::find_builtin;
use crate::template::registry::{TemplateSource, apply};

fn scene(name: &str, dialogue: &str, secondary: &str) -> SceneState {
    SceneState {
        character_name: name.to_owned(),
        dialogue: dialogue.to_owned(),
        secondary_dialogue: secondary.to_owned(),
        ..SceneState::default()
    }
}

#[test]
fn empty_lines_are_absent_not_blank() {
    let plan = resolve(&scene("", "Hello", ""));
    assert_eq!(plan.lines.len(), 1);
    assert_eq!(plan.lines[0].role, LineRole::Dialogue);
    assert_eq!(plan.lines[0].display_text, "Hello");
    assert!(plan.line(LineRole::Name).is_none());
    assert!(plan.line(LineRole::Secondary).is_none());
}

#[test]
fn whitespace_only_lines_are_suppressed() {
    let plan = resolve(&scene("  \t", "Hello", "\n"));
    assert_eq!(plan.lines.len(), 1);
}

#[test]
fn lines_keep_stacking_order_and_styles() {
    let plan = resolve(&scene("Aiko", "  Hi there ", "Salut"));
    let roles: Vec<LineRole> = plan.lines.iter().map(|l| l.role).collect();
    assert_eq!(roles, [LineRole::Name, LineRole::Dialogue, LineRole::Secondary]);
    assert_eq!(plan.lines[1].display_text, "  Hi there ");

    let t = find_builtin("cinematic").unwrap();
    let name = &plan.lines[0];
    assert_eq!(name.font_family, t.name_style.font_family);
    assert_eq!(name.font_size_px, t.name_style.font_size);
    assert_eq!(name.outline, t.name_style.has_outline);
    assert_eq!(name.italic, t.name_style.is_italic);
    assert_eq!(name.color, Paint::opaque(&t.name_style.color));
    assert!(plan.lines.iter().all(|l| l.align == t.box_style.text_align));
}

#[test]
fn gradient_fade_span_follows_padding_not_text() {
    let mut s = scene("A", "B", "");
    s.template.box_style.kind = BoxKind::Gradient;
    s.template.box_style.padding = 20;
    let plan = resolve(&s);
    let BoxPaint::Gradient(g) = plan.box_paint else {
        panic!("expected gradient paint");
    };
    let canvas = Canvas::PREVIEW;
    let h = f64::from(canvas.height);
    assert_eq!(g.fade_span_px(h), 0.2 * h + FADE_MARGIN_PX);

    let mut longer = s.clone();
    longer.dialogue = "B ".repeat(200);
    let BoxPaint::Gradient(g2) = resolve(&longer).box_paint else {
        panic!("expected gradient paint");
    };
    assert_eq!(g2.fade_span_px(h), g.fade_span_px(h));

    let frame = plan.box_paint.frame(canvas, 0.0);
    assert_eq!(frame.rect.y1, h);
    assert_eq!(frame.rect.x0, 0.0);
    assert_eq!(frame.rect.width(), f64::from(canvas.width));
    assert_eq!(frame.rect.height(), 0.2 * h + FADE_MARGIN_PX);
    assert_eq!(frame.text_area.y1, h - 0.2 * h);
}

#[test]
fn gradient_paint_carries_opacity() {
    let mut s = SceneState::default();
    s.template.box_style.background_color = HexColor::black();
    s.template.box_style.opacity = 80;
    let BoxPaint::Gradient(g) = resolve(&s).box_paint else {
        panic!("expected gradient paint");
    };
    assert_eq!(g.color.to_css(), "rgba(0, 0, 0, 0.8)");
}

#[test]
fn panel_kinds_pick_their_decoration() {
    let base = SceneState::default();
    let fantasy = resolve(&apply(TemplateSource::Id("fantasy"), &base));
    let romance = resolve(&apply(TemplateSource::Id("romance"), &base));
    let mut solid_state = base.clone();
    solid_state.template.box_style.kind = BoxKind::Solid;
    let solid = resolve(&solid_state);

    let BoxPaint::Panel(f) = fantasy.box_paint else {
        panic!("fantasy should be a panel");
    };
    assert!(matches!(f.decoration, Decoration::Ornate { .. }));
    let BoxPaint::Panel(r) = romance.box_paint else {
        panic!("romance should be a panel");
    };
    assert!(matches!(r.decoration, Decoration::Delicate { .. }));
    assert!(r.corner_radius_px > f.corner_radius_px);
    let BoxPaint::Panel(s) = solid.box_paint else {
        panic!("solid should be a panel");
    };
    assert_eq!(s.decoration, Decoration::None);
    assert!(s.corner_radius_px > 0.0);
}

#[test]
fn panel_is_inset_and_anchored_by_padding() {
    let mut s = apply(TemplateSource::Id("fantasy"), &SceneState::default());
    s.template.box_style.padding = 10;
    let plan = resolve(&s);
    let canvas = Canvas::PREVIEW;
    let frame = plan.box_paint.frame(canvas, 100.0);
    let h = f64::from(canvas.height);
    assert_eq!(frame.rect.x0, PANEL_SIDE_INSET_PX);
    assert_eq!(frame.rect.x1, f64::from(canvas.width) - PANEL_SIDE_INSET_PX);
    assert_eq!(frame.rect.y1, h - 0.1 * h);
    assert_eq!(frame.rect.height(), 100.0 + 2.0 * PANEL_INNER_PADDING_PX);
    assert_eq!(frame.text_area.height(), 100.0);
}

#[test]
fn layout_collapses_absent_lines() {
    let full = resolve(&scene("A", "B", "C"));
    let one = resolve(&scene("", "B", ""));
    let canvas = Canvas::PREVIEW;
    let full_layout = full.layout_estimate(canvas);
    let one_layout = one.layout_estimate(canvas);
    assert_eq!(full_layout.lines.len(), 3);
    assert_eq!(one_layout.lines.len(), 1);
    assert!(one_layout.frame.rect.height() < full_layout.frame.rect.height());
    assert_eq!(stack_height(&[]), 0.0);
    assert_eq!(stack_height(&[10.0, 20.0]), 30.0 + crate::resolve::plan::LINE_GAP_PX);
}

#[test]
fn out_of_range_values_are_clamped() {
    let mut s = SceneState::default();
    s.template.dialogue_style.font_size = 500;
    s.template.name_style.font_size = 1;
    s.template.box_style.opacity = 255;
    s.template.box_style.padding = 90;
    let plan = resolve(&s);
    assert_eq!(plan.line(LineRole::Dialogue).unwrap().font_size_px, 72);
    assert_eq!(plan.line(LineRole::Name).unwrap().font_size_px, 12);
    let BoxPaint::Gradient(g) = plan.box_paint else {
        panic!("expected gradient paint");
    };
    assert_eq!(g.color.alpha, 1.0);
    assert_eq!(g.bottom_padding_frac, 0.5);
}

#[test]
fn resolve_is_deterministic() {
    let s = scene("A", "B", "C");
    assert_eq!(resolve(&s), resolve(&s));
}

#[test]
fn plan_serializes_for_preview_hosts() {
    let v = serde_json::to_value(resolve(&scene("A", "B", ""))).unwrap();
    assert_eq!(v["box_paint"]["kind"], "gradient");
    assert_eq!(v["lines"][0]["role"], "name");
}
