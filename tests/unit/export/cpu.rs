use super::*;
use crate::resolve::resolver::resolve;
use crate::scene::state::SceneState;
use crate::style::color::HexColor;
use crate::style::schema::{BoxKind, FontFamily, TextAlign};

fn textless(kind: BoxKind, color: &str, opacity: u8, padding: u8) -> RenderPlan {
    let mut state = SceneState {
        character_name: String::new(),
        dialogue: String::new(),
        secondary_dialogue: String::new(),
        ..SceneState::default()
    };
    let b = &mut state.template.box_style;
    b.kind = kind;
    b.background_color = HexColor::parse(color).unwrap();
    b.opacity = opacity;
    b.padding = padding;
    resolve(&state)
}

fn rasterizer() -> CpuRasterizer {
    CpuRasterizer::new(
        Canvas::new(200, 100).unwrap(),
        2,
        [0, 0, 0, 255],
        std::env::temp_dir().join("vnscene-no-fonts-needed"),
    )
}

#[test]
fn fit_letterboxes_and_centers() {
    let r = image_placement(Canvas::PREVIEW, 640, 640, ImageScale::Fit);
    assert_eq!(r.height(), 720.0);
    assert_eq!(r.width(), 720.0);
    assert_eq!(r.x0, 280.0);
    assert_eq!(r.y0, 0.0);
}

#[test]
fn original_keeps_natural_size_and_may_overflow() {
    let r = image_placement(Canvas::PREVIEW, 2000, 100, ImageScale::Original);
    assert_eq!(r.width(), 2000.0);
    assert_eq!(r.height(), 100.0);
    assert_eq!(r.x0, -360.0);
    assert_eq!(r.y0, 310.0);
}

#[test]
fn vertical_gradient_runs_top_to_bottom() {
    let bytes = vertical_gradient(
        Rgba8Premul::transparent(),
        Rgba8Premul::from_straight_rgba(255, 255, 255, 255),
        3,
    );
    assert_eq!(bytes.len(), 12);
    assert_eq!(&bytes[0..4], &[0, 0, 0, 0]);
    assert_eq!(&bytes[4..8], &[128, 128, 128, 128]);
    assert_eq!(&bytes[8..12], &[255, 255, 255, 255]);
}

#[test]
fn straight_conversion_undoes_premultiply() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 32, 0, 128],
        premultiplied: true,
    }
    .into_straight();
    assert!(!frame.premultiplied);
    assert_eq!(frame.pixel(0, 0), Some([128, 64, 0, 128]));
    assert_eq!(frame.pixel(1, 0), None);
}

#[test]
fn output_is_supersampled() {
    let frame = rasterizer()
        .render(&textless(BoxKind::Solid, "#ff0000", 100, 10), None)
        .unwrap();
    assert_eq!((frame.width, frame.height), (400, 200));
    assert_eq!(frame.data.len(), 400 * 200 * 4);
}

#[test]
fn solid_panel_fills_over_black_backdrop() {
    let frame = rasterizer()
        .render(&textless(BoxKind::Solid, "#ff0000", 100, 10), None)
        .unwrap();
    // Panel spans x 32..168, y 42..90 in logical px.
    assert_eq!(frame.pixel(200, 132), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(4, 4), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(200, 195), Some([0, 0, 0, 255]));
}

#[test]
fn gradient_fades_in_toward_the_bottom() {
    let frame = rasterizer()
        .render(&textless(BoxKind::Gradient, "#ffffff", 100, 0), None)
        .unwrap();
    let top = frame.pixel(20, 0).unwrap();
    let bottom = frame.pixel(20, 199).unwrap();
    assert_eq!(top, [0, 0, 0, 255]);
    assert!(bottom[0] >= 250, "bottom row should be near white: {bottom:?}");
    assert_eq!(bottom[3], 255);
}

#[test]
fn corrupt_font_file_fails_only_when_text_is_drawn() {
    let dir = std::env::temp_dir().join("vnscene-corrupt-fonts-cpu");
    std::fs::create_dir_all(&dir).unwrap();
    for family in FontFamily::ALL {
        std::fs::write(dir.join(family.file_name()), b"not a font").unwrap();
    }
    let mut r = CpuRasterizer::new(Canvas::new(200, 100).unwrap(), 1, [0, 0, 0, 255], dir);
    assert!(
        r.render(&textless(BoxKind::Solid, "#ff0000", 100, 10), None)
            .is_ok()
    );
    assert!(r.render(&resolve(&SceneState::default()), None).is_err());
}

fn fixture_fonts(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vnscene-fixture-fonts-{tag}"));
    std::fs::create_dir_all(&dir).unwrap();
    let src = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("fonts")
        .join("DejaVuSans.ttf");
    for family in FontFamily::ALL {
        std::fs::copy(&src, dir.join(family.file_name())).unwrap();
    }
    dir
}

fn text_plan(
    dialogue: &str,
    size: u32,
    align: TextAlign,
    panel: &str,
    outline: bool,
) -> RenderPlan {
    let mut state = SceneState {
        character_name: String::new(),
        dialogue: dialogue.into(),
        secondary_dialogue: String::new(),
        ..SceneState::default()
    };
    let d = &mut state.template.dialogue_style;
    d.font_family = FontFamily::Sans;
    d.font_size = size;
    d.color = HexColor::white();
    d.has_outline = outline;
    d.is_italic = false;
    let b = &mut state.template.box_style;
    b.kind = BoxKind::Solid;
    b.background_color = HexColor::parse(panel).unwrap();
    b.opacity = 100;
    b.padding = 5;
    b.text_align = align;
    resolve(&state)
}

fn text_rasterizer(tag: &str) -> CpuRasterizer {
    CpuRasterizer::new(
        Canvas::new(400, 200).unwrap(),
        1,
        [0, 0, 0, 255],
        fixture_fonts(tag),
    )
}

fn is_white(px: [u8; 4]) -> bool {
    px[0] > 160 && px[1] > 160 && px[2] > 160
}

fn is_dark(px: [u8; 4]) -> bool {
    px[0] < 96 && px[1] < 96 && px[2] < 96
}

/// Inclusive bounds `(x0, y0, x1, y1)` of pixels matching `pred` inside `area`.
fn bounds(
    frame: &FrameRGBA,
    area: Rect,
    pred: fn([u8; 4]) -> bool,
) -> Option<(u32, u32, u32, u32)> {
    let mut out: Option<(u32, u32, u32, u32)> = None;
    for y in area.y0.max(0.0) as u32..(area.y1.ceil() as u32).min(frame.height) {
        for x in area.x0.max(0.0) as u32..(area.x1.ceil() as u32).min(frame.width) {
            if !pred(frame.pixel(x, y).unwrap()) {
                continue;
            }
            out = Some(match out {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    out
}

fn whole(frame: &FrameRGBA) -> Rect {
    Rect::new(0.0, 0.0, f64::from(frame.width), f64::from(frame.height))
}

#[test]
fn single_line_lands_inside_its_line_rect() {
    let plan = text_plan("Hi", 24, TextAlign::Left, "#000000", false);
    let mut r = text_rasterizer("single");
    let layout = r.measure(&plan).unwrap();
    let frame = r.render(&plan, None).unwrap();

    let (x0, y0, x1, y1) = bounds(&frame, whole(&frame), is_white).expect("text ink");
    let line = layout.lines[0];
    let area = layout.frame.text_area;
    assert!(f64::from(y0) >= line.y0 - 1.0, "ink top {y0} above line {line:?}");
    assert!(f64::from(y1) <= line.y1 + 1.0, "ink bottom {y1} below line {line:?}");
    assert!(f64::from(x0) >= area.x0 - 1.0 && f64::from(x1) <= area.x1 + 1.0);
    // Cap height of a 24px face is well over half the size.
    assert!(y1 - y0 >= 12, "glyphs look collapsed: {y0}..{y1}");
}

#[test]
fn wrapped_lines_stack_downward_without_overlap() {
    let plan = text_plan(&"HHHH ".repeat(8), 24, TextAlign::Left, "#000000", false);
    let mut r = text_rasterizer("wrapped");
    let layout = r.measure(&plan).unwrap();
    let frame = r.render(&plan, None).unwrap();
    let area = layout.frame.text_area;

    let mut bands = Vec::new();
    let mut inside = false;
    for y in 0..frame.height {
        let row = Rect::new(0.0, f64::from(y), f64::from(frame.width), f64::from(y + 1));
        let inked = bounds(&frame, row, is_white).is_some();
        if inked && !inside {
            bands.push(y);
        }
        inside = inked;
    }
    assert!(bands.len() >= 3, "expected separate rows of text, got {bands:?}");
    assert!(bands.windows(2).all(|w| w[1] - w[0] >= 20));

    let (_, y0, _, y1) = bounds(&frame, whole(&frame), is_white).unwrap();
    assert!(f64::from(y0) >= area.y0 - 1.0 && f64::from(y1) <= area.y1 + 1.0);
    assert!(f64::from(y1 - y0) > 2.0 * 24.0);
}

#[test]
fn alignment_shifts_text_across_the_box() {
    let mut r = text_rasterizer("align");
    let mut spans = Vec::new();
    let mut area = Rect::ZERO;
    for align in [TextAlign::Left, TextAlign::Center, TextAlign::Right] {
        let plan = text_plan("Hi", 24, align, "#000000", false);
        area = r.measure(&plan).unwrap().frame.text_area;
        let frame = r.render(&plan, None).unwrap();
        let (x0, _, x1, _) = bounds(&frame, whole(&frame), is_white).unwrap();
        spans.push((f64::from(x0), f64::from(x1)));
    }
    let ((l0, _), (c0, c1), (_, r1)) = (spans[0], spans[1], spans[2]);
    assert!(l0 >= area.x0 && l0 <= area.x0 + 5.0, "left ink at {l0}, area {area:?}");
    assert!(r1 <= area.x1 && r1 >= area.x1 - 5.0, "right ink at {r1}, area {area:?}");
    let mid = (area.x0 + area.x1) / 2.0;
    assert!(((c0 + c1) / 2.0 - mid).abs() <= 4.0, "centered ink {c0}..{c1}, mid {mid}");
    assert!(l0 < c0 && c0 < spans[2].0);
}

#[test]
fn outline_draws_a_dark_halo_around_glyphs() {
    let mut r = text_rasterizer("outline");
    let plain = text_plan("HI", 48, TextAlign::Center, "#ffffff", false);
    let area = r.measure(&plain).unwrap().frame.text_area;
    let frame = r.render(&plain, None).unwrap();
    assert_eq!(bounds(&frame, area, is_dark), None);

    let outlined = text_plan("HI", 48, TextAlign::Center, "#ffffff", true);
    let frame = r.render(&outlined, None).unwrap();
    let (x0, y0, x1, y1) = bounds(&frame, area, is_dark).expect("outline ink");
    assert!(y1 - y0 >= 24 && x1 > x0);
}
