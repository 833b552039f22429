use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, Rect};
use crate::style::color::Paint;
use crate::style::schema::{FontFamily, TextAlign};

/// Vertical gap between stacked text lines.
pub const LINE_GAP_PX: f64 = 8.0;
/// Line box height as a multiple of font size, used when no text measurement is available.
pub const LINE_HEIGHT_FACTOR: f64 = 1.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRole {
    Name,
    Dialogue,
    Secondary,
}

/// One visible text line, fully styled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub role: LineRole,
    pub display_text: String,
    pub font_family: FontFamily,
    pub font_size_px: u32,
    pub color: Paint,
    pub italic: bool,
    pub outline: bool,
    pub align: TextAlign,
}

impl TextLine {
    pub fn estimated_height_px(&self) -> f64 {
        f64::from(self.font_size_px) * LINE_HEIGHT_FACTOR
    }
}

/// Full-width bottom fade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientFade {
    /// Paint at the bottom edge; the fade ends fully transparent at the top of the region.
    pub color: Paint,
    /// Fraction of container height kept below the text block.
    pub bottom_padding_frac: f64,
    /// Fixed fade margin above the text block.
    pub fade_margin_px: f64,
    pub text_inset_px: f64,
}

impl GradientFade {
    /// Height of the fade region excluding the text block.
    pub fn fade_span_px(&self, container_height: f64) -> f64 {
        self.bottom_padding_frac * container_height + self.fade_margin_px
    }
}

/// Bordered block inset from the container edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelBox {
    pub fill: Paint,
    pub side_inset_px: f64,
    /// Fraction of container height between the panel and the bottom edge.
    pub bottom_margin_frac: f64,
    pub inner_padding_px: f64,
    pub corner_radius_px: f64,
    pub decoration: Decoration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Decoration {
    None,
    /// Thick ornamental border with an outer glow.
    Ornate {
        border_width_px: f64,
        border: Paint,
        glow_radius_px: f64,
        glow: Paint,
    },
    /// Thin border.
    Delicate { border_width_px: f64, border: Paint },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BoxPaint {
    Gradient(GradientFade),
    Panel(PanelBox),
}

impl BoxPaint {
    /// Width available to text inside the box.
    pub fn text_width_px(&self, canvas: Canvas) -> f64 {
        let w = f64::from(canvas.width);
        let inset = match self {
            BoxPaint::Gradient(g) => 2.0 * g.text_inset_px,
            BoxPaint::Panel(p) => 2.0 * (p.side_inset_px + p.inner_padding_px),
        };
        (w - inset).max(1.0)
    }

    /// Box and text rectangles for a container and a measured text block height.
    pub fn frame(&self, canvas: Canvas, content_height: f64) -> BoxFrame {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        match self {
            BoxPaint::Gradient(g) => {
                let text_bottom = h - g.bottom_padding_frac * h;
                let text_top = text_bottom - content_height;
                let top = (h - g.fade_span_px(h) - content_height).max(0.0);
                BoxFrame {
                    rect: Rect::new(0.0, top, w, h),
                    text_area: Rect::new(
                        g.text_inset_px,
                        text_top,
                        w - g.text_inset_px,
                        text_bottom,
                    ),
                    corner_radius_px: 0.0,
                }
            }
            BoxPaint::Panel(p) => {
                let bottom = h - p.bottom_margin_frac * h;
                let top = bottom - content_height - 2.0 * p.inner_padding_px;
                let rect = Rect::new(p.side_inset_px, top, w - p.side_inset_px, bottom);
                BoxFrame {
                    rect,
                    text_area: rect.inset(-p.inner_padding_px),
                    corner_radius_px: p.corner_radius_px,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxFrame {
    pub rect: Rect,
    pub text_area: Rect,
    pub corner_radius_px: f64,
}

/// Side-effect-free description of what to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    /// Visible lines in stacking order: name, dialogue, secondary. Absent lines are omitted.
    pub lines: Vec<TextLine>,
    pub box_paint: BoxPaint,
}

impl RenderPlan {
    pub fn line(&self, role: LineRole) -> Option<&TextLine> {
        self.lines.iter().find(|l| l.role == role)
    }

    /// Pixel layout given per-line heights (same order as `lines`).
    pub fn layout(&self, canvas: Canvas, line_heights: &[f64]) -> SceneLayout {
        let content = stack_height(line_heights);
        let frame = self.box_paint.frame(canvas, content);
        let area = frame.text_area;
        let mut y = area.y0;
        let mut lines = Vec::with_capacity(line_heights.len());
        for lh in line_heights {
            lines.push(Rect::new(area.x0, y, area.x1, y + lh));
            y += lh + LINE_GAP_PX;
        }
        SceneLayout { frame, lines }
    }

    /// Layout from font-size estimates, for hosts without text shaping.
    pub fn layout_estimate(&self, canvas: Canvas) -> SceneLayout {
        let heights: Vec<f64> = self.lines.iter().map(TextLine::estimated_height_px).collect();
        self.layout(canvas, &heights)
    }
}

/// Height of stacked lines including gaps; zero lines stack to zero.
pub fn stack_height(line_heights: &[f64]) -> f64 {
    let gaps = line_heights.len().saturating_sub(1) as f64 * LINE_GAP_PX;
    line_heights.iter().sum::<f64>() + gaps
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    pub frame: BoxFrame,
    /// One rect per plan line.
    pub lines: Vec<Rect>,
}
