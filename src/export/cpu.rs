use std::path::PathBuf;

use crate::assets::decode::PreparedImage;
use crate::assets::text::{FontBook, LineStyle, TextBrushRgba8, TextLayoutEngine, line_offset_x};
use crate::foundation::core::{Canvas, Rect, Rgba8Premul};
use crate::foundation::error::{SceneError, SceneResult};
use crate::resolve::plan::{
    BoxFrame, BoxPaint, Decoration, GradientFade, PanelBox, RenderPlan, SceneLayout,
};
use crate::scene::state::ImageScale;
use crate::style::color::Paint;

const GLOW_STEPS: u32 = 6;
const OUTLINE_DIRS: [(f32, f32); 8] = [
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 1.0),
    (0.0, 1.0),
    (1.0, 1.0),
];

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight alpha, as expected by PNG writers.
    pub fn into_straight(mut self) -> Self {
        if self.premultiplied {
            for px in self.data.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 || a == 255 {
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
            self.premultiplied = false;
        }
        self
    }

    /// Straight or premultiplied pixel at `(x, y)`, matching `premultiplied`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Where a background image lands in logical container coordinates.
///
/// `Fit` scales the image uniformly until it fits the container; `Original` keeps its
/// natural size. Either way it is centered and may overflow (and be clipped) on `Original`.
pub fn image_placement(canvas: Canvas, width: u32, height: u32, mode: ImageScale) -> Rect {
    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let iw = f64::from(width.max(1));
    let ih = f64::from(height.max(1));
    let s = match mode {
        ImageScale::Fit => (cw / iw).min(ch / ih),
        ImageScale::Original => 1.0,
    };
    let (w, h) = (iw * s, ih * s);
    let x0 = (cw - w) / 2.0;
    let y0 = (ch - h) / 2.0;
    Rect::new(x0, y0, x0 + w, y0 + h)
}

/// CPU rasterizer for a [`RenderPlan`], powered by `vello_cpu`.
pub struct CpuRasterizer {
    canvas: Canvas,
    scale: u32,
    backdrop_rgba: [u8; 4],
    fonts: FontBook,
    text: TextLayoutEngine,
}

impl std::fmt::Debug for CpuRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRasterizer")
            .field("canvas", &self.canvas)
            .field("scale", &self.scale)
            .field("fonts_dir", &self.fonts.dir())
            .finish_non_exhaustive()
    }
}

impl CpuRasterizer {
    pub fn new(
        canvas: Canvas,
        scale: u32,
        backdrop_rgba: [u8; 4],
        fonts_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            canvas,
            scale,
            backdrop_rgba,
            fonts: FontBook::new(fonts_dir),
            text: TextLayoutEngine::new(),
        }
    }

    /// Output size in device pixels.
    pub fn output_canvas(&self) -> SceneResult<Canvas> {
        self.canvas
            .scaled(self.scale)
            .map_err(|e| SceneError::export(e.to_string()))
    }

    /// Box frame and per-line rects of `plan`, measured with the fonts export uses.
    pub fn measure(&mut self, plan: &RenderPlan) -> SceneResult<SceneLayout> {
        Ok(self.shape(plan)?.1)
    }

    fn shape(
        &mut self,
        plan: &RenderPlan,
    ) -> SceneResult<(Vec<parley::Layout<TextBrushRgba8>>, SceneLayout)> {
        let max_width = plan.box_paint.text_width_px(self.canvas) as f32;
        let mut shaped = Vec::with_capacity(plan.lines.len());
        for line in &plan.lines {
            let bytes = self.fonts.bytes(line.font_family)?;
            let [cr, cg, cb, ca] = line.color.to_rgba8();
            let style = LineStyle {
                size_px: line.font_size_px as f32,
                brush: TextBrushRgba8 {
                    r: cr,
                    g: cg,
                    b: cb,
                    a: ca,
                },
                italic: line.italic,
            };
            let layout = self.text.layout_plain(
                &line.display_text,
                line.font_family,
                bytes.as_deref().map(Vec::as_slice),
                style,
                max_width,
            )?;
            shaped.push(layout);
        }

        let heights: Vec<f64> = shaped.iter().map(|l| f64::from(l.height())).collect();
        let layout = plan.layout(self.canvas, &heights);
        Ok((shaped, layout))
    }

    #[tracing::instrument(skip(self, plan, background), fields(lines = plan.lines.len()))]
    pub fn render(
        &mut self,
        plan: &RenderPlan,
        background: Option<(&PreparedImage, ImageScale)>,
    ) -> SceneResult<FrameRGBA> {
        let out = self.output_canvas()?;
        let w: u16 = out
            .width
            .try_into()
            .map_err(|_| SceneError::export("output width exceeds u16"))?;
        let h: u16 = out
            .height
            .try_into()
            .map_err(|_| SceneError::export("output height exceeds u16"))?;

        let s = f64::from(self.scale);
        let root = vello_cpu::kurbo::Affine::scale(s);
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let [r, g, b, a] = self.backdrop_rgba;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));

        if let Some((image, mode)) = background {
            draw_background(&mut ctx, root, self.canvas, image, mode)?;
        }

        let (shaped, layout) = self.shape(plan)?;

        match &plan.box_paint {
            BoxPaint::Gradient(fade) => draw_gradient(&mut ctx, &layout.frame, fade, self.scale)?,
            BoxPaint::Panel(panel) => draw_panel(&mut ctx, root, &layout.frame, panel),
        }

        for ((line, text), rect) in plan.lines.iter().zip(&shaped).zip(&layout.lines) {
            let outline_px = outline_width_px(line.font_size_px);

            for pline in text.lines() {
                let dx = line_offset_x(line.align, rect.width() as f32, pline.metrics().advance);
                let origin = (rect.x0 + f64::from(dx), rect.y0);
                ctx.set_transform(root * vello_cpu::kurbo::Affine::translate(origin));

                for item in pline.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let font = run.run().font();
                    let font_size = run.run().font_size();

                    if line.outline {
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
                        for (ox, oy) in OUTLINE_DIRS {
                            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                                id: g.id,
                                x: g.x + ox * outline_px,
                                y: g.y + oy * outline_px,
                            });
                            ctx.glyph_run(font).font_size(font_size).fill_glyphs(glyphs);
                        }
                    }

                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(font).font_size(font_size).fill_glyphs(glyphs);
                }
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: out.width,
            height: out.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn outline_width_px(font_size_px: u32) -> f32 {
    (font_size_px as f32 / 24.0).max(1.0)
}

fn color(p: Paint) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = p.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn draw_background(
    ctx: &mut vello_cpu::RenderContext,
    root: vello_cpu::kurbo::Affine,
    canvas: Canvas,
    image: &PreparedImage,
    mode: ImageScale,
) -> SceneResult<()> {
    let paint = image_paint(&image.rgba8_premul, image.width, image.height)?;
    let dest = image_placement(canvas, image.width, image.height, mode);
    let sx = dest.width() / f64::from(image.width.max(1));
    let sy = dest.height() / f64::from(image.height.max(1));

    ctx.set_transform(
        root * vello_cpu::kurbo::Affine::translate((dest.x0, dest.y0))
            * vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy),
    );
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(image.width),
        f64::from(image.height),
    ));
    Ok(())
}

/// Fade drawn at device resolution: one column, stretched across the width.
fn draw_gradient(
    ctx: &mut vello_cpu::RenderContext,
    frame: &BoxFrame,
    fade: &GradientFade,
    scale: u32,
) -> SceneResult<()> {
    let s = f64::from(scale);
    let y0 = (frame.rect.y0 * s).floor();
    let y1 = (frame.rect.y1 * s).ceil();
    let gh = (y1 - y0).max(1.0) as u32;
    let [r, g, b, a] = fade.color.to_rgba8();
    let bytes = vertical_gradient(
        Rgba8Premul::transparent(),
        Rgba8Premul::from_straight_rgba(r, g, b, a),
        gh,
    );
    let paint = image_paint(&bytes, 1, gh)?;

    ctx.set_transform(
        vello_cpu::kurbo::Affine::translate((frame.rect.x0 * s, y0))
            * vello_cpu::kurbo::Affine::scale_non_uniform(frame.rect.width() * s, 1.0),
    );
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 1.0, f64::from(gh)));
    Ok(())
}

fn draw_panel(
    ctx: &mut vello_cpu::RenderContext,
    root: vello_cpu::kurbo::Affine,
    frame: &BoxFrame,
    panel: &PanelBox,
) {
    use vello_cpu::kurbo::Shape as _;

    let rect = rect_to_cpu(frame.rect);
    let radius = frame.corner_radius_px;
    ctx.set_transform(root);

    if let Decoration::Ornate {
        glow_radius_px,
        glow,
        ..
    } = panel.decoration
    {
        let step = glow_radius_px / f64::from(GLOW_STEPS);
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(step));
        for i in 0..GLOW_STEPS {
            let fade = 1.0 - f64::from(i) / f64::from(GLOW_STEPS);
            let grow = step * f64::from(i) + step / 2.0;
            let alpha = (f64::from(glow.alpha_u8()) * fade).round() as u8;
            let [r, g, b, _] = glow.to_rgba8();
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, alpha));
            let ring =
                vello_cpu::kurbo::RoundedRect::from_rect(rect.inflate(grow, grow), radius + grow);
            ctx.stroke_path(&ring.to_path(0.1));
        }
    }

    if !panel.fill.is_transparent() {
        ctx.set_paint(color(panel.fill));
        let body = vello_cpu::kurbo::RoundedRect::from_rect(rect, radius);
        ctx.fill_path(&body.to_path(0.1));
    }

    let border = match panel.decoration {
        Decoration::None => None,
        Decoration::Ornate {
            border_width_px,
            border,
            ..
        }
        | Decoration::Delicate {
            border_width_px,
            border,
        } => Some((border_width_px, border)),
    };
    if let Some((width, paint)) = border {
        let half = width / 2.0;
        let inner = vello_cpu::kurbo::RoundedRect::from_rect(
            rect.inset(-half),
            (radius - half).max(0.0),
        );
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        ctx.set_paint(color(paint));
        ctx.stroke_path(&inner.to_path(0.1));
    }
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

/// One-pixel-wide premultiplied column from `top` to `bottom`.
pub(crate) fn vertical_gradient(top: Rgba8Premul, bottom: Rgba8Premul, h: u32) -> Vec<u8> {
    let h1 = (h.max(1) - 1) as f32;
    let mut bytes = Vec::with_capacity(h as usize * 4);
    let lerp = |a: u8, b: u8, t: f32| -> u8 {
        (f32::from(a) + (f32::from(b) - f32::from(a)) * t)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    for y in 0..h {
        let t = if h1 > 0.0 { y as f32 / h1 } else { 1.0 };
        bytes.extend_from_slice(&[
            lerp(top.r, bottom.r, t),
            lerp(top.g, bottom.g, t),
            lerp(top.b, bottom.b, t),
            lerp(top.a, bottom.a, t),
        ]);
    }
    bytes
}

fn image_paint(rgba8_premul: &[u8], width: u32, height: u32) -> SceneResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SceneError::export("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SceneError::export("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(SceneError::export("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);

    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/cpu.rs"]
mod tests;
