//! PNG export of a resolved scene.
//!
//! Export never reads the live store: callers snapshot the scene into an [`ExportRequest`]
//! first, then rasterize it here or on an [`ExportJob`] thread.

pub mod cpu;
pub mod job;

use std::path::{Path, PathBuf};

use crate::assets::decode::prepare_image_ref;
use crate::export::cpu::{CpuRasterizer, FrameRGBA};
use crate::foundation::core::Canvas;
use crate::foundation::error::{SceneError, SceneResult};
use crate::resolve::plan::RenderPlan;
use crate::resolve::resolver::resolve;
use crate::scene::state::{ImageRef, ImageScale, SceneState};

pub use job::ExportJob;

pub const EXPORT_FILE_NAME: &str = "vn-scene-export.png";
pub const DEFAULT_EXPORT_SCALE: u32 = 2;
pub const MAX_EXPORT_SCALE: u32 = 4;
pub const DEFAULT_FONTS_DIR: &str = "fonts";

/// Export settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOpts {
    /// Logical container size the scene is laid out in.
    pub canvas: Canvas,
    /// Integer supersampling factor applied on output.
    pub scale: u32,
    /// Straight-alpha RGBA8 drawn under everything else.
    pub backdrop_rgba: [u8; 4],
    pub fonts_dir: PathBuf,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::PREVIEW,
            scale: DEFAULT_EXPORT_SCALE,
            backdrop_rgba: [0, 0, 0, 255],
            fonts_dir: PathBuf::from(DEFAULT_FONTS_DIR),
        }
    }
}

impl ExportOpts {
    /// Defaults with `VNSCENE_FONTS_DIR` and `VNSCENE_EXPORT_SCALE` applied.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(dir) = std::env::var_os("VNSCENE_FONTS_DIR").filter(|v| !v.is_empty()) {
            opts.fonts_dir = PathBuf::from(dir);
        }
        if let Some(scale) = std::env::var("VNSCENE_EXPORT_SCALE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&n| (1..=MAX_EXPORT_SCALE).contains(&n))
        {
            opts.scale = scale;
        }
        opts
    }

    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_backdrop(mut self, rgba: [u8; 4]) -> Self {
        self.backdrop_rgba = rgba;
        self
    }

    pub fn with_fonts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fonts_dir = dir.into();
        self
    }

    pub fn validate(&self) -> SceneResult<()> {
        if !(1..=MAX_EXPORT_SCALE).contains(&self.scale) {
            return Err(SceneError::export(format!(
                "export scale must be in 1..={MAX_EXPORT_SCALE}, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Immutable snapshot of everything an export needs.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportRequest {
    pub plan: RenderPlan,
    pub image: Option<ImageRef>,
    pub image_scale: ImageScale,
}

impl ExportRequest {
    pub fn from_state(state: &SceneState) -> Self {
        Self {
            plan: resolve(state),
            image: state.image.clone(),
            image_scale: state.image_scale,
        }
    }
}

/// Rasterize `req` to a straight-alpha frame.
#[tracing::instrument(skip(req, opts), fields(scale = opts.scale))]
pub fn render_frame(req: &ExportRequest, opts: &ExportOpts) -> SceneResult<FrameRGBA> {
    opts.validate()?;
    let background = req.image.as_ref().map(prepare_image_ref).transpose()?;
    let mut raster = CpuRasterizer::new(
        opts.canvas,
        opts.scale,
        opts.backdrop_rgba,
        opts.fonts_dir.clone(),
    );
    let frame = raster.render(
        &req.plan,
        background.as_ref().map(|img| (img, req.image_scale)),
    )?;
    Ok(frame.into_straight())
}

/// Render `req` and write it as a PNG to `out_path`.
#[tracing::instrument(skip(req, opts))]
pub fn export_png(req: &ExportRequest, opts: &ExportOpts, out_path: &Path) -> SceneResult<()> {
    render_frame(req, opts)
        .and_then(|frame| write_png(&frame, out_path))
        .map_err(|err| export_failed(err, out_path))
}

/// Normalize any failure to `SceneError::Export` and log it.
pub(crate) fn export_failed(err: SceneError, out_path: &Path) -> SceneError {
    let err = match err {
        SceneError::Export(_) => err,
        other => SceneError::export(other.to_string()),
    };
    tracing::error!(error = %err, path = %out_path.display(), "export failed");
    err
}

pub(crate) fn write_png(frame: &FrameRGBA, out_path: &Path) -> SceneResult<()> {
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    image::save_buffer_with_format(
        out_path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| SceneError::export(format!("write png '{}': {e}", out_path.display())))?;
    tracing::debug!(
        width = frame.width,
        height = frame.height,
        path = %out_path.display(),
        "wrote png"
    );
    Ok(())
}
