use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{SceneError, SceneResult};
use crate::style::schema::{FontFamily, TextAlign};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Font files for each family token, read lazily from one directory.
///
/// A family whose file is absent resolves to `None`; layout then falls back to the
/// family's CSS stack over the system fonts.
#[derive(Debug, Clone)]
pub struct FontBook {
    dir: PathBuf,
    loaded: HashMap<FontFamily, Option<Arc<Vec<u8>>>>,
}

impl FontBook {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            loaded: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn bytes(&mut self, family: FontFamily) -> SceneResult<Option<Arc<Vec<u8>>>> {
        if let Some(b) = self.loaded.get(&family) {
            return Ok(b.clone());
        }
        let path = self.dir.join(family.file_name());
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => Some(Arc::new(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    family = family.token(),
                    path = %path.display(),
                    "font file not found, using system fonts"
                );
                None
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!(
                        "read font '{}' for family '{}'",
                        path.display(),
                        family.token()
                    ))
                    .into());
            }
        };
        self.loaded.insert(family, bytes.clone());
        Ok(bytes)
    }
}

/// Style inputs for one shaped line.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LineStyle {
    pub(crate) size_px: f32,
    pub(crate) brush: TextBrushRgba8,
    pub(crate) italic: bool,
}

/// Stateful helper for building Parley text layouts from font files or system fonts.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<FontFamily, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_name(&mut self, family: FontFamily, font_bytes: &[u8]) -> SceneResult<String> {
        if let Some(name) = self.families.get(&family) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SceneError::validation("no font families registered from font bytes")
        })?;

        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SceneError::validation("registered font family has no name"))?
            .to_string();
        self.families.insert(family, name.clone());
        Ok(name)
    }

    /// Shape and wrap plain text to `max_width_px`. Lines are start-aligned; see
    /// [`line_offset_x`] for the per-line shift of centered and right-aligned text.
    ///
    /// Without `font_bytes` the family's CSS stack is matched against system fonts.
    pub(crate) fn layout_plain(
        &mut self,
        text: &str,
        family: FontFamily,
        font_bytes: Option<&[u8]>,
        style: LineStyle,
        max_width_px: f32,
    ) -> SceneResult<parley::Layout<TextBrushRgba8>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(SceneError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let stack = match font_bytes {
            Some(bytes) => Cow::Owned(self.family_name(family, bytes)?),
            None => Cow::Borrowed(family.css_stack()),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(stack),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(style.brush));
        if style.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(Some(max_width_px));
        layout.align(
            Some(max_width_px),
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

/// Horizontal shift of a wrapped line inside a box of `box_width` px.
pub(crate) fn line_offset_x(align: TextAlign, box_width: f32, line_advance: f32) -> f32 {
    let slack = (box_width - line_advance).max(0.0);
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => slack / 2.0,
        TextAlign::Right => slack,
    }
}
