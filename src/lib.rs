//! vnscene composes single visual novel scenes: a background image, a character name and
//! one or two dialogue lines inside a styled dialogue box.
//!
//! - Pick or author a [`Template`] and apply it to a [`SceneState`]
//! - Edit text and style through a [`SceneStore`], which autosaves on every commit
//! - [`resolve`] the state into a [`RenderPlan`] and export it as a PNG
#![forbid(unsafe_code)]

mod foundation;

/// Background image references and export-time asset loading.
pub mod assets;
/// PNG export.
pub mod export;
/// Autosave slots and project files.
pub mod persist;
/// Style to render-plan resolution.
pub mod resolve;
/// Scene state, edits and the store.
pub mod scene;
/// Style schema and colors.
pub mod style;
/// Built-in and user templates.
pub mod template;

pub use crate::foundation::core::{Canvas, Point, Rect, Rgba8Premul, Size};
pub use crate::foundation::error::{SceneError, SceneResult};

pub use crate::export::cpu::FrameRGBA;
pub use crate::export::{ExportJob, ExportOpts, ExportRequest, export_png};
pub use crate::persist::autosave::Autosave;
pub use crate::persist::kv::{FileKv, KvStore, MemoryKv};
pub use crate::resolve::plan::RenderPlan;
pub use crate::resolve::resolver::resolve;
pub use crate::scene::edit::StyleEdit;
pub use crate::scene::state::{ImageRef, ImageScale, ScenePatch, SceneState};
pub use crate::scene::store::{SceneStore, StoreListener};
pub use crate::template::model::{CustomTemplateId, Template, TemplateId};
