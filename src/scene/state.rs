use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{SceneError, SceneResult};
use crate::template::builtin::default_template;
use crate::template::model::Template;

pub const DEFAULT_CHARACTER_NAME: &str = "Character Name";
pub const DEFAULT_DIALOGUE: &str =
    "Welcome to the visual novel mockup tool. Type your dialogue here.";

/// Embeddable image reference, normally a `data:image/*;base64,...` URI kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageScale {
    /// Contain inside the container, centered.
    #[default]
    Fit,
    /// Natural pixel size, centered.
    Original,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneState {
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub image_scale: ImageScale,
    pub character_name: String,
    pub dialogue: String,
    #[serde(default)]
    pub secondary_dialogue: String,
    /// Live template, embedded by value.
    pub template: Template,
    /// User templates in insertion order.
    #[serde(default)]
    pub saved_templates: Vec<Template>,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            image: None,
            image_scale: ImageScale::Fit,
            character_name: DEFAULT_CHARACTER_NAME.to_owned(),
            dialogue: DEFAULT_DIALOGUE.to_owned(),
            secondary_dialogue: String::new(),
            template: default_template(),
            saved_templates: Vec::new(),
        }
    }
}

impl SceneState {
    /// Check the saved-template invariants: every id in the custom namespace, no duplicates.
    pub fn validate(&self) -> SceneResult<()> {
        let mut seen = BTreeSet::new();
        for t in &self.saved_templates {
            t.validate_saved()?;
            if !seen.insert(t.id.as_str()) {
                return Err(SceneError::decode(format!(
                    "duplicate saved template id '{}'",
                    t.id
                )));
            }
        }
        Ok(())
    }

    pub fn saved(&self, id: &str) -> Option<&Template> {
        self.saved_templates.iter().find(|t| t.id.as_str() == id)
    }
}

/// Shallow top-level update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenePatch {
    /// `Some(None)` clears the image.
    pub image: Option<Option<ImageRef>>,
    pub image_scale: Option<ImageScale>,
    pub character_name: Option<String>,
    pub dialogue: Option<String>,
    pub secondary_dialogue: Option<String>,
    /// Replaces the whole live template.
    pub template: Option<Template>,
    pub saved_templates: Option<Vec<Template>>,
}

impl ScenePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn character_name(mut self, v: impl Into<String>) -> Self {
        self.character_name = Some(v.into());
        self
    }

    pub fn dialogue(mut self, v: impl Into<String>) -> Self {
        self.dialogue = Some(v.into());
        self
    }

    pub fn secondary_dialogue(mut self, v: impl Into<String>) -> Self {
        self.secondary_dialogue = Some(v.into());
        self
    }

    pub fn image(mut self, v: Option<ImageRef>) -> Self {
        self.image = Some(v);
        self
    }

    pub fn image_scale(mut self, v: ImageScale) -> Self {
        self.image_scale = Some(v);
        self
    }

    pub fn template(mut self, v: Template) -> Self {
        self.template = Some(v);
        self
    }

    /// Produce the merged state; `base` is not modified.
    pub fn merge_into(self, base: &SceneState) -> SceneState {
        let mut next = base.clone();
        if let Some(v) = self.image {
            next.image = v;
        }
        if let Some(v) = self.image_scale {
            next.image_scale = v;
        }
        if let Some(v) = self.character_name {
            next.character_name = v;
        }
        if let Some(v) = self.dialogue {
            next.dialogue = v;
        }
        if let Some(v) = self.secondary_dialogue {
            next.secondary_dialogue = v;
        }
        if let Some(v) = self.template {
            next.template = v;
        }
        if let Some(v) = self.saved_templates {
            next.saved_templates = v;
        }
        next
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/state.rs"]
mod tests;
