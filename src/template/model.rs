use serde::{Deserialize, Serialize};

use crate::foundation::error::{SceneError, SceneResult};
use crate::style::schema::{BoxStyle, TextStyle};

pub const CUSTOM_ID_PREFIX: &str = "custom-";

/// Template identifier. Built-in and saved templates share the type but live in disjoint
/// namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub(crate) fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_custom(&self) -> bool {
        CustomTemplateId::parse(&self.0).is_some()
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id of a user-saved template. Cannot be built from a built-in id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomTemplateId(TemplateId);

impl CustomTemplateId {
    /// Accepts `custom-<suffix>` with a non-empty suffix; everything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let suffix = s.strip_prefix(CUSTOM_ID_PREFIX)?;
        if suffix.is_empty() {
            return None;
        }
        Some(Self(TemplateId(s.to_owned())))
    }

    pub(crate) fn numbered(n: u64) -> Self {
        Self(TemplateId(format!("{CUSTOM_ID_PREFIX}{n}")))
    }

    pub fn as_id(&self) -> &TemplateId {
        &self.0
    }

    pub fn into_id(self) -> TemplateId {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub name_style: TextStyle,
    pub dialogue_style: TextStyle,
    pub secondary_dialogue_style: TextStyle,
    pub box_style: BoxStyle,
}

impl Template {
    /// Validate a user-saved template entry.
    pub fn validate_saved(&self) -> SceneResult<()> {
        if !self.id.is_custom() {
            return Err(SceneError::decode(format!(
                "saved template id '{}' is outside the '{CUSTOM_ID_PREFIX}' namespace",
                self.id
            )));
        }
        Ok(())
    }
}
