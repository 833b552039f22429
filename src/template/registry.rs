//! Template lifecycle over [`SceneState`] values.
//!
//! Every operation takes the current state by reference and returns the next state. The
//! live template and the catalog entries never alias: apply and save both deep-copy.

use std::collections::BTreeSet;

use crate::scene::state::SceneState;
use crate::template::builtin::{find_builtin, is_builtin_id};
use crate::template::model::{CustomTemplateId, Template};

/// What to apply into the live slot.
#[derive(Debug, Clone, Copy)]
pub enum TemplateSource<'a> {
    /// Looked up among built-ins, then saved templates.
    Id(&'a str),
    /// An explicit template value.
    Value(&'a Template),
}

/// Built-in or saved template with this id.
pub fn find<'a>(state: &'a SceneState, id: &str) -> Option<&'a Template> {
    find_builtin(id).or_else(|| state.saved(id))
}

/// Copy the source template into the live slot. Unknown ids leave the state unchanged.
pub fn apply(source: TemplateSource<'_>, into: &SceneState) -> SceneState {
    let chosen = match source {
        TemplateSource::Id(id) => find(into, id),
        TemplateSource::Value(t) => Some(t),
    };
    let mut next = into.clone();
    match chosen {
        Some(t) => next.template = t.clone(),
        None => tracing::warn!(?source, "apply: unknown template id ignored"),
    }
    next
}

/// Saved template id not used by any saved entry nor any built-in.
pub fn next_custom_id(state: &SceneState) -> CustomTemplateId {
    let taken: BTreeSet<&str> = state
        .saved_templates
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    let mut n = state.saved_templates.len() as u64 + 1;
    loop {
        let candidate = CustomTemplateId::numbered(n);
        let raw = candidate.as_id().as_str();
        if !taken.contains(raw) && !is_builtin_id(raw) {
            return candidate;
        }
        n += 1;
    }
}

/// Save the live template under `name`. A name that trims to empty is a no-op.
pub fn save_as_template(state: &SceneState, name: &str) -> SceneState {
    let name = name.trim();
    if name.is_empty() {
        tracing::debug!("save_as_template: empty name ignored");
        return state.clone();
    }

    let id = next_custom_id(state).into_id();
    let saved = Template {
        id,
        name: name.to_owned(),
        ..state.template.clone()
    };

    let mut next = state.clone();
    next.saved_templates.push(saved.clone());
    next.template = saved;
    next
}

/// Remove a saved template. Absent ids are a no-op.
pub fn delete_template(state: &SceneState, id: &CustomTemplateId) -> SceneState {
    let mut next = state.clone();
    next.saved_templates.retain(|t| &t.id != id.as_id());
    next
}

/// Delete by raw id string; built-in and malformed ids never reach the deletable set.
pub fn delete_template_str(state: &SceneState, id: &str) -> SceneState {
    match CustomTemplateId::parse(id) {
        Some(id) => delete_template(state, &id),
        None => {
            tracing::debug!(id, "delete_template: not a saved-template id");
            state.clone()
        }
    }
}

/// Rename a saved template, keeping its id. The live template follows when it has the same id.
pub fn rename_template(state: &SceneState, id: &CustomTemplateId, name: &str) -> SceneState {
    let name = name.trim();
    let mut next = state.clone();
    if name.is_empty() {
        return next;
    }
    if let Some(t) = next
        .saved_templates
        .iter_mut()
        .find(|t| &t.id == id.as_id())
    {
        t.name = name.to_owned();
        if &next.template.id == id.as_id() {
            next.template.name = name.to_owned();
        }
    }
    next
}

#[cfg(test)]
#[path = "../../tests/unit/template/registry.rs"]
mod tests;
