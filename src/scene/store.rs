use crate::foundation::error::{SceneError, SceneResult};
use crate::scene::state::{ScenePatch, SceneState};

/// Observer invoked after every successful state change.
pub trait StoreListener {
    fn state_changed(&mut self, state: &SceneState) -> SceneResult<()>;
}

/// Authoritative single-writer owner of the scene.
///
/// Every change replaces the held value wholesale and then notifies listeners in
/// registration order. Listener failures are logged and do not roll the change back.
pub struct SceneStore {
    state: SceneState,
    listeners: Vec<Box<dyn StoreListener>>,
}

impl std::fmt::Debug for SceneStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new(SceneState::default())
    }
}

impl SceneStore {
    pub fn new(state: SceneState) -> Self {
        Self {
            state,
            listeners: Vec::new(),
        }
    }

    pub fn with_listener(mut self, listener: impl StoreListener + 'static) -> Self {
        self.add_listener(listener);
        self
    }

    pub fn add_listener(&mut self, listener: impl StoreListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn get(&self) -> &SceneState {
        &self.state
    }

    /// Shallow-merge `patch` into the current state.
    #[tracing::instrument(skip_all)]
    pub fn update(&mut self, patch: ScenePatch) -> &SceneState {
        let next = patch.merge_into(&self.state);
        self.commit(next)
    }

    /// Apply a pure state transition (registry operations, style edits) as one change.
    pub fn transition(&mut self, f: impl FnOnce(&SceneState) -> SceneState) -> &SceneState {
        let next = f(&self.state);
        self.commit(next)
    }

    /// Decode `bytes` and make it the live state. On failure the live state is untouched.
    #[tracing::instrument(skip_all, fields(len = bytes.len()))]
    pub fn load(&mut self, bytes: &[u8]) -> SceneResult<&SceneState> {
        let next = decode(bytes)?;
        Ok(self.commit(next))
    }

    /// Pretty JSON of a state, the shared autosave and project-file format.
    pub fn serialize(state: &SceneState) -> SceneResult<Vec<u8>> {
        serde_json::to_vec_pretty(state)
            .map_err(|e| SceneError::Other(anyhow::Error::new(e).context("encode scene JSON")))
    }

    fn commit(&mut self, next: SceneState) -> &SceneState {
        self.state = next;
        tracing::debug!(template = %self.state.template.id, "scene state changed");
        for listener in &mut self.listeners {
            if let Err(err) = listener.state_changed(&self.state) {
                tracing::warn!(error = %err, "store listener failed");
            }
        }
        &self.state
    }
}

/// Parse and validate a serialized scene.
pub fn decode(bytes: &[u8]) -> SceneResult<SceneState> {
    let state: SceneState = serde_json::from_slice(bytes)?;
    state.validate()?;
    Ok(state)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/store.rs"]
mod tests;
