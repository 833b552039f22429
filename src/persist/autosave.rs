use crate::foundation::error::SceneResult;
use crate::persist::kv::KvStore;
use crate::scene::state::SceneState;
use crate::scene::store::{SceneStore, StoreListener, decode};

/// Version-tagged slot key. Bump the suffix on incompatible schema changes.
pub const AUTOSAVE_KEY: &str = "vn-mockup-autosave-v2";

/// Store listener that writes the whole serialized state after every change.
pub struct Autosave<K: KvStore> {
    kv: K,
}

impl<K: KvStore> Autosave<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }
}

impl<K: KvStore> StoreListener for Autosave<K> {
    #[tracing::instrument(skip_all)]
    fn state_changed(&mut self, state: &SceneState) -> SceneResult<()> {
        let bytes = SceneStore::serialize(state)?;
        self.kv.set(AUTOSAVE_KEY, &bytes)?;
        tracing::debug!(bytes = bytes.len(), "autosaved scene");
        Ok(())
    }
}

/// Startup restore: the autosaved scene, or the default scene when the slot is empty,
/// unreadable or malformed.
#[tracing::instrument(skip_all)]
pub fn restore_or_default(kv: &impl KvStore) -> SceneState {
    let bytes = match kv.get(AUTOSAVE_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return SceneState::default(),
        Err(err) => {
            tracing::warn!(error = %err, "autosave slot unreadable; using default scene");
            return SceneState::default();
        }
    };
    match decode(&bytes) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!(error = %err, "autosave payload malformed; using default scene");
            SceneState::default()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/autosave.rs"]
mod tests;
