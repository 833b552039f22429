use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::SceneResult;
use crate::scene::state::SceneState;
use crate::scene::store::{SceneStore, decode};

pub const PROJECT_FILE_NAME: &str = "vn-scene-project.json";

/// Write a project file (same JSON schema as the autosave slot).
#[tracing::instrument(skip(state))]
pub fn save_project(state: &SceneState, path: &Path) -> SceneResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create project dir '{}'", parent.display()))?;
    }
    let bytes = SceneStore::serialize(state)?;
    std::fs::write(path, bytes).with_context(|| format!("write project '{}'", path.display()))?;
    Ok(())
}

/// Read and decode a project file without touching any live store.
pub fn read_project(path: &Path) -> SceneResult<SceneState> {
    let bytes =
        std::fs::read(path).with_context(|| format!("open project '{}'", path.display()))?;
    decode(&bytes)
}

/// Load a project file into `store`. On any failure the live state is left as it was.
#[tracing::instrument(skip(store))]
pub fn load_project(store: &mut SceneStore, path: &Path) -> SceneResult<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("open project '{}'", path.display()))?;
    store.load(&bytes)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/persist/project.rs"]
mod tests;
