use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{SceneError, SceneResult};

/// Opaque durable key-value slot store.
pub trait KvStore {
    fn get(&self, key: &str) -> SceneResult<Option<Vec<u8>>>;
    fn set(&mut self, key: &str, value: &[u8]) -> SceneResult<()>;
    fn remove(&mut self, key: &str) -> SceneResult<()>;
}

/// In-memory store for tests and hosts without durable storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    slots: BTreeMap<String, Vec<u8>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> SceneResult<Option<Vec<u8>>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> SceneResult<()> {
        self.slots.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SceneResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// One file per key inside a directory. Writes go through a temp file and a rename.
#[derive(Debug, Clone)]
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    pub fn open(root: impl Into<PathBuf>) -> SceneResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create state dir '{}'", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> SceneResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.')
            && !key.starts_with('.');
        if !valid {
            return Err(SceneError::validation(format!("invalid slot key '{key}'")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> SceneResult<Option<Vec<u8>>> {
        let path = self.slot_path(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SceneError::Io(e)),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> SceneResult<()> {
        let path = self.slot_path(key)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).with_context(|| format!("write '{}'", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("replace '{}'", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SceneResult<()> {
        let path = self.slot_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SceneError::Io(e)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/kv.rs"]
mod tests;
