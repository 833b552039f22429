use super::*;
use crate::persist::kv::{FileKv, MemoryKv};
use crate::scene::state::ScenePatch;
use crate::template::registry::save_as_template;

fn temp_root(name: &str) -> std::path::PathBuf {
    let dir =
        std::env::temp_dir().join(format!("vnscene-autosave-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn empty_slot_restores_default() {
    assert_eq!(restore_or_default(&MemoryKv::new()), SceneState::default());
}

#[test]
fn malformed_slot_restores_documented_default() {
    let mut kv = MemoryKv::new();
    kv.set(AUTOSAVE_KEY, b"{\"characterName\": 12").unwrap();
    let s = restore_or_default(&kv);
    assert_eq!(s.character_name, "Character Name");
    assert_eq!(s.template.id.as_str(), "cinematic");
    assert!(s.saved_templates.is_empty());
    assert_eq!(s, SceneState::default());
}

#[test]
fn every_change_is_written_and_restorable() {
    let root = temp_root("changes");
    let kv = FileKv::open(&root).unwrap();
    let mut store = SceneStore::new(restore_or_default(&kv)).with_listener(Autosave::new(kv));

    store.update(ScenePatch::default().dialogue("first"));
    let reader = FileKv::open(&root).unwrap();
    assert_eq!(restore_or_default(&reader).dialogue, "first");

    store.transition(|s| save_as_template(s, "Night"));
    let restored = restore_or_default(&reader);
    assert_eq!(&restored, store.get());
    assert_eq!(restored.saved_templates[0].name, "Night");
    let _ = std::fs::remove_dir_all(&root);
}
