//! Durable slots, autosave and project files.

pub mod autosave;
pub mod kv;
pub mod project;
