//! Text and box style definitions shared by templates and the resolver.

pub mod color;
pub mod schema;
