//! Scene record, its store and the editing boundary.

pub mod edit;
pub mod state;
pub mod store;
