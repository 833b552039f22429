//! Built-in template catalog and the user-template lifecycle.

pub mod builtin;
pub mod model;
pub mod registry;
