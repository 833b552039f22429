//! Style resolution: scene state in, render plan out.

pub mod plan;
pub mod resolver;
