//! Image references, image decoding and text shaping inputs for export.

pub mod decode;
pub mod image_ref;
pub mod text;
