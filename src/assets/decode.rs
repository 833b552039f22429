use std::sync::Arc;

use crate::assets::image_ref::decode_image_ref;
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{SceneError, SceneResult};
use crate::scene::state::ImageRef;

/// Background image decoded to premultiplied RGBA8, ready for the rasterizer.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode the data URI behind `image` into pixels the rasterizer can paint.
pub fn prepare_image_ref(image: &ImageRef) -> SceneResult<PreparedImage> {
    let bytes = decode_image_ref(image)?;
    let rgba = image::load_from_memory(&bytes)
        .map_err(|e| SceneError::validation(format!("background image: {e}")))?
        .into_rgba8();

    let rgba8_premul = rgba
        .pixels()
        .flat_map(|px| {
            let [r, g, b, a] = px.0;
            Rgba8Premul::from_straight_rgba(r, g, b, a).to_array()
        })
        .collect();

    Ok(PreparedImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
