use std::path::Path;

use anyhow::Context as _;
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::foundation::error::{SceneError, SceneResult};
use crate::scene::state::ImageRef;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Sniff `bytes` and wrap them as `data:image/<fmt>;base64,...`. Non-images are rejected.
pub fn image_ref_from_bytes(bytes: &[u8]) -> SceneResult<ImageRef> {
    let format = image::guess_format(bytes)
        .map_err(|_| SceneError::validation("input is not a recognized image"))?;
    let mime = format.to_mime_type();
    if !mime.starts_with("image/") {
        return Err(SceneError::validation(format!("unsupported MIME type '{mime}'")));
    }
    Ok(ImageRef(format!(
        "{DATA_PREFIX}{mime}{BASE64_MARKER}{}",
        STANDARD.encode(bytes)
    )))
}

pub fn image_ref_from_path(path: &Path) -> SceneResult<ImageRef> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    image_ref_from_bytes(&bytes)
}

/// MIME type declared by a data URI, if it is one.
pub fn mime_type(image: &ImageRef) -> Option<&str> {
    let rest = image.as_str().strip_prefix(DATA_PREFIX)?;
    let end = rest.find([';', ','])?;
    Some(&rest[..end])
}

/// Raw bytes behind an image reference. Only base64 `image/*` data URIs are accepted.
pub fn decode_image_ref(image: &ImageRef) -> SceneResult<Vec<u8>> {
    let s = image.as_str();
    let mime = mime_type(image)
        .ok_or_else(|| SceneError::validation("image reference is not a data URI"))?;
    if !mime.starts_with("image/") {
        return Err(SceneError::validation(format!(
            "image reference has non-image MIME type '{mime}'"
        )));
    }
    let (_, payload) = s
        .split_once(BASE64_MARKER)
        .ok_or_else(|| SceneError::validation("image data URI is not base64 encoded"))?;
    STANDARD
        .decode(payload.trim())
        .map_err(|e| SceneError::validation(format!("image data URI payload: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image_ref.rs"]
mod tests;
