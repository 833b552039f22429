use crate::foundation::error::{SceneError, SceneResult};

pub use kurbo::{Point, Rect, Size};

/// Logical preview container dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// 16:9 preview size used when no container is supplied.
    pub const PREVIEW: Canvas = Canvas {
        width: 1280,
        height: 720,
    };

    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> SceneResult<Self> {
        if width == 0 || height == 0 {
            return Err(SceneError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Canvas multiplied by an integer supersampling factor.
    pub fn scaled(self, factor: u32) -> SceneResult<Self> {
        let w = self.width.checked_mul(factor);
        let h = self.height.checked_mul(factor);
        match (w, h) {
            (Some(w), Some(h)) => Self::new(w, h),
            _ => Err(SceneError::validation("scaled canvas overflows u32")),
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::PREVIEW
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
