/// Decoded RGBA8 image, shared between materials and GPU backends.
use std::sync::Arc;

/// Textures are immutable once decoded, so they are passed around behind an
/// `Arc` and compared by pointer when a backend caches its upload.
pub type TextureRef = Arc<Texture>;

#[derive(Clone, PartialEq, Eq)]
pub struct Texture {
    /// Where the pixels came from (file path, or a synthetic label).
    pub label: String,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl Texture {
    pub fn new(label: impl Into<String>, width: u32, height: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(rgba.len(), (width as usize) * (height as usize) * 4);
        Self {
            label: label.into(),
            width,
            height,
            rgba,
        }
    }

    /// Single-texel texture of the given color.
    pub fn solid(label: impl Into<String>, rgba: [u8; 4]) -> Self {
        Self::new(label, 1, 1, rgba.to_vec())
    }

    pub fn into_ref(self) -> TextureRef {
        Arc::new(self)
    }
}

// Pixel data is noise in logs.
impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("label", &self.label)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
