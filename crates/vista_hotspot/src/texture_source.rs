//! Where image materials get their pixels from.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vista_renderer::{Texture, TextureRef};

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture `{0}` not found")]
    NotFound(String),
    #[error("failed to decode `{url}`: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
    #[error("texture loader for `{0}` went away")]
    Disconnected(String),
}

/// Fetches and decodes a texture by url.  Implementations must be callable
/// from a worker thread.
pub trait TextureSource: Send + Sync {
    fn load(&self, url: &str) -> Result<TextureRef, TextureError>;
}

/// How image materials run their [`TextureSource`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureLoading {
    /// On a worker thread; the result is picked up by `update()`.
    #[default]
    Background,
    /// Inside `load()`, blocking the caller.
    Inline,
}

/// Reads image files relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileTextureSource {
    root: PathBuf,
}

impl FileTextureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextureSource for FileTextureSource {
    fn load(&self, url: &str) -> Result<TextureRef, TextureError> {
        let path = self.root.join(url);
        if !path.is_file() {
            return Err(TextureError::NotFound(url.to_string()));
        }
        let decoded = image::open(&path).map_err(|source| TextureError::Decode {
            url: url.to_string(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded {} ({width}x{height})", path.display());
        Ok(Texture::new(url, width, height, rgba.into_raw()).into_ref())
    }
}

/// Textures registered up front, keyed by url.
#[derive(Debug, Default)]
pub struct MemoryTextureSource {
    textures: Mutex<HashMap<String, TextureRef>>,
}

impl MemoryTextureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: &str, texture: Texture) -> TextureRef {
        let texture = Arc::new(texture);
        if let Ok(mut map) = self.textures.lock() {
            map.insert(url.to_string(), Arc::clone(&texture));
        }
        texture
    }
}

impl TextureSource for MemoryTextureSource {
    fn load(&self, url: &str) -> Result<TextureRef, TextureError> {
        self.textures
            .lock()
            .ok()
            .and_then(|map| map.get(url).cloned())
            .ok_or_else(|| TextureError::NotFound(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_round_trip() {
        let src = MemoryTextureSource::new();
        let tex = src.insert("a.png", Texture::solid("a.png", [1, 2, 3, 4]));
        assert!(Arc::ptr_eq(&src.load("a.png").unwrap(), &tex));
        assert!(matches!(src.load("b.png"), Err(TextureError::NotFound(_))));
    }

    #[test]
    fn missing_file_is_not_found() {
        let src = FileTextureSource::new(std::env::temp_dir());
        let err = src.load("definitely-not-here-7d1f.png").unwrap_err();
        assert!(matches!(err, TextureError::NotFound(_)));
    }

    #[test]
    fn file_source_decodes_png() {
        let dir = std::env::temp_dir().join(format!("vista-tex-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        img.save(dir.join("spot.png")).unwrap();

        let tex = FileTextureSource::new(&dir).load("spot.png").unwrap();
        assert_eq!((tex.width, tex.height), (3, 2));
        assert_eq!(&tex.rgba[..4], &[10, 20, 30, 255]);
        std::fs::remove_dir_all(&dir).ok();
    }
}
