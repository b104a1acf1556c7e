//! Viewer configuration, read from TOML.
//!
//! ```toml
//! title = "Lobby tour"
//! debug = false
//! view = "rectilinear"
//! log_level = "info"
//! texture_root = "assets"
//! texture_loading = "background"
//! max_frame_delta = 0.1
//! width = 1280
//! height = 720
//! fov = 75.0
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use vista_hotspot::TextureLoading;
use vista_renderer::ViewKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    /// Overlay the debug material on every hotspot.
    pub debug: bool,
    pub view: ViewKind,
    pub log_level: String,
    /// Image materials are resolved relative to this directory.
    pub texture_root: PathBuf,
    pub texture_loading: TextureLoading,
    /// Upper bound for one frame's time step, in seconds.
    pub max_frame_delta: f32,
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Vista".to_string(),
            debug: false,
            view: ViewKind::Rectilinear,
            log_level: "info".to_string(),
            texture_root: PathBuf::from("."),
            texture_loading: TextureLoading::Background,
            max_frame_delta: 0.1,
            width: 1280,
            height: 720,
            fov: 75.0,
        }
    }
}

impl ViewerConfig {
    /// Read a TOML file.  A relative `texture_root` is taken relative to the
    /// file's directory.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading viewer config {}", path.display()))?;
        let mut config = Self::from_toml_str(&text)
            .with_context(|| format!("parsing viewer config {}", path.display()))?;
        if config.texture_root.is_relative() {
            if let Some(dir) = path.parent() {
                config.texture_root = dir.join(&config.texture_root);
            }
        }
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            eprintln!("unknown log level `{}`, using info", self.log_level);
            LevelFilter::Info
        })
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_view(mut self, view: ViewKind) -> Self {
        self.view = view;
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    pub fn with_texture_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.texture_root = root.into();
        self
    }

    pub fn with_texture_loading(mut self, loading: TextureLoading) -> Self {
        self.texture_loading = loading;
        self
    }

    pub fn with_max_frame_delta(mut self, seconds: f32) -> Self {
        self.max_frame_delta = seconds;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_fov(mut self, degrees: f32) -> Self {
        self.fov = degrees;
        self
    }
}
