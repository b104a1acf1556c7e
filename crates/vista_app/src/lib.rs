//! Headless panorama viewer built on the hotspot layer.
//!
//! ```rust,ignore
//! use vista_app::{logging, Viewer, ViewerConfig};
//!
//! let config = ViewerConfig::load("viewer.toml")?;
//! logging::init(config.level_filter())?;
//! let mut viewer = Viewer::new(config);
//! viewer.load_scene(&std::fs::read_to_string("scene.json")?)?;
//! let report = viewer.frame(1.0 / 60.0, &mut gl);
//! ```

pub mod config;
pub mod logging;
pub mod viewer;

pub use config::ViewerConfig;
pub use viewer::{FrameReport, Viewer};
