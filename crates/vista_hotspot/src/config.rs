//! The hotspot document.
//!
//! ```json
//! {
//!   "uid": "h1",
//!   "type": "3d",
//!   "transform": { "position": { "x": 0, "y": 0, "z": -5 } },
//!   "material": { "type": "image", "url": "spots/door.png" },
//!   "geometry": { "type": "plane", "options": { "width": 4, "height": 4 } },
//!   "facingCenter": true
//! }
//! ```
//!
//! Every section is optional.  The material document stays raw JSON so it can
//! be merged with presets before it is parsed.  Fields this crate does not
//! know are kept in `extra`.  A config parsed from JSON also remembers the
//! exact document it came from; [`HotspotConfig::document`] hands that back
//! untouched, nested unknown fields and all.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::animation::AnimationConfig;
use crate::geometry::GeometryDescriptor;
use crate::sound::SoundConfig;
use crate::transform::TransformConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid hotspot document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotspotConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<SoundConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<HashMap<String, Value>>,
    pub facing_center: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// The document as written, when parsed through `from_json`/`from_value`.
    #[serde(skip)]
    source: Option<Value>,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            uid: None,
            tags: Vec::new(),
            kind: "3d".to_string(),
            name: None,
            visible: true,
            transform: None,
            animation: None,
            material: None,
            sound: None,
            geometry: None,
            fx: None,
            events: None,
            facing_center: false,
            extra: Map::new(),
            source: None,
        }
    }
}

impl HotspotConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_value(value.clone())?;
        config.source = Some(value);
        Ok(config)
    }

    /// The document this config was parsed from, or its serialization when
    /// it was built in code.
    pub fn document(&self) -> Value {
        self.source.clone().unwrap_or_else(|| self.to_value())
    }

    /// The config re-serialized: defaults filled in, top-level unknown fields
    /// kept.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|err| {
            log::warn!("hotspot document could not be serialized: {err}");
            Value::Null
        })
    }
}
