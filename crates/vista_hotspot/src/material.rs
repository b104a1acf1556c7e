//! Visual content of a hotspot: a flat color or an image texture.
//!
//! `load` takes the raw material document so presets and debug overlays can
//! be merged as JSON before anything is parsed.  Readiness is announced on
//! [`HotspotMaterial::on_ready`] exactly when the state turns `Ready`:
//! synchronously for graphics materials and inline textures, from
//! [`HotspotMaterial::update`] for textures decoded in the background.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vista_core::{Color, Signal};
use vista_renderer::{names, ShaderMaterial, Side, TextureRef, UniformValue};

use crate::texture_source::{TextureError, TextureLoading, TextureSource};

/// Built-in material documents.
pub mod presets {
    use serde_json::{json, Value};

    /// Used when a hotspot has no material document: invisible but pickable.
    pub fn transparent() -> Value {
        json!({ "type": "graphics", "color": "#000000", "opacity": 0, "transparent": true })
    }

    /// Merged over the chosen material when the viewer runs in debug mode.
    pub fn debug() -> Value {
        json!({ "color": "#00ff00", "opacity": 0.8, "transparent": true })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    #[default]
    Graphics,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaterialConfig {
    #[serde(rename = "type")]
    pub kind: MaterialType,
    pub color: String,
    pub opacity: f32,
    pub transparent: bool,
    pub side: Side,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            kind: MaterialType::Graphics,
            color: "#ffffff".into(),
            opacity: 1.0,
            transparent: false,
            side: Side::Front,
            url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialState {
    Unloaded,
    Loading,
    Ready,
    Failed,
    Destroyed,
}

pub struct HotspotMaterial {
    config: MaterialConfig,
    state: MaterialState,
    color: Color,
    texture: Option<TextureRef>,
    material: Option<ShaderMaterial>,
    textures: Arc<dyn TextureSource>,
    loading: TextureLoading,
    pending: Option<Receiver<Result<TextureRef, TextureError>>>,
    pub on_ready: Signal<()>,
}

impl std::fmt::Debug for HotspotMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotspotMaterial")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("color", &self.color)
            .field("texture", &self.texture)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

impl HotspotMaterial {
    pub fn new(textures: Arc<dyn TextureSource>, loading: TextureLoading) -> Self {
        Self {
            config: MaterialConfig::default(),
            state: MaterialState::Unloaded,
            color: Color::WHITE,
            texture: None,
            material: None,
            textures,
            loading,
            pending: None,
            on_ready: Signal::new(),
        }
    }

    /// Parse `document` and start resolving its content.
    pub fn load(&mut self, document: &Value) {
        if self.state == MaterialState::Destroyed {
            return;
        }
        self.config = match serde_json::from_value(document.clone()) {
            Ok(config) => config,
            Err(err) => {
                log::error!("invalid material document: {err}");
                self.state = MaterialState::Failed;
                return;
            }
        };
        self.state = MaterialState::Loading;
        self.color = Color::parse_css(&self.config.color).unwrap_or_else(|err| {
            log::warn!("{err}; using white");
            Color::WHITE
        });

        match self.config.kind {
            MaterialType::Graphics => self.finish(None),
            MaterialType::Image => {
                let Some(url) = self.config.url.clone() else {
                    log::error!("image material without url");
                    self.state = MaterialState::Failed;
                    return;
                };
                match self.loading {
                    TextureLoading::Inline => {
                        let result = self.textures.load(&url);
                        self.resolve(result);
                    }
                    TextureLoading::Background => {
                        let source = Arc::clone(&self.textures);
                        let (tx, rx) = mpsc::channel();
                        std::thread::spawn(move || {
                            let _ = tx.send(source.load(&url));
                        });
                        self.pending = Some(rx);
                    }
                }
            }
        }
    }

    /// Pick up a texture decoded in the background.
    pub fn update(&mut self) {
        let Some(rx) = self.pending.as_ref() else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                Err(TextureError::Disconnected(self.config.url.clone().unwrap_or_default()))
            }
        };
        self.pending = None;
        self.resolve(result);
    }

    /// Drop content and listeners.  A load still in flight is abandoned.
    pub fn destroy(&mut self) {
        self.on_ready.clear();
        self.pending = None;
        self.material = None;
        self.texture = None;
        self.state = MaterialState::Destroyed;
    }

    fn resolve(&mut self, result: Result<TextureRef, TextureError>) {
        match result {
            Ok(texture) => self.finish(Some(texture)),
            Err(err) => {
                log::error!("{err}");
                self.state = MaterialState::Failed;
            }
        }
    }

    fn finish(&mut self, texture: Option<TextureRef>) {
        let mut material = ShaderMaterial::hotspot();
        material.transparent = self.config.transparent;
        material.side = self.config.side;
        material.uniforms.set(names::COLOR, self.color);
        material.uniforms.set(names::OPACITY, self.config.opacity);
        material.uniforms.set(names::TEXTURE, UniformValue::Texture(texture.clone()));

        self.texture = texture;
        self.material = Some(material);
        self.state = MaterialState::Ready;
        self.on_ready.dispatch(&());
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn state(&self) -> MaterialState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == MaterialState::Ready
    }

    pub fn kind(&self) -> MaterialType {
        self.config.kind
    }

    pub fn config(&self) -> &MaterialConfig {
        &self.config
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn opacity(&self) -> f32 {
        self.config.opacity
    }

    pub fn texture(&self) -> Option<&TextureRef> {
        self.texture.as_ref()
    }

    /// The GPU material, once ready.
    pub fn material(&self) -> Option<&ShaderMaterial> {
        self.material.as_ref()
    }
}
