//! Shader materials: a named program plus the uniform values fed to it.
//!
//! A `ShaderMaterial` does not own GPU state.  The backend links a program
//! for it on first use and stores the id in [`ShaderMaterial::program`];
//! from then on the renderer only binds that program and uploads
//! [`ShaderMaterial::uniforms`] through the cached path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Mat4, Vec2, Vec4};
use serde::{Deserialize, Serialize};
use vista_core::Color;

use crate::resources::TextureRef;

/// Uniform names shared by the built-in programs.
pub mod names {
    pub const COLOR: &str = "tColor";
    pub const TEXTURE: &str = "tTexture";
    pub const OPACITY: &str = "tOpacity";
    pub const VIEW_PROJECTION: &str = "tViewProjection";
    pub const VIEWPORT: &str = "tViewport";
    pub const PROJECTION_KIND: &str = "tProjectionKind";

    /// Uniforms every built-in program declares for the view.
    pub const VIEW: [&str; 3] = [VIEW_PROJECTION, VIEWPORT, PROJECTION_KIND];
}

/// Backend handle of a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Identity of one material instance, used by the renderer's upload cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialKey(u64);

static MATERIAL_COUNTER: AtomicU64 = AtomicU64::new(1);

impl MaterialKey {
    fn next() -> Self {
        Self(MATERIAL_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MaterialName {
    Hotspot,
    Picking,
    Custom(String),
}

impl MaterialName {
    pub fn as_str(&self) -> &str {
        match self {
            MaterialName::Hotspot => "HotspotMaterial",
            MaterialName::Picking => "PickingMaterial",
            MaterialName::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for MaterialName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Vec4(Vec4),
    Mat4(Mat4),
    Color(Color),
    /// `None` leaves the sampler on the backend's fallback texture.
    Texture(Option<TextureRef>),
}

impl UniformValue {
    pub fn as_color(&self) -> Option<Color> {
        match self {
            UniformValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_texture(&self) -> Option<&TextureRef> {
        match self {
            UniformValue::Texture(t) => t.as_ref(),
            _ => None,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Color> for UniformValue {
    fn from(c: Color) -> Self {
        UniformValue::Color(c)
    }
}

impl From<Mat4> for UniformValue {
    fn from(m: Mat4) -> Self {
        UniformValue::Mat4(m)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

/// Name → value map of a material's uniforms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Uniforms {
    values: HashMap<String, UniformValue>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<UniformValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<UniformValue> {
        self.values.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn color(&self, name: &str) -> Option<Color> {
        self.get(name).and_then(UniformValue::as_color)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone)]
pub struct ShaderMaterial {
    pub name: MaterialName,
    pub uniforms: Uniforms,
    /// Set by the renderer once the backend has linked a program.
    pub program: Option<ProgramId>,
    pub transparent: bool,
    pub side: Side,
    pub depth_test: bool,
    key: MaterialKey,
}

impl ShaderMaterial {
    /// Material with the view uniforms declared and nothing else.
    pub fn new(name: MaterialName) -> Self {
        let mut uniforms = Uniforms::new();
        uniforms.set(names::VIEW_PROJECTION, Mat4::IDENTITY);
        uniforms.set(names::VIEWPORT, Vec4::ZERO);
        uniforms.set(names::PROJECTION_KIND, 0.0_f32);
        Self {
            name,
            uniforms,
            program: None,
            transparent: false,
            side: Side::Front,
            depth_test: true,
            key: MaterialKey::next(),
        }
    }

    /// Per-hotspot color/texture material.
    pub fn hotspot() -> Self {
        let mut m = Self::new(MaterialName::Hotspot);
        m.uniforms.set(names::COLOR, Color::WHITE);
        m.uniforms.set(names::TEXTURE, UniformValue::Texture(None));
        m.uniforms.set(names::OPACITY, 1.0_f32);
        m
    }

    /// The flat-color material shared by every mesh in the picking pass.
    pub fn picking() -> Self {
        let mut m = Self::new(MaterialName::Picking);
        m.uniforms.set(names::COLOR, Color::BLACK);
        m.side = Side::Double;
        m
    }

    pub fn key(&self) -> MaterialKey {
        self.key
    }

    pub fn is(&self, name: &MaterialName) -> bool {
        &self.name == name
    }
}

// Equality ignores the cache key and the linked program.
impl PartialEq for ShaderMaterial {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.uniforms == other.uniforms
            && self.transparent == other.transparent
            && self.side == other.side
            && self.depth_test == other.depth_test
    }
}
