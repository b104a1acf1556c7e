//! Position / rotation / scale of a hotspot, loaded from its `transform`
//! document and shared with the animation that drives it.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use vista_core::math::spherical_to_cartesian;

/// Three optional components; missing ones keep whatever they are applied
/// over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vec3Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Vec3Config {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x: Some(x), y: Some(y), z: Some(z) }
    }

    pub fn apply_over(&self, base: Vec3) -> Vec3 {
        Vec3::new(
            self.x.unwrap_or(base.x),
            self.y.unwrap_or(base.y),
            self.z.unwrap_or(base.z),
        )
    }
}

/// Point on a sphere around the viewer; angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalPosition {
    pub radius: f32,
    #[serde(default)]
    pub theta: f32,
    #[serde(default)]
    pub phi: f32,
}

impl SphericalPosition {
    pub fn to_cartesian(&self) -> Vec3 {
        spherical_to_cartesian(self.radius, self.theta, self.phi)
    }
}

/// `{radius, theta, phi}` or `{x, y, z}`.  The spherical form is tried first
/// because it is the only one with a required field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionConfig {
    Spherical(SphericalPosition),
    Cartesian(Vec3Config),
}

impl Default for PositionConfig {
    fn default() -> Self {
        PositionConfig::Cartesian(Vec3Config::default())
    }
}

impl PositionConfig {
    pub fn resolve(&self, base: Vec3) -> Vec3 {
        match self {
            PositionConfig::Spherical(s) => s.to_cartesian(),
            PositionConfig::Cartesian(c) => c.apply_over(base),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub position: PositionConfig,
    /// Degrees: `x` pitch, `y` yaw, `z` roll.
    pub rotation: Vec3Config,
    pub scale: Vec3Config,
}

/// Unclamped transform values.  Clamping happens when they are written to
/// the mesh, so animations always work with the raw numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotspotTransform {
    pub position: Vec3,
    /// Degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for HotspotTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl HotspotTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, config: &TransformConfig) {
        *self = Self::from_config(config);
    }

    pub fn from_config(config: &TransformConfig) -> Self {
        let d = Self::default();
        Self {
            position: config.position.resolve(d.position),
            rotation: config.rotation.apply_over(d.rotation),
            scale: config.scale.apply_over(d.scale),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn destroy(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: serde_json::Value) -> TransformConfig {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn cartesian_document() {
        let t = HotspotTransform::from_config(&parse(json!({
            "position": { "x": 1, "y": 2, "z": -5 },
            "rotation": { "y": 90 },
            "scale": { "x": 2 }
        })));
        assert_eq!(t.position, Vec3::new(1.0, 2.0, -5.0));
        assert_eq!(t.rotation, Vec3::new(0.0, 90.0, 0.0));
        assert_eq!(t.scale, Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn spherical_document() {
        let t = HotspotTransform::from_config(&parse(json!({
            "position": { "radius": 200, "theta": 90, "phi": 0 }
        })));
        assert!((t.position - Vec3::new(200.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn empty_document_is_identity() {
        let t = HotspotTransform::from_config(&parse(json!({})));
        assert_eq!(t, HotspotTransform::default());
    }

    #[test]
    fn scale_is_not_clamped_here() {
        let t = HotspotTransform::from_config(&parse(json!({ "scale": { "x": 0, "y": -3, "z": 1e9 } })));
        assert_eq!(t.scale, Vec3::new(0.0, -3.0, 1e9));
    }
}
