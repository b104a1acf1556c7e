//! Drawable scene node: geometry + material + transform + two render hooks.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde_json::Value;

use crate::context::GpuContext;
use crate::geometry::Geometry;
use crate::material::ShaderMaterial;
use crate::passes::PassKind;
use crate::scene::Aabb;
use crate::view::View;

// ── Identity ────────────────────────────────────────────────────────────────

static MESH_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

impl MeshId {
    pub fn next() -> Self {
        Self(MESH_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

// ── Rotation ────────────────────────────────────────────────────────────────

/// Axis order in which the three Euler angles are composed.  `YXZ` means
/// the rotation matrix is `Ry · Rx · Rz`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EulerOrder {
    #[default]
    XYZ,
    XZY,
    YXZ,
    YZX,
    ZXY,
    ZYX,
}

/// Euler angles in radians, one per axis, plus the order they apply in.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub order: EulerOrder,
}

impl Euler {
    pub fn new(x: f32, y: f32, z: f32, order: EulerOrder) -> Self {
        Self { x, y, z, order }
    }

    pub fn set(&mut self, x: f32, y: f32, z: f32, order: EulerOrder) {
        *self = Self::new(x, y, z, order);
    }

    pub fn to_quat(self) -> Quat {
        let Self { x, y, z, order } = self;
        match order {
            EulerOrder::XYZ => Quat::from_euler(EulerRot::XYZ, x, y, z),
            EulerOrder::XZY => Quat::from_euler(EulerRot::XZY, x, z, y),
            EulerOrder::YXZ => Quat::from_euler(EulerRot::YXZ, y, x, z),
            EulerOrder::YZX => Quat::from_euler(EulerRot::YZX, y, z, x),
            EulerOrder::ZXY => Quat::from_euler(EulerRot::ZXY, z, x, y),
            EulerOrder::ZYX => Quat::from_euler(EulerRot::ZYX, z, y, x),
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

// ── Render hooks ────────────────────────────────────────────────────────────

/// What a render hook sees: the backend, the active view, and the material
/// bound for this mesh in this pass.
pub struct RenderContext<'a> {
    pub gl: &'a mut dyn GpuContext,
    pub view: &'a dyn View,
    pub material: &'a mut ShaderMaterial,
    pub pass: PassKind,
    pub mesh: MeshId,
}

/// Hooks are compared by `Rc::ptr_eq`, so keep the `Rc` you installed if you
/// need to remove it again.
pub type RenderCallback = Rc<dyn Fn(&mut RenderContext<'_>)>;

// ── Mesh ────────────────────────────────────────────────────────────────────

pub struct Mesh {
    pub id: MeshId,
    pub name: String,
    pub geometry: Option<Geometry>,
    pub material: Option<ShaderMaterial>,
    pub position: Vec3,
    pub rotation: Euler,
    pub scale: Vec3,
    pub visible: bool,
    pub frustum_culled: bool,
    /// Opaque payload for whoever resolves this mesh later (e.g. picking).
    pub user_data: Value,
    pub on_before_render: Option<RenderCallback>,
    pub on_after_render: Option<RenderCallback>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            id: MeshId::next(),
            name: String::new(),
            geometry: None,
            material: None,
            position: Vec3::ZERO,
            rotation: Euler::default(),
            scale: Vec3::ONE,
            visible: true,
            frustum_culled: true,
            user_data: Value::Null,
            on_before_render: None,
            on_after_render: None,
        }
    }

    /// Model matrix `T · R · S`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation.to_quat(), self.position)
    }

    /// World-space bounds, `None` until geometry is attached.
    pub fn world_aabb(&self) -> Option<Aabb> {
        let bounds = self.geometry.as_ref()?.bounds()?;
        Some(bounds.transform(&self.matrix()))
    }

    /// Whether both hooks are exactly the given callbacks.
    pub fn has_callbacks(&self, before: &RenderCallback, after: &RenderCallback) -> bool {
        let same = |slot: &Option<RenderCallback>, cb: &RenderCallback| {
            slot.as_ref().is_some_and(|s| Rc::ptr_eq(s, cb))
        };
        same(&self.on_before_render, before) && same(&self.on_after_render, after)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("geometry", &self.geometry.as_ref().map(|g| g.label))
            .field("material", &self.material.as_ref().map(|m| m.name.as_str()))
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("scale", &self.scale)
            .field("visible", &self.visible)
            .field("frustum_culled", &self.frustum_culled)
            .field("on_before_render", &self.on_before_render.is_some())
            .field("on_after_render", &self.on_after_render.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn yxz_composes_y_then_x_then_z() {
        let e = Euler::new(0.3, -1.1, 0.7, EulerOrder::YXZ);
        let expected = Quat::from_rotation_y(-1.1) * Quat::from_rotation_x(0.3) * Quat::from_rotation_z(0.7);
        assert!(e.to_quat().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn order_matters_when_two_axes_are_set() {
        let yxz = Euler::new(FRAC_PI_2, FRAC_PI_2, 0.0, EulerOrder::YXZ).to_quat();
        let xyz = Euler::new(FRAC_PI_2, FRAC_PI_2, 0.0, EulerOrder::XYZ).to_quat();
        assert!(!approx(yxz * Vec3::Z, xyz * Vec3::Z));
    }

    #[test]
    fn matrix_applies_scale_rotation_translation() {
        let mut m = Mesh::new();
        m.position = Vec3::new(0.0, 0.0, -5.0);
        m.scale = Vec3::splat(2.0);
        m.rotation = Euler::new(0.0, FRAC_PI_2, 0.0, EulerOrder::YXZ);
        let p = m.matrix().transform_point3(Vec3::X);
        assert!(approx(p, Vec3::new(0.0, 0.0, -7.0)));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Mesh::new().id, Mesh::new().id);
    }
}
