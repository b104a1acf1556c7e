//! Transform → mesh position, orientation and live scale.
//!
//! Orientation is always composed Y, then X, then Z.  In facing-center mode
//! the base orientation turns the mesh's +Z face toward the origin and the
//! configured rotation is added on top of it.

use std::cell::RefCell;
use std::f32::consts::{FRAC_PI_2, PI};
use std::rc::Rc;

use glam::Vec3;
use vista_core::math::{clamp, deg_to_rad, wrap_angle, Spherical};
use vista_renderer::{Euler, EulerOrder, Mesh, SharedMesh};

use crate::transform::HotspotTransform;

pub const MIN_SCALE: f32 = 1e-6;
pub const MAX_SCALE: f32 = 1e5;

/// Clamp each component to `[MIN_SCALE, MAX_SCALE]`.
pub fn clamp_scale(scale: Vec3) -> Vec3 {
    Vec3::new(
        clamp(scale.x, MIN_SCALE, MAX_SCALE),
        clamp(scale.y, MIN_SCALE, MAX_SCALE),
        clamp(scale.z, MIN_SCALE, MAX_SCALE),
    )
}

/// Configured rotation in radians; pitch is negated.
fn configured_rotation(rotation_deg: Vec3) -> Vec3 {
    Vec3::new(
        -deg_to_rad(rotation_deg.x),
        deg_to_rad(rotation_deg.y),
        deg_to_rad(rotation_deg.z),
    )
}

/// Base orientation that points the +Z face of a mesh at `position` back to
/// the origin.
pub fn facing_center_base(position: Vec3) -> Vec3 {
    let s = Spherical::from_vec3(position);
    Vec3::new(wrap_angle(-s.phi + FRAC_PI_2), wrap_angle(s.theta + PI), 0.0)
}

pub fn orientation(transform: &HotspotTransform, facing_center: bool) -> Euler {
    let mut angles = configured_rotation(transform.rotation);
    if facing_center {
        angles += facing_center_base(transform.position);
    }
    Euler::new(angles.x, angles.y, angles.z, EulerOrder::YXZ)
}

pub fn apply(transform: &HotspotTransform, facing_center: bool, mesh: &mut Mesh) {
    mesh.position = transform.position;
    mesh.rotation = orientation(transform, facing_center);
    mesh.scale = clamp_scale(transform.scale);
}

/// The transform and mesh of one hotspot, bundled so the update can be
/// handed to an animation's progress signal.
#[derive(Clone)]
pub struct SpatialBinding {
    pub transform: Rc<RefCell<HotspotTransform>>,
    pub mesh: SharedMesh,
    pub facing_center: bool,
}

impl SpatialBinding {
    pub fn update(&self) {
        let transform = *self.transform.borrow();
        apply(&transform, self.facing_center, &mut self.mesh.borrow_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(position: Vec3, rotation: Vec3) -> HotspotTransform {
        HotspotTransform { position, rotation, scale: Vec3::ONE }
    }

    fn near(a: [f32; 3], b: [f32; 3]) -> bool {
        (Vec3::from(a) - Vec3::from(b)).length() < 1e-5
    }

    #[test]
    fn scale_is_clamped_per_component() {
        let s = clamp_scale(Vec3::new(0.0, -3.0, 1e9));
        assert_eq!(s, Vec3::new(MIN_SCALE, MIN_SCALE, MAX_SCALE));
        assert_eq!(clamp_scale(Vec3::new(2.0, 1.0, 0.5)), Vec3::new(2.0, 1.0, 0.5));
        assert_eq!(clamp_scale(Vec3::splat(f32::NAN)), Vec3::splat(MIN_SCALE));
    }

    #[test]
    fn scale_clamp_is_bounded_and_monotonic() {
        let inputs = [-1e12, -1.0, 0.0, 1e-9, 1e-6, 0.3, 1.0, 42.0, 1e5, 1e7, f32::INFINITY];
        let mut previous = f32::NEG_INFINITY;
        for v in inputs {
            let c = clamp_scale(Vec3::splat(v)).x;
            assert!((MIN_SCALE..=MAX_SCALE).contains(&c), "{v} -> {c}");
            assert!(c >= previous, "{v} -> {c} after {previous}");
            previous = c;
        }
    }

    #[test]
    fn fixed_mode_ignores_position() {
        let rot = Vec3::new(30.0, 45.0, -10.0);
        let expected = [-deg_to_rad(30.0), deg_to_rad(45.0), deg_to_rad(-10.0)];
        for pos in [Vec3::ZERO, Vec3::new(3.0, -2.0, 8.0), Vec3::new(0.0, 0.0, -5.0)] {
            let e = orientation(&transform(pos, rot), false);
            assert_eq!(e.order, EulerOrder::YXZ);
            assert!(near(e.to_array(), expected));
        }
    }

    #[test]
    fn facing_center_baseline_straight_ahead_is_zero() {
        let e = orientation(&transform(Vec3::new(0.0, 0.0, -1.0), Vec3::ZERO), true);
        assert!(near(e.to_array(), [0.0, 0.0, 0.0]), "{e:?}");
    }

    #[test]
    fn facing_center_turns_the_face_to_the_origin() {
        for pos in [
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(-3.0, 2.0, 4.0),
            Vec3::new(0.0, 0.0, 7.0),
            Vec3::new(1.0, -6.0, -2.0),
        ] {
            let q = orientation(&transform(pos, Vec3::ZERO), true).to_quat();
            let face = q * Vec3::Z;
            let to_center = -pos.normalize();
            assert!((face - to_center).length() < 1e-4, "{pos}: {face} vs {to_center}");
        }
    }

    #[test]
    fn facing_center_adds_configured_rotation() {
        let pos = Vec3::new(4.0, 1.0, -2.0);
        let base = orientation(&transform(pos, Vec3::ZERO), true).to_array();
        let e = orientation(&transform(pos, Vec3::new(10.0, 20.0, 30.0)), true).to_array();
        let delta = Vec3::from(e) - Vec3::from(base);
        assert!((delta - Vec3::new(-deg_to_rad(10.0), deg_to_rad(20.0), deg_to_rad(30.0))).length() < 1e-5);
    }

    #[test]
    fn binding_writes_the_mesh() {
        let binding = SpatialBinding {
            transform: Rc::new(RefCell::new(HotspotTransform {
                position: Vec3::new(1.0, 2.0, 3.0),
                rotation: Vec3::ZERO,
                scale: Vec3::new(0.0, 2.0, 2e6),
            })),
            mesh: Rc::new(RefCell::new(Mesh::new())),
            facing_center: false,
        };
        binding.update();
        let mesh = binding.mesh.borrow();
        assert_eq!(mesh.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.scale, Vec3::new(MIN_SCALE, 2.0, MAX_SCALE));
        assert_eq!(binding.transform.borrow().scale.z, 2e6);
    }
}
