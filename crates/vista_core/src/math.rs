//! Small numeric helpers shared by the transform and orientation code.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Degrees → radians.
#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * (PI / 180.0)
}

/// Radians → degrees.
#[inline]
pub fn rad_to_deg(rad: f32) -> f32 {
    rad * (180.0 / PI)
}

/// Clamp `value` to `[min, max]`.  NaN collapses to `min`.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Wrap an angle in radians into `(-π, π]`.
pub fn wrap_angle(rad: f32) -> f32 {
    let wrapped = (rad + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Spherical coordinates about the origin.
///
/// * `radius`: distance from the origin.
/// * `phi`: polar angle from the +Y axis, in `[0, π]`.
/// * `theta`: azimuth around +Y, measured from +Z towards +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_vec3(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self { radius, phi: 0.0, theta: 0.0 };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: clamp(v.y / radius, -1.0, 1.0).acos(),
        }
    }
}

/// Position on a sphere from yaw `theta` and pitch `phi` (both in degrees).
///
/// `theta = 0, phi = 0` points down −Z, the default forward direction.
pub fn spherical_to_cartesian(radius: f32, theta_deg: f32, phi_deg: f32) -> Vec3 {
    let theta = deg_to_rad(theta_deg);
    let phi = deg_to_rad(phi_deg);
    Vec3::new(
        radius * phi.cos() * theta.sin(),
        radius * phi.sin(),
        -radius * phi.cos() * theta.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spherical_of_forward_axis() {
        let s = Spherical::from_vec3(Vec3::new(0.0, 0.0, -1.0));
        assert!((s.radius - 1.0).abs() < 1e-6);
        assert!((s.phi - PI / 2.0).abs() < 1e-6);
        assert!((s.theta - PI).abs() < 1e-6);
    }

    #[test]
    fn spherical_of_origin_is_zero() {
        let s = Spherical::from_vec3(Vec3::ZERO);
        assert_eq!(s, Spherical { radius: 0.0, phi: 0.0, theta: 0.0 });
    }

    #[test]
    fn wrap_angle_range() {
        assert!(wrap_angle(TAU).abs() < 1e-6);
        assert!((wrap_angle(PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn clamp_handles_nan_and_bounds() {
        assert_eq!(clamp(f32::NAN, 1.0, 2.0), 1.0);
        assert_eq!(clamp(5.0, 1.0, 2.0), 2.0);
        assert_eq!(clamp(-5.0, 1.0, 2.0), 1.0);
    }

    #[test]
    fn cartesian_forward_and_up() {
        let f = spherical_to_cartesian(5.0, 0.0, 0.0);
        assert!((f - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
        let u = spherical_to_cartesian(2.0, 0.0, 90.0);
        assert!((u - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
    }
}
