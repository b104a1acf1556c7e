/// UV sphere centred at the origin, poles on ±Y.
use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::Deserialize;

use super::segments;
use crate::geometry::{Geometry, Vertex};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SphereOptions {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub phi_start: f32,
    pub phi_length: f32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            radius: 10.0,
            width_segments: 64,
            height_segments: 64,
            phi_start: 0.0,
            phi_length: TAU,
            theta_start: 0.0,
            theta_length: PI,
        }
    }
}

pub fn sphere(opts: &SphereOptions) -> Geometry {
    let ws = segments(opts.width_segments, 3);
    let hs = segments(opts.height_segments, 2);
    let r = opts.radius;
    let row = ws + 1;
    let theta_end = (opts.theta_start + opts.theta_length).min(PI);

    let mut vertices = Vec::with_capacity((row * (hs + 1)) as usize);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let theta = opts.theta_start + v * opts.theta_length;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let phi = opts.phi_start + u * opts.phi_length;
            let p = Vec3::new(
                -r * phi.cos() * theta.sin(),
                r * theta.cos(),
                r * phi.sin() * theta.sin(),
            );
            vertices.push(Vertex::new(
                p.to_array(),
                p.normalize_or_zero().to_array(),
                [u, 1.0 - v],
            ));
        }
    }

    // Pole rows collapse to a point, so only one triangle per cell there.
    let mut indices = Vec::new();
    for iy in 0..hs {
        for ix in 0..ws {
            let a = row * iy + ix + 1;
            let b = row * iy + ix;
            let c = row * (iy + 1) + ix;
            let d = row * (iy + 1) + ix + 1;
            if iy != 0 || opts.theta_start > 0.0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 || theta_end < PI {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    Geometry::new("sphere", vertices, indices)
}
