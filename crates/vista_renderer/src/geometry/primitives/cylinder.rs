/// Capped cylinder (or cone frustum) along Y, centred at the origin.
use std::f32::consts::TAU;

use glam::Vec3;
use serde::Deserialize;

use super::segments;
use crate::geometry::{Geometry, Vertex};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CylinderOptions {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub open_ended: bool,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for CylinderOptions {
    fn default() -> Self {
        Self {
            radius_top: 10.0,
            radius_bottom: 10.0,
            height: 20.0,
            radial_segments: 64,
            height_segments: 1,
            open_ended: false,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }
}

pub fn cylinder(opts: &CylinderOptions) -> Geometry {
    let rs = segments(opts.radial_segments, 3);
    let hs = segments(opts.height_segments, 1);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    torso(opts, rs, hs, &mut vertices, &mut indices);
    if !opts.open_ended {
        if opts.radius_top > 0.0 {
            cap(opts, rs, true, &mut vertices, &mut indices);
        }
        if opts.radius_bottom > 0.0 {
            cap(opts, rs, false, &mut vertices, &mut indices);
        }
    }
    Geometry::new("cylinder", vertices, indices)
}

fn torso(opts: &CylinderOptions, rs: u32, hs: u32, vertices: &mut Vec<Vertex>, indices: &mut Vec<u32>) {
    let half = opts.height / 2.0;
    let slope = if opts.height != 0.0 {
        (opts.radius_bottom - opts.radius_top) / opts.height
    } else {
        0.0
    };
    let row = rs + 1;

    for y in 0..=hs {
        let v = y as f32 / hs as f32;
        let radius = v * (opts.radius_bottom - opts.radius_top) + opts.radius_top;
        for x in 0..=rs {
            let u = x as f32 / rs as f32;
            let (sin, cos) = (opts.theta_start + u * opts.theta_length).sin_cos();
            vertices.push(Vertex::new(
                [radius * sin, -v * opts.height + half, radius * cos],
                Vec3::new(sin, slope, cos).normalize_or_zero().to_array(),
                [u, 1.0 - v],
            ));
        }
    }

    for y in 0..hs {
        for x in 0..rs {
            let a = row * y + x;
            let b = row * (y + 1) + x;
            let c = row * (y + 1) + x + 1;
            let d = row * y + x + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

fn cap(opts: &CylinderOptions, rs: u32, top: bool, vertices: &mut Vec<Vertex>, indices: &mut Vec<u32>) {
    let sign = if top { 1.0 } else { -1.0 };
    let radius = if top { opts.radius_top } else { opts.radius_bottom };
    let y = opts.height / 2.0 * sign;
    let normal = [0.0, sign, 0.0];

    // One centre vertex per segment so each wedge gets its own uv.
    let center_start = vertices.len() as u32;
    for _ in 0..rs {
        vertices.push(Vertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));
    }
    let rim_start = vertices.len() as u32;
    for x in 0..=rs {
        let u = x as f32 / rs as f32;
        let (sin, cos) = (opts.theta_start + u * opts.theta_length).sin_cos();
        vertices.push(Vertex::new(
            [radius * sin, y, radius * cos],
            normal,
            [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5],
        ));
    }

    for x in 0..rs {
        let c = center_start + x;
        let i = rim_start + x;
        if top {
            indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}
