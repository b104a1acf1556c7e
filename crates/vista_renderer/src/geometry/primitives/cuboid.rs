/// Axis-aligned box centred at the origin, built from six subdivided faces.
use glam::Vec3;
use serde::Deserialize;

use super::{grid_indices, segments};
use crate::geometry::{Geometry, Vertex};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxOptions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub depth_segments: u32,
}

impl Default for BoxOptions {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
            depth: 20.0,
            width_segments: 8,
            height_segments: 8,
            depth_segments: 8,
        }
    }
}

const X: usize = 0;
const Y: usize = 1;
const Z: usize = 2;

struct Face {
    u: usize,
    v: usize,
    w: usize,
    udir: f32,
    vdir: f32,
    width: f32,
    height: f32,
    depth: f32,
    gx: u32,
    gy: u32,
}

pub fn cuboid(opts: &BoxOptions) -> Geometry {
    let ws = segments(opts.width_segments, 1);
    let hs = segments(opts.height_segments, 1);
    let ds = segments(opts.depth_segments, 1);
    let (w, h, d) = (opts.width, opts.height, opts.depth);

    #[rustfmt::skip]
    let faces = [
        Face { u: Z, v: Y, w: X, udir: -1.0, vdir: -1.0, width: d, height: h, depth:  w, gx: ds, gy: hs }, // +x
        Face { u: Z, v: Y, w: X, udir:  1.0, vdir: -1.0, width: d, height: h, depth: -w, gx: ds, gy: hs }, // -x
        Face { u: X, v: Z, w: Y, udir:  1.0, vdir:  1.0, width: w, height: d, depth:  h, gx: ws, gy: ds }, // +y
        Face { u: X, v: Z, w: Y, udir:  1.0, vdir: -1.0, width: w, height: d, depth: -h, gx: ws, gy: ds }, // -y
        Face { u: X, v: Y, w: Z, udir:  1.0, vdir: -1.0, width: w, height: h, depth:  d, gx: ws, gy: hs }, // +z
        Face { u: X, v: Y, w: Z, udir: -1.0, vdir: -1.0, width: w, height: h, depth: -d, gx: ws, gy: hs }, // -z
    ];

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for face in &faces {
        build_face(face, &mut vertices, &mut indices);
    }
    Geometry::new("box", vertices, indices)
}

fn build_face(f: &Face, vertices: &mut Vec<Vertex>, indices: &mut Vec<u32>) {
    let base = vertices.len() as u32;
    let seg_w = f.width / f.gx as f32;
    let seg_h = f.height / f.gy as f32;
    let (half_w, half_h, half_d) = (f.width / 2.0, f.height / 2.0, f.depth / 2.0);

    let mut normal = Vec3::ZERO;
    normal[f.w] = if f.depth > 0.0 { 1.0 } else { -1.0 };

    for iy in 0..=f.gy {
        let y = iy as f32 * seg_h - half_h;
        for ix in 0..=f.gx {
            let x = ix as f32 * seg_w - half_w;
            let mut p = Vec3::ZERO;
            p[f.u] = x * f.udir;
            p[f.v] = y * f.vdir;
            p[f.w] = half_d;
            vertices.push(Vertex::new(
                p.to_array(),
                normal.to_array(),
                [ix as f32 / f.gx as f32, 1.0 - iy as f32 / f.gy as f32],
            ));
        }
    }
    grid_indices(base, f.gx, f.gy, indices);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_box_bounds_and_face_normals() {
        let g = cuboid(&BoxOptions {
            width: 2.0,
            height: 4.0,
            depth: 6.0,
            width_segments: 1,
            height_segments: 1,
            depth_segments: 1,
        });
        assert_eq!(g.vertex_count(), 24);
        assert_eq!(g.triangle_count(), 12);
        let b = g.bounds().unwrap();
        assert_eq!(b.min.to_array(), [-1.0, -2.0, -3.0]);
        assert_eq!(b.max.to_array(), [1.0, 2.0, 3.0]);
        // Every vertex sits on the face its normal points out of.
        for v in &g.vertices {
            let n = Vec3::from(v.normal);
            let p = Vec3::from(v.position);
            assert!(p.dot(n) > 0.0);
        }
    }
}
