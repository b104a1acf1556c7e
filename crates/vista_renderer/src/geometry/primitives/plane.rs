/// Flat rectangle in the XY plane, facing +Z, centred at the origin.
use serde::Deserialize;

use super::{grid_indices, segments};
use crate::geometry::{Geometry, Vertex};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaneOptions {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for PlaneOptions {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
            width_segments: 8,
            height_segments: 8,
        }
    }
}

pub fn plane(opts: &PlaneOptions) -> Geometry {
    let gx = segments(opts.width_segments, 1);
    let gy = segments(opts.height_segments, 1);
    let seg_w = opts.width / gx as f32;
    let seg_h = opts.height / gy as f32;
    let (half_w, half_h) = (opts.width / 2.0, opts.height / 2.0);

    let mut vertices = Vec::with_capacity(((gx + 1) * (gy + 1)) as usize);
    for iy in 0..=gy {
        let y = iy as f32 * seg_h - half_h;
        for ix in 0..=gx {
            let x = ix as f32 * seg_w - half_w;
            vertices.push(Vertex::new(
                [x, -y, 0.0],
                [0.0, 0.0, 1.0],
                [ix as f32 / gx as f32, 1.0 - iy as f32 / gy as f32],
            ));
        }
    }

    let mut indices = Vec::with_capacity((gx * gy * 6) as usize);
    grid_indices(0, gx, gy, &mut indices);
    Geometry::new("plane", vertices, indices)
}
