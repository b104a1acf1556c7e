//! Built-in primitive generators.
//!
//! Every generator takes an options struct that deserializes from the
//! camelCase JSON used in hotspot documents; missing fields fall back to the
//! defaults below.

pub mod cuboid;
pub mod cylinder;
pub mod plane;
pub mod sphere;

pub use cuboid::{cuboid, BoxOptions};
pub use cylinder::{cylinder, CylinderOptions};
pub use plane::{plane, PlaneOptions};
pub use sphere::{sphere, SphereOptions};

/// Upper bound on any segment count a document can ask for.  Keeps vertex
/// counts and `u32` index arithmetic in range.
pub const MAX_SEGMENTS: u32 = 1024;

pub(crate) fn segments(requested: u32, min: u32) -> u32 {
    requested.clamp(min, MAX_SEGMENTS)
}

/// Indices for a `(gx + 1) × (gy + 1)` vertex grid starting at `base`,
/// two counter-clockwise triangles per cell.
pub(crate) fn grid_indices(base: u32, gx: u32, gy: u32, out: &mut Vec<u32>) {
    let row = gx + 1;
    for iy in 0..gy {
        for ix in 0..gx {
            let a = base + ix + row * iy;
            let b = base + ix + row * (iy + 1);
            let c = base + (ix + 1) + row * (iy + 1);
            let d = base + (ix + 1) + row * iy;
            out.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}
