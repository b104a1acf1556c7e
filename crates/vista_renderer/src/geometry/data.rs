/// CPU-side indexed triangle geometry.
///
/// Geometry is built once by a primitive generator and can be reshaped with
/// [`Geometry::scale`], which rewrites the vertex data in place.  The
/// accumulated factor is kept as `baked_scale` so callers can tell it apart
/// from the live, per-frame scale carried by the `Mesh`.
use glam::Vec3;

use crate::geometry::Vertex;
use crate::scene::culling::Aabb;

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Short label naming the generator (`"plane"`, `"box"`, ...).
    pub label: &'static str,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    baked_scale: Vec3,
}

impl Geometry {
    pub fn new(label: &'static str, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            label,
            vertices,
            indices,
            baked_scale: Vec3::ONE,
        }
    }

    /// Scale every vertex position by `factor`.
    ///
    /// Normals are corrected with the inverse scale and renormalised so
    /// lighting stays right under non-uniform scale.  Zero components leave
    /// the normals untouched.
    pub fn scale(&mut self, factor: Vec3) {
        let fix_normals = factor.x != 0.0 && factor.y != 0.0 && factor.z != 0.0;
        for v in &mut self.vertices {
            v.position = (Vec3::from(v.position) * factor).to_array();
            if fix_normals {
                v.normal = (Vec3::from(v.normal) / factor).normalize_or_zero().to_array();
            }
        }
        self.baked_scale *= factor;
    }

    /// Product of every factor passed to [`Geometry::scale`] so far.
    #[inline]
    pub fn baked_scale(&self) -> Vec3 {
        self.baked_scale
    }

    /// Object-space bounding box; `None` for empty geometry.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
