/// CPU-side visibility test for mesh bounds.
///
/// The six clip planes are pulled straight out of the combined `view_proj`
/// matrix (Gribb-Hartmann).  A box is rejected as soon as its positive
/// vertex lies behind one plane; anything else counts as visible, so the
/// test never drops a mesh that is actually on screen.
use glam::{Mat4, Vec3, Vec4};

// ── Aabb ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box enclosing every point; `None` when the iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self::new(p, p),
                Some(b) => Self::new(b.min.min(p), b.max.max(p)),
            })
        })
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Bounds of this box after `transform`, via centre + rotated half-extents.
    pub fn transform(&self, transform: &Mat4) -> Self {
        let centre = transform.transform_point3(self.center());
        let half = (self.max - self.min) * 0.5;

        let m = transform.to_cols_array_2d();
        let extent = Vec3::new(
            half.x * m[0][0].abs() + half.y * m[1][0].abs() + half.z * m[2][0].abs(),
            half.x * m[0][1].abs() + half.y * m[1][1].abs() + half.z * m[2][1].abs(),
            half.x * m[0][2].abs() + half.y * m[1][2].abs() + half.z * m[2][2].abs(),
        );

        Self::new(centre - extent, centre + extent)
    }
}

// ── Frustum ──────────────────────────────────────────────────────────────────

/// Planes stored as `(nx, ny, nz, d)`; visible points satisfy
/// `dot(n, p) + d >= 0`.
#[derive(Clone, Debug)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    /// Expects a `[0, 1]` clip depth range, as produced by `Mat4::perspective_rh`.
    pub fn from_view_proj(vp: &Mat4) -> Self {
        let r0 = vp.row(0);
        let r1 = vp.row(1);
        let r2 = vp.row(2);
        let r3 = vp.row(3);

        let mut planes = [
            r3 + r0, // left
            r3 - r0, // right
            r3 + r1, // bottom
            r3 - r1, // top
            r2,      // near
            r3 - r2, // far
        ];
        for p in &mut planes {
            let len = p.truncate().length();
            if len > 1e-6 {
                *p /= len;
            }
        }
        Self { planes }
    }

    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            let positive = Vec3::new(
                if plane.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            plane.truncate().dot(positive) + plane.w >= 0.0
        })
    }
}
