pub mod culling;

pub use culling::{Aabb, Frustum};
