pub mod data;
pub mod primitives;
pub mod vertex;

pub use data::Geometry;
pub use vertex::Vertex;
