//! vista_core: basic types and utilities shared by the renderer, the hotspot
//! layer and the viewer.

pub mod color;
pub mod json;
pub mod math;
pub mod registry;
pub mod signal;

pub use color::{Color, ColorError};
pub use registry::{RegistryError, UidRegistry};
pub use signal::{Signal, SignalHandle};

// glam is part of the public API (positions, rotations, matrices)
pub use glam;
