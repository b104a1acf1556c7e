pub mod texture;
#[cfg(feature = "gpu")]
pub mod uniform_slots;

pub use texture::{Texture, TextureRef};
#[cfg(feature = "gpu")]
pub use uniform_slots::UniformSlots;
