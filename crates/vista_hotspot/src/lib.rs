/// `vista_hotspot`: interactive 3D hotspots for the panorama viewer.
///
/// A [`Hotspot3D`] is built from a JSON document ([`HotspotConfig`]).  It owns
/// a transform, a material, and optionally an animation, a sound and a table
/// of events.  Once the material is ready the hotspot attaches geometry to its
/// mesh, places it, takes a picking color and installs the render hooks that
/// drive both the color and the picking pass.
///
/// # Module layout
///
/// | Module           | Responsibility                                        |
/// |------------------|-------------------------------------------------------|
/// | `config`         | The hotspot document                                  |
/// | `hotspot`        | `Hotspot3D` lifecycle                                 |
/// | `object`         | Identity, tags, visibility, the owned mesh            |
/// | `services`       | Registry, picking colors and textures shared by a scene |
/// | `transform`      | Position / rotation / scale documents                 |
/// | `spatial`        | Transform → mesh placement, facing-center orientation |
/// | `geometry`       | Geometry descriptor → primitive                       |
/// | `material`       | Color or texture material, presets                    |
/// | `texture_source` | File and in-memory texture fetching                   |
/// | `render`         | Per-pass render hooks                                 |
/// | `animation`      | Keyframe tracks driving the transform                 |
/// | `sound`          | Positional sound bookkeeping                          |
/// | `events`         | Declarative event → action table                      |
pub mod animation;
pub mod config;
pub mod events;
pub mod geometry;
pub mod hotspot;
pub mod material;
pub mod object;
pub mod render;
pub mod services;
pub mod sound;
pub mod spatial;
pub mod texture_source;
pub mod transform;

pub use animation::{AnimationConfig, AnimationProgress, Easing, HotspotAnimation};
pub use config::{ConfigError, HotspotConfig};
pub use events::{HotspotEvent, HotspotEvents};
pub use geometry::{GeometryDescriptor, HotspotGeometryType};
pub use hotspot::{Hotspot3D, HotspotState};
pub use material::{presets, HotspotMaterial, MaterialConfig, MaterialState, MaterialType};
pub use object::Object3D;
pub use render::{MaterialContent, RenderState};
pub use services::SceneServices;
pub use sound::{HotspotSound, SoundConfig, SoundOptions, SoundState};
pub use texture_source::{FileTextureSource, MemoryTextureSource, TextureError, TextureLoading, TextureSource};
pub use transform::{HotspotTransform, PositionConfig, TransformConfig, Vec3Config};
