//! The narrow GPU capability the renderer and render hooks talk to.
//!
//! Two uniform paths exist on purpose:
//!
//! * [`GpuContext::upload_uniforms`] is the normal, per-material path.  The
//!   renderer only calls it when the material changes between draws.
//! * [`GpuContext::write_bound_uniform`] writes one value straight into the
//!   currently bound program and is what a hook uses when several meshes
//!   share one material but need different values.

pub mod recording;
#[cfg(feature = "gpu")]
pub mod wgpu_backend;

use glam::Mat4;
use thiserror::Error;

use crate::geometry::Geometry;
use crate::material::{ProgramId, ShaderMaterial, UniformValue, Uniforms};
use crate::mesh::MeshId;

pub use recording::{RecordedDraw, RecordingContext};
#[cfg(feature = "gpu")]
pub use wgpu_backend::WgpuContext;

#[derive(Debug, Error, PartialEq)]
pub enum GpuError {
    #[error("no program is bound")]
    NoProgramBound,
    #[error("unknown program {0:?}")]
    UnknownProgram(ProgramId),
    #[error("program {program:?} has no uniform `{name}`")]
    UnknownUniform { program: ProgramId, name: String },
    #[error("unsupported material `{0}`")]
    UnsupportedMaterial(String),
}

/// Everything a backend needs to issue one draw.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub mesh: MeshId,
    pub name: &'a str,
    pub geometry: &'a Geometry,
    pub model: Mat4,
}

pub trait GpuContext {
    /// Compile and link a program for `material`; the returned id stays valid
    /// for the lifetime of the context.
    fn link_program(&mut self, material: &ShaderMaterial) -> Result<ProgramId, GpuError>;

    fn use_program(&mut self, program: ProgramId) -> Result<(), GpuError>;

    fn bound_program(&self) -> Option<ProgramId>;

    /// Upload every uniform the bound program declares.  Names the program
    /// does not use are ignored.
    fn upload_uniforms(&mut self, uniforms: &Uniforms) -> Result<(), GpuError>;

    /// Write a single value into the bound program, bypassing any caching.
    fn write_bound_uniform(&mut self, name: &str, value: &UniformValue) -> Result<(), GpuError>;

    fn draw(&mut self, call: DrawCall<'_>) -> Result<(), GpuError>;

    /// Drop whatever the backend cached for a mesh that left the scene.
    /// Unknown ids are ignored.
    fn release_mesh(&mut self, mesh: MeshId);
}
