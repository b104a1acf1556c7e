/// In-memory `GpuContext` that records every draw.
///
/// Programs keep their own uniform state exactly like a GL program object:
/// a value written once stays until overwritten, across draws and across
/// program switches.  Each draw stores a snapshot of the bound program's
/// uniforms, which is what tests and the headless viewer inspect.
use std::collections::{HashMap, HashSet};

use vista_core::Color;

use super::{DrawCall, GpuContext, GpuError};
use crate::material::{names, MaterialName, ProgramId, ShaderMaterial, UniformValue, Uniforms};
use crate::mesh::MeshId;

#[derive(Debug, Clone)]
struct ProgramState {
    material: MaterialName,
    declared: HashSet<String>,
    values: Uniforms,
}

#[derive(Debug, Clone)]
pub struct RecordedDraw {
    pub mesh: MeshId,
    pub mesh_name: String,
    pub material: MaterialName,
    pub program: ProgramId,
    pub uniforms: Uniforms,
    pub vertices: usize,
    pub indices: usize,
}

impl RecordedDraw {
    /// The `tColor` value the program held when this draw was issued.
    pub fn color(&self) -> Option<Color> {
        self.uniforms.color(names::COLOR)
    }
}

#[derive(Debug, Default)]
pub struct RecordingContext {
    programs: HashMap<ProgramId, ProgramState>,
    bound: Option<ProgramId>,
    next_program: u32,
    draws: Vec<RecordedDraw>,
    uploads: usize,
    raw_writes: usize,
    links: usize,
    released: Vec<MeshId>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    /// Draws recorded with the given material.
    pub fn draws_with<'a>(&'a self, material: &'a MaterialName) -> impl Iterator<Item = &'a RecordedDraw> {
        self.draws.iter().filter(move |d| &d.material == material)
    }

    /// Number of cached-path uploads so far.
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    pub fn raw_write_count(&self) -> usize {
        self.raw_writes
    }

    pub fn link_count(&self) -> usize {
        self.links
    }

    /// Current value of `name` inside `program`.
    pub fn program_uniform(&self, program: ProgramId, name: &str) -> Option<&UniformValue> {
        self.programs.get(&program)?.values.get(name)
    }

    /// Forget recorded draws and counters; linked programs survive.
    /// Meshes handed to [`GpuContext::release_mesh`], oldest first.
    pub fn released(&self) -> &[MeshId] {
        &self.released
    }

    pub fn clear_frame(&mut self) {
        self.draws.clear();
        self.uploads = 0;
        self.raw_writes = 0;
    }

    fn bound_state(&mut self) -> Result<(ProgramId, &mut ProgramState), GpuError> {
        let id = self.bound.ok_or(GpuError::NoProgramBound)?;
        let state = self.programs.get_mut(&id).ok_or(GpuError::UnknownProgram(id))?;
        Ok((id, state))
    }
}

impl GpuContext for RecordingContext {
    fn link_program(&mut self, material: &ShaderMaterial) -> Result<ProgramId, GpuError> {
        let id = ProgramId(self.next_program);
        self.next_program += 1;
        self.links += 1;
        log::debug!("linked {} as {:?}", material.name, id);
        self.programs.insert(
            id,
            ProgramState {
                material: material.name.clone(),
                declared: material.uniforms.names().map(str::to_string).collect(),
                values: Uniforms::new(),
            },
        );
        Ok(id)
    }

    fn use_program(&mut self, program: ProgramId) -> Result<(), GpuError> {
        if !self.programs.contains_key(&program) {
            return Err(GpuError::UnknownProgram(program));
        }
        self.bound = Some(program);
        Ok(())
    }

    fn bound_program(&self) -> Option<ProgramId> {
        self.bound
    }

    fn upload_uniforms(&mut self, uniforms: &Uniforms) -> Result<(), GpuError> {
        let (_, state) = self.bound_state()?;
        for (name, value) in uniforms.iter() {
            if state.declared.contains(name) {
                state.values.set(name, value.clone());
            }
        }
        self.uploads += 1;
        Ok(())
    }

    fn write_bound_uniform(&mut self, name: &str, value: &UniformValue) -> Result<(), GpuError> {
        let (program, state) = self.bound_state()?;
        if !state.declared.contains(name) {
            return Err(GpuError::UnknownUniform {
                program,
                name: name.to_string(),
            });
        }
        state.values.set(name, value.clone());
        self.raw_writes += 1;
        Ok(())
    }

    fn draw(&mut self, call: DrawCall<'_>) -> Result<(), GpuError> {
        let (program, state) = self.bound_state()?;
        let draw = RecordedDraw {
            mesh: call.mesh,
            mesh_name: call.name.to_string(),
            material: state.material.clone(),
            program,
            uniforms: state.values.clone(),
            vertices: call.geometry.vertex_count(),
            indices: call.geometry.index_count(),
        };
        self.draws.push(draw);
        Ok(())
    }

    fn release_mesh(&mut self, mesh: MeshId) {
        self.released.push(mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::{plane, PlaneOptions};
    use glam::Mat4;

    #[test]
    fn raw_write_needs_a_bound_program() {
        let mut gl = RecordingContext::new();
        let err = gl.write_bound_uniform(names::COLOR, &Color::WHITE.into()).unwrap_err();
        assert_eq!(err, GpuError::NoProgramBound);
    }

    #[test]
    fn program_state_persists_across_switches() {
        let mut gl = RecordingContext::new();
        let picking = gl.link_program(&ShaderMaterial::picking()).unwrap();
        let hotspot = gl.link_program(&ShaderMaterial::hotspot()).unwrap();

        gl.use_program(picking).unwrap();
        gl.write_bound_uniform(names::COLOR, &Color::GREEN.into()).unwrap();
        gl.use_program(hotspot).unwrap();
        gl.write_bound_uniform(names::COLOR, &Color::WHITE.into()).unwrap();
        gl.use_program(picking).unwrap();

        let geometry = plane(&PlaneOptions::default());
        gl.draw(DrawCall { mesh: MeshId::next(), name: "m", geometry: &geometry, model: Mat4::IDENTITY })
            .unwrap();
        assert_eq!(gl.draws()[0].color(), Some(Color::GREEN));
        assert_eq!(gl.raw_write_count(), 2);
    }

    #[test]
    fn undeclared_uniforms() {
        let mut gl = RecordingContext::new();
        let picking = gl.link_program(&ShaderMaterial::picking()).unwrap();
        gl.use_program(picking).unwrap();

        let mut extra = Uniforms::new();
        extra.set(names::OPACITY, 0.5_f32);
        gl.upload_uniforms(&extra).unwrap();
        assert!(gl.program_uniform(picking, names::OPACITY).is_none());

        let err = gl.write_bound_uniform(names::OPACITY, &UniformValue::Float(0.5)).unwrap_err();
        assert!(matches!(err, GpuError::UnknownUniform { .. }));
    }
}
