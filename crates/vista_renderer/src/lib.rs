/// `vista_renderer`: meshes, materials and the two panorama render passes.
///
/// # Module layout
///
/// | Module      | Responsibility                                             |
/// |-------------|------------------------------------------------------------|
/// | `geometry`  | `Vertex`, CPU `Geometry`, built-in primitives              |
/// | `material`  | `ShaderMaterial`, uniform names and values                 |
/// | `mesh`      | `Mesh` node, Euler rotation, render hooks                  |
/// | `context`   | `GpuContext` capability, recording and wgpu backends       |
/// | `view`      | Projection kinds, panorama camera, shared view uniforms    |
/// | `scene`     | AABB + frustum culling                                     |
/// | `picking`   | Unique per-mesh picking colors                             |
/// | `passes`    | `PassKind`, `FrameStats`                                   |
/// | `resources` | Decoded textures, GPU uniform slots                        |
pub mod context;
pub mod geometry;
pub mod material;
pub mod mesh;
pub mod passes;
pub mod picking;
pub mod resources;
pub mod scene;
pub mod view;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use glam;

pub use context::{DrawCall, GpuContext, GpuError, RecordedDraw, RecordingContext};
pub use geometry::{Geometry, Vertex};
pub use material::{names, MaterialName, ProgramId, ShaderMaterial, Side, UniformValue, Uniforms};
pub use mesh::{Euler, EulerOrder, Mesh, MeshId, RenderCallback, RenderContext};
pub use passes::{FrameStats, PassKind};
pub use picking::PickingColorAllocator;
pub use resources::{Texture, TextureRef};
pub use view::{PanoramaCamera, View, ViewKind, ViewState, Viewport};

// ── Internal imports ──────────────────────────────────────────────────────────

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use material::MaterialKey;
use scene::Frustum;

pub type SharedMesh = Rc<RefCell<Mesh>>;

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Draws a flat list of meshes in either pass.
///
/// Programs are linked once per material name and reused by every material
/// instance with that name.  Within one pass, material uniforms are uploaded
/// only when the material or the program differs from the previous draw, so
/// a material shared by many meshes (the picking material) is uploaded once.
pub struct Renderer {
    meshes: Vec<SharedMesh>,
    picking_material: ShaderMaterial,
    programs: HashMap<MaterialName, ProgramId>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            picking_material: ShaderMaterial::picking(),
            programs: HashMap::new(),
        }
    }

    /// Add a mesh; adding the same mesh twice is a no-op.
    pub fn add_mesh(&mut self, mesh: SharedMesh) {
        if self.meshes.iter().any(|m| Rc::ptr_eq(m, &mesh)) {
            return;
        }
        self.meshes.push(mesh);
    }

    pub fn remove_mesh(&mut self, id: MeshId) -> bool {
        let before = self.meshes.len();
        self.meshes.retain(|m| m.borrow().id != id);
        self.meshes.len() != before
    }

    pub fn mesh(&self, id: MeshId) -> Option<SharedMesh> {
        self.meshes.iter().find(|m| m.borrow().id == id).cloned()
    }

    pub fn meshes(&self) -> &[SharedMesh] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn picking_material(&self) -> &ShaderMaterial {
        &self.picking_material
    }

    /// Run one pass over every mesh.
    pub fn render(&mut self, pass: PassKind, gl: &mut dyn GpuContext, view: &dyn View) -> FrameStats {
        let frustum = view
            .kind()
            .supports_frustum_culling()
            .then(|| Frustum::from_view_proj(&view.view_proj()));
        let mut last_upload: Option<(MaterialKey, ProgramId)> = None;
        let mut stats = FrameStats::default();

        for shared in &self.meshes {
            let (id, mut own_material, before, after) = {
                let mut mesh = shared.borrow_mut();
                if !mesh.visible || mesh.geometry.is_none() {
                    stats.skipped += 1;
                    continue;
                }
                if let (true, Some(frustum)) = (mesh.frustum_culled, &frustum) {
                    if mesh.world_aabb().is_some_and(|aabb| !frustum.intersects_aabb(&aabb)) {
                        stats.culled += 1;
                        continue;
                    }
                }
                let own = match pass {
                    PassKind::Color => match mesh.material.take() {
                        Some(m) => Some(m),
                        None => {
                            stats.skipped += 1;
                            continue;
                        }
                    },
                    PassKind::Picking => None,
                };
                (mesh.id, own, mesh.on_before_render.clone(), mesh.on_after_render.clone())
            };

            let material = match own_material.as_mut() {
                Some(m) => m,
                None => &mut self.picking_material,
            };

            let hooks = Hooks { before: before.as_ref(), after: after.as_ref() };
            let result = draw_mesh(shared, id, pass, material, hooks, &mut self.programs, &mut last_upload, gl, view);
            match result {
                Ok(()) => stats.drawn += 1,
                Err(err) => {
                    log::warn!("{pass:?} pass: mesh {id:?} not drawn: {err}");
                    stats.skipped += 1;
                }
            }

            if let Some(m) = own_material {
                shared.borrow_mut().material = Some(m);
            }
        }

        log::trace!("{pass:?} pass: {stats:?}");
        stats
    }
}

struct Hooks<'a> {
    before: Option<&'a RenderCallback>,
    after: Option<&'a RenderCallback>,
}

#[allow(clippy::too_many_arguments)]
fn draw_mesh(
    shared: &SharedMesh,
    id: MeshId,
    pass: PassKind,
    material: &mut ShaderMaterial,
    hooks: Hooks<'_>,
    programs: &mut HashMap<MaterialName, ProgramId>,
    last_upload: &mut Option<(MaterialKey, ProgramId)>,
    gl: &mut dyn GpuContext,
    view: &dyn View,
) -> Result<(), GpuError> {
    if let Some(cb) = hooks.before {
        cb(&mut RenderContext { gl: &mut *gl, view, material: &mut *material, pass, mesh: id });
    }

    let program = match material.program {
        Some(p) => p,
        None => {
            let p = match programs.get(&material.name) {
                Some(&p) => p,
                None => {
                    let p = gl.link_program(material)?;
                    programs.insert(material.name.clone(), p);
                    p
                }
            };
            material.program = Some(p);
            p
        }
    };
    if gl.bound_program() != Some(program) {
        gl.use_program(program)?;
    }
    if *last_upload != Some((material.key(), program)) {
        gl.upload_uniforms(&material.uniforms)?;
        *last_upload = Some((material.key(), program));
    }

    {
        let mesh = shared.borrow();
        if let Some(geometry) = mesh.geometry.as_ref() {
            gl.draw(DrawCall { mesh: id, name: &mesh.name, geometry, model: mesh.matrix() })?;
        }
    }

    if let Some(cb) = hooks.after {
        cb(&mut RenderContext { gl, view, material, pass, mesh: id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::primitives::{plane, PlaneOptions};
    use glam::Vec3;
    use std::cell::Cell;
    use vista_core::Color;

    fn ready_mesh(z: f32) -> SharedMesh {
        let mut m = Mesh::new();
        m.name = format!("mesh@{z}");
        m.geometry = Some(plane(&PlaneOptions::default()));
        m.material = Some(ShaderMaterial::hotspot());
        m.position = Vec3::new(0.0, 0.0, z);
        Rc::new(RefCell::new(m))
    }

    #[test]
    fn color_pass_draws_each_mesh_with_its_own_material() {
        let mut r = Renderer::new();
        let a = ready_mesh(-50.0);
        let b = ready_mesh(-60.0);
        a.borrow_mut().material.as_mut().unwrap().uniforms.set(names::COLOR, Color::GREEN);
        r.add_mesh(a.clone());
        r.add_mesh(b);

        let mut gl = RecordingContext::new();
        let stats = r.render(PassKind::Color, &mut gl, &ViewState::default());
        assert_eq!(stats, FrameStats { drawn: 2, culled: 0, skipped: 0 });
        assert_eq!(gl.draws()[0].color(), Some(Color::GREEN));
        assert_eq!(gl.draws()[1].color(), Some(Color::WHITE));
        // One program for both instances, material handed back afterwards.
        assert_eq!(gl.link_count(), 1);
        assert!(a.borrow().material.is_some());
    }

    #[test]
    fn shared_material_is_uploaded_once_per_pass() {
        let mut r = Renderer::new();
        for z in [-10.0, -20.0, -30.0] {
            r.add_mesh(ready_mesh(z));
        }
        let mut gl = RecordingContext::new();
        r.render(PassKind::Picking, &mut gl, &ViewState::default());
        assert_eq!(gl.upload_count(), 1);
        assert_eq!(gl.draws().len(), 3);
        assert!(r.picking_material().program.is_some());
    }

    #[test]
    fn culling_depends_on_view_kind() {
        let mut r = Renderer::new();
        r.add_mesh(ready_mesh(-50.0));
        r.add_mesh(ready_mesh(50.0));
        let mut gl = RecordingContext::new();

        let stats = r.render(PassKind::Color, &mut gl, &ViewState::default());
        assert_eq!((stats.drawn, stats.culled), (1, 1));

        let gopro = ViewState { kind: ViewKind::Gopro, ..Default::default() };
        let stats = r.render(PassKind::Color, &mut gl, &gopro);
        assert_eq!((stats.drawn, stats.culled), (2, 0));
    }

    #[test]
    fn hooks_run_around_the_draw() {
        let mut r = Renderer::new();
        let mesh = ready_mesh(-10.0);
        let calls = Rc::new(Cell::new((0, 0)));
        let c = Rc::clone(&calls);
        mesh.borrow_mut().on_before_render = Some(Rc::new(move |ctx: &mut RenderContext<'_>| {
            ctx.view.update_uniforms(&mut ctx.material.uniforms);
            c.set((c.get().0 + 1, c.get().1));
        }));
        let c = Rc::clone(&calls);
        mesh.borrow_mut().on_after_render = Some(Rc::new(move |_: &mut RenderContext<'_>| {
            c.set((c.get().0, c.get().1 + 1));
        }));
        r.add_mesh(mesh);

        let mut gl = RecordingContext::new();
        r.render(PassKind::Color, &mut gl, &ViewState::default());
        r.render(PassKind::Picking, &mut gl, &ViewState::default());
        assert_eq!(calls.get(), (2, 2));
    }

    #[test]
    fn unready_and_hidden_meshes_are_skipped() {
        let mut r = Renderer::new();
        r.add_mesh(Rc::new(RefCell::new(Mesh::new())));
        let hidden = ready_mesh(-10.0);
        hidden.borrow_mut().visible = false;
        r.add_mesh(hidden.clone());
        r.add_mesh(hidden);
        assert_eq!(r.len(), 2);

        let mut gl = RecordingContext::new();
        let stats = r.render(PassKind::Color, &mut gl, &ViewState::default());
        assert_eq!(stats, FrameStats { drawn: 0, culled: 0, skipped: 2 });
    }

    #[test]
    fn remove_mesh_by_id() {
        let mut r = Renderer::new();
        let m = ready_mesh(-1.0);
        let id = m.borrow().id;
        r.add_mesh(m);
        assert!(r.mesh(id).is_some());
        assert!(r.remove_mesh(id));
        assert!(!r.remove_mesh(id));
        assert!(r.is_empty());
    }
}
