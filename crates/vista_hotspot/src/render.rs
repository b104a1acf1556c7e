//! Per-draw hooks a hotspot installs on its mesh.
//!
//! The before-render hook branches on the material bound for the pass.  In
//! the color pass it refreshes the hotspot's own color or texture.  In the
//! picking pass every mesh shares one material whose uniforms the renderer
//! uploads once per pass, so the hotspot's picking color is written straight
//! into the bound program instead, then mirrored into the material.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vista_core::Color;
use vista_renderer::{
    names, GpuContext, GpuError, MaterialName, ProgramId, RenderCallback, RenderContext, TextureRef, UniformValue,
};

/// What the color pass shows for this hotspot.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialContent {
    Color(Color),
    Texture(Option<TextureRef>),
}

/// State the hooks read on every draw.  Written by the hotspot, read by the
/// closures it installs on the mesh.
#[derive(Debug, Default)]
pub struct RenderState {
    pub content: RefCell<Option<MaterialContent>>,
    pub picking_color: Cell<Option<Color>>,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.content.replace(None);
        self.picking_color.set(None);
    }
}

pub fn before_render(state: &RenderState, ctx: &mut RenderContext<'_>) {
    ctx.view.update_uniforms(&mut ctx.material.uniforms);

    match &ctx.material.name {
        MaterialName::Hotspot => match &*state.content.borrow() {
            Some(MaterialContent::Color(color)) => ctx.material.uniforms.set(names::COLOR, *color),
            Some(MaterialContent::Texture(texture)) => ctx
                .material
                .uniforms
                .set(names::TEXTURE, UniformValue::Texture(texture.clone())),
            None => {}
        },
        MaterialName::Picking => {
            // Not linked yet on the first draw with this material.
            let (Some(program), Some(color)) = (ctx.material.program, state.picking_color.get()) else {
                return;
            };
            let value = UniformValue::Color(color);
            if let Err(err) = write_bound(ctx.gl, program, &value) {
                log::warn!("picking color for {:?} not written: {err}", ctx.mesh);
            }
            ctx.material.uniforms.set(names::COLOR, value);
        }
        MaterialName::Custom(_) => {}
    }
}

fn write_bound(gl: &mut dyn GpuContext, program: ProgramId, value: &UniformValue) -> Result<(), GpuError> {
    gl.use_program(program)?;
    gl.write_bound_uniform(names::COLOR, value)
}

pub fn after_render(_state: &RenderState, _ctx: &mut RenderContext<'_>) {}

/// The pair of hooks for one hotspot.  Keep the returned `Rc`s: removing a
/// hook from a mesh compares by pointer.
pub fn callbacks(state: &Rc<RenderState>) -> (RenderCallback, RenderCallback) {
    let before_state = Rc::clone(state);
    let after_state = Rc::clone(state);
    let before: RenderCallback = Rc::new(move |ctx: &mut RenderContext<'_>| before_render(&before_state, ctx));
    let after: RenderCallback = Rc::new(move |ctx: &mut RenderContext<'_>| after_render(&after_state, ctx));
    (before, after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_renderer::{
        Mesh, MeshId, PassKind, RecordingContext, Renderer, ShaderMaterial, Texture, ViewKind, ViewState,
    };

    fn ctx<'a>(
        gl: &'a mut RecordingContext,
        view: &'a ViewState,
        material: &'a mut ShaderMaterial,
        pass: PassKind,
    ) -> RenderContext<'a> {
        RenderContext { gl, view, material, pass, mesh: MeshId::next() }
    }

    #[test]
    fn color_pass_pushes_view_and_color() {
        let state = RenderState::new();
        state.content.replace(Some(MaterialContent::Color(Color::rgb(1.0, 0.0, 0.0))));
        let (mut gl, view) = (RecordingContext::new(), ViewState { kind: ViewKind::Flat, ..Default::default() });
        let mut material = ShaderMaterial::hotspot();

        before_render(&state, &mut ctx(&mut gl, &view, &mut material, PassKind::Color));
        assert_eq!(material.uniforms.color(names::COLOR), Some(Color::rgb(1.0, 0.0, 0.0)));
        assert_eq!(material.uniforms.get(names::PROJECTION_KIND), Some(&UniformValue::Float(2.0)));
    }

    #[test]
    fn color_pass_pushes_texture() {
        let state = RenderState::new();
        let tex = Texture::solid("t", [1, 2, 3, 255]).into_ref();
        state.content.replace(Some(MaterialContent::Texture(Some(tex.clone()))));
        let (mut gl, view) = (RecordingContext::new(), ViewState::default());
        let mut material = ShaderMaterial::hotspot();

        before_render(&state, &mut ctx(&mut gl, &view, &mut material, PassKind::Color));
        assert_eq!(material.uniforms.get(names::TEXTURE).and_then(|v| v.as_texture()), Some(&tex));
    }

    #[test]
    fn picking_is_a_no_op_before_the_program_is_linked() {
        let state = RenderState::new();
        state.picking_color.set(Some(Color::from_u24(0x123456)));
        let (mut gl, view) = (RecordingContext::new(), ViewState::default());
        let mut material = ShaderMaterial::picking();

        before_render(&state, &mut ctx(&mut gl, &view, &mut material, PassKind::Picking));
        assert_eq!(gl.raw_write_count(), 0);
        assert_eq!(material.uniforms.color(names::COLOR), Some(Color::BLACK));
    }

    #[test]
    fn picking_writes_the_bound_program_and_mirrors() {
        let state = RenderState::new();
        let color = Color::from_u24(0x00ff10);
        state.picking_color.set(Some(color));
        let (mut gl, view) = (RecordingContext::new(), ViewState::default());
        let mut material = ShaderMaterial::picking();
        let program = gl.link_program(&material).unwrap();
        material.program = Some(program);

        before_render(&state, &mut ctx(&mut gl, &view, &mut material, PassKind::Picking));
        assert_eq!(gl.bound_program(), Some(program));
        assert_eq!(gl.raw_write_count(), 1);
        assert_eq!(gl.program_uniform(program, names::COLOR), Some(&UniformValue::Color(color)));
        assert_eq!(material.uniforms.color(names::COLOR), Some(color));
    }

    /// Two meshes share the picking material; after the first frame links it,
    /// each draw carries its own color even though uniforms upload once.
    #[test]
    fn shared_picking_material_draws_distinct_colors() {
        let mut renderer = Renderer::new();
        let colors = [Color::from_u24(0x000001), Color::from_u24(0x000002)];
        for color in colors {
            let state = Rc::new(RenderState::new());
            state.picking_color.set(Some(color));
            let (before, after) = callbacks(&state);
            let mut mesh = Mesh::new();
            mesh.geometry = Some(vista_renderer::geometry::primitives::plane(&Default::default()));
            mesh.position = glam::Vec3::new(0.0, 0.0, -30.0);
            mesh.on_before_render = Some(before);
            mesh.on_after_render = Some(after);
            renderer.add_mesh(Rc::new(RefCell::new(mesh)));
        }

        let (mut gl, view) = (RecordingContext::new(), ViewState::default());
        renderer.render(PassKind::Picking, &mut gl, &view);
        gl.clear_frame();
        renderer.render(PassKind::Picking, &mut gl, &view);

        let drawn: Vec<_> = gl.draws().iter().map(|d| d.color()).collect();
        assert_eq!(drawn, vec![Some(colors[0]), Some(colors[1])]);
        assert_eq!(gl.upload_count(), 1);
        assert_eq!(gl.raw_write_count(), 2);
    }
}
