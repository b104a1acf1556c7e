//! The viewer: a scene of hotspots, the active view and the frame loop.

use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context as _;
use serde::Deserialize;
use serde_json::Value;
use vista_core::math::{clamp, deg_to_rad};
use vista_core::Color;
use vista_hotspot::{FileTextureSource, Hotspot3D, HotspotConfig, SceneServices};
use vista_renderer::{
    FrameStats, GpuContext, MeshId, PanoramaCamera, PassKind, Renderer, ViewKind, ViewState, Viewport,
};

use crate::config::ViewerConfig;

/// Scene document: `{ "hotspots": [ ... ] }`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SceneDocument {
    hotspots: Vec<Value>,
}

/// What one call to [`Viewer::frame`] drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub color: FrameStats,
    pub picking: FrameStats,
}

pub struct Viewer {
    config: ViewerConfig,
    services: Rc<SceneServices>,
    renderer: Renderer,
    view: ViewState,
    hotspots: Vec<Hotspot3D>,
    /// Removed meshes whose backend resources are freed on the next frame.
    released: Vec<MeshId>,
    frames: u64,
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("title", &self.config.title)
            .field("view", &self.view.kind)
            .field("hotspots", &self.hotspots.len())
            .field("frames", &self.frames)
            .finish()
    }
}

impl Viewer {
    /// Viewer reading textures from `config.texture_root`.
    pub fn new(config: ViewerConfig) -> Self {
        let textures = Arc::new(FileTextureSource::new(&config.texture_root));
        let services = SceneServices::new(textures)
            .with_debug(config.debug)
            .with_texture_loading(config.texture_loading);
        Self::with_services(config, services)
    }

    /// Viewer over caller-provided services.  `debug` and the view kind are
    /// taken from `config`.
    pub fn with_services(config: ViewerConfig, mut services: SceneServices) -> Self {
        services.debug = config.debug;
        services.view_kind.set(config.view);

        let viewport = Viewport::new(config.width as f32, config.height as f32);
        let camera = PanoramaCamera {
            fovy: deg_to_rad(config.fov),
            aspect: viewport.aspect(),
            ..PanoramaCamera::default()
        };
        log::info!("viewer `{}` ({:?}, {}x{})", config.title, config.view, config.width, config.height);
        Self {
            view: ViewState::new(config.view, camera, viewport),
            config,
            services: Rc::new(services),
            renderer: Renderer::new(),
            hotspots: Vec::new(),
            released: Vec::new(),
            frames: 0,
        }
    }

    /// Add every hotspot of a scene document.  Entries that do not parse are
    /// logged and skipped.  Returns how many hotspots were created.
    pub fn load_scene(&mut self, json: &str) -> anyhow::Result<usize> {
        let scene: SceneDocument = serde_json::from_str(json).context("parsing scene document")?;
        let mut created = 0;
        for (index, entry) in scene.hotspots.into_iter().enumerate() {
            match HotspotConfig::from_value(entry) {
                Ok(config) => {
                    self.add_hotspot(config);
                    created += 1;
                }
                Err(err) => log::error!("hotspot #{index}: {err}"),
            }
        }
        log::info!("scene loaded: {created} hotspots");
        Ok(created)
    }

    /// Create a hotspot and put its mesh in the renderer.  Returns its uid.
    pub fn add_hotspot(&mut self, config: HotspotConfig) -> String {
        let hotspot = Hotspot3D::new(Rc::clone(&self.services), Some(config));
        self.renderer.add_mesh(Rc::clone(hotspot.mesh()));
        let uid = hotspot.uid().to_string();
        self.hotspots.push(hotspot);
        uid
    }

    /// Destroy the hotspot with `uid` and drop its mesh from the renderer.
    pub fn remove_hotspot(&mut self, uid: &str) -> bool {
        let Some(index) = self.hotspots.iter().position(|h| h.uid() == uid) else {
            return false;
        };
        let hotspot = self.hotspots.remove(index);
        self.retire(hotspot);
        true
    }

    /// Destroy every hotspot.
    pub fn clear(&mut self) {
        let hotspots = std::mem::take(&mut self.hotspots);
        for hotspot in hotspots {
            self.retire(hotspot);
        }
    }

    fn retire(&mut self, mut hotspot: Hotspot3D) {
        let mesh_id = hotspot.mesh().borrow().id;
        hotspot.destroy();
        self.renderer.remove_mesh(mesh_id);
        self.released.push(mesh_id);
    }

    pub fn hotspot(&self, uid: &str) -> Option<&Hotspot3D> {
        self.hotspots.iter().find(|h| h.uid() == uid)
    }

    pub fn hotspot_mut(&mut self, uid: &str) -> Option<&mut Hotspot3D> {
        self.hotspots.iter_mut().find(|h| h.uid() == uid)
    }

    pub fn hotspots(&self) -> &[Hotspot3D] {
        &self.hotspots
    }

    /// Release backend resources of removed hotspots, advance animations by
    /// `dt` seconds (capped at `max_frame_delta`), update every hotspot, then
    /// draw the color and picking passes.
    pub fn frame(&mut self, dt: f32, gl: &mut dyn GpuContext) -> FrameReport {
        for mesh in self.released.drain(..) {
            gl.release_mesh(mesh);
        }
        let dt = clamp(dt, 0.0, self.config.max_frame_delta);
        for hotspot in &mut self.hotspots {
            if let Some(animation) = hotspot.animation_mut() {
                animation.tick(dt);
            }
        }
        for hotspot in &mut self.hotspots {
            hotspot.update();
        }

        let report = FrameReport {
            color: self.renderer.render(PassKind::Color, gl, &self.view),
            picking: self.renderer.render(PassKind::Picking, gl, &self.view),
        };
        self.frames += 1;
        log::trace!("frame {}: {report:?}", self.frames);
        report
    }

    /// Resolve a color read back from the picking target to the document of
    /// the hotspot drawn there.
    pub fn pick(&self, color: Color) -> Option<Value> {
        let mesh_id = self.services.picking.borrow().mesh_for(color)?;
        let mesh = self.renderer.mesh(mesh_id)?;
        let payload = mesh.borrow().user_data.clone();
        (!payload.is_null()).then_some(payload)
    }

    /// Hotspots that become ready after this call decide frustum culling
    /// from the new kind.
    pub fn set_view_kind(&mut self, kind: ViewKind) {
        self.view.kind = kind;
        self.services.view_kind.set(kind);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.view.resize(width as f32, height as f32);
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn services(&self) -> &Rc<SceneServices> {
        &self.services
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
