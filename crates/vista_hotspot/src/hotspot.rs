//! `Hotspot3D`: a pickable mesh placed in the panorama.
//!
//! Construction parses the document and starts the material load.  Nothing
//! is attached to the mesh until the material reports ready; then geometry,
//! placement, the picking color and the render hooks are set up in one go
//! and `on_ready` fires.
//!
//! ```text
//! Unloaded ──parse_config──▶ Loading ──material ready──▶ Ready
//!     └──────────────┴──────────────destroy────────────────┴──▶ Destroyed
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use glam::Vec3;
use vista_core::{json, Color, Signal, SignalHandle};
use vista_renderer::{RenderCallback, SharedMesh};

use crate::animation::HotspotAnimation;
use crate::config::HotspotConfig;
use crate::events::HotspotEvents;
use crate::geometry;
use crate::material::{presets, HotspotMaterial, MaterialType};
use crate::object::Object3D;
use crate::render::{self, MaterialContent, RenderState};
use crate::services::SceneServices;
use crate::sound::HotspotSound;
use crate::spatial::{self, SpatialBinding};
use crate::transform::HotspotTransform;

pub const CLASS: &str = "Hotspot3D";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotspotState {
    Unloaded,
    Loading,
    Ready,
    Destroyed,
}

#[derive(Debug)]
enum HotspotMessage {
    MaterialReady,
}

pub struct Hotspot3D {
    object: Object3D,
    config: Option<HotspotConfig>,
    kind: String,
    name: Option<String>,
    fx: Option<String>,
    facing_center: bool,
    state: HotspotState,
    booted: bool,

    transform: Option<Rc<RefCell<HotspotTransform>>>,
    animation: Option<HotspotAnimation>,
    material: Option<HotspotMaterial>,
    sound: Option<HotspotSound>,
    events: Option<HotspotEvents>,

    render_state: Rc<RenderState>,
    before_render: Option<RenderCallback>,
    after_render: Option<RenderCallback>,
    material_ready: Option<SignalHandle>,
    progress: Option<SignalHandle>,
    inbox_tx: Sender<HotspotMessage>,
    inbox: Receiver<HotspotMessage>,
    picking_color: Option<Color>,

    /// Fired once, when the hotspot turns ready.
    pub on_ready: Signal<()>,
}

impl std::fmt::Debug for Hotspot3D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hotspot3D")
            .field("uid", &self.object.uid())
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("facing_center", &self.facing_center)
            .field("picking_color", &self.picking_color)
            .field("material", &self.material.as_ref().map(|m| m.state()))
            .field("animation", &self.animation.is_some())
            .field("sound", &self.sound.is_some())
            .finish()
    }
}

impl Hotspot3D {
    pub fn new(services: Rc<SceneServices>, config: Option<HotspotConfig>) -> Self {
        let (inbox_tx, inbox) = mpsc::channel();
        let mut hotspot = Self {
            object: Object3D::new(CLASS, services),
            config: None,
            kind: HotspotConfig::default().kind,
            name: None,
            fx: None,
            facing_center: false,
            state: HotspotState::Unloaded,
            booted: false,
            transform: None,
            animation: None,
            material: None,
            sound: None,
            events: None,
            render_state: Rc::new(RenderState::new()),
            before_render: None,
            after_render: None,
            material_ready: None,
            progress: None,
            inbox_tx,
            inbox,
            picking_color: None,
            on_ready: Signal::new(),
        };
        hotspot.boot();
        if let Some(config) = config {
            hotspot.parse_config(config);
        }
        hotspot
    }

    /// Create the sub-objects and the render hooks.  Runs once; later calls
    /// do nothing.
    pub fn boot(&mut self) {
        if self.booted {
            return;
        }
        self.booted = true;

        let transform = Rc::new(RefCell::new(HotspotTransform::new()));
        self.animation = Some(HotspotAnimation::new(Rc::clone(&transform)));
        self.transform = Some(transform);

        let services = self.object.services();
        self.material = Some(HotspotMaterial::new(
            Arc::clone(&services.textures),
            services.texture_loading,
        ));

        let (before, after) = render::callbacks(&self.render_state);
        self.before_render = Some(before);
        self.after_render = Some(after);
    }

    /// Take identity and sub-documents from `config` and start loading the
    /// material.  A graphics material is ready before this returns.
    pub fn parse_config(&mut self, config: HotspotConfig) {
        if self.state != HotspotState::Unloaded {
            log::warn!("{CLASS} `{}`: config already parsed ({:?})", self.object.uid(), self.state);
            return;
        }

        self.object.set_identity(config.uid.as_deref(), &config.tags);
        self.kind = config.kind.clone();
        self.name = config.name.clone();
        self.object.set_visible(config.visible);
        self.object.mesh().borrow_mut().name = format!("mesh-{}", self.object.uid());
        self.facing_center = config.facing_center;

        if let (Some(document), Some(transform)) = (&config.transform, &self.transform) {
            transform.borrow_mut().load(document);
        }

        if let (Some(document), Some(animation), Some(transform)) =
            (&config.animation, self.animation.as_mut(), &self.transform)
        {
            animation.load(document);
            let binding = SpatialBinding {
                transform: Rc::clone(transform),
                mesh: Rc::clone(self.object.mesh()),
                facing_center: self.facing_center,
            };
            self.progress = Some(animation.on_progress.add(move |_| binding.update()));
        }

        if let Some(material) = self.material.as_mut() {
            let tx = self.inbox_tx.clone();
            self.material_ready = Some(material.on_ready.add(move |_| {
                let _ = tx.send(HotspotMessage::MaterialReady);
            }));
        }
        self.state = HotspotState::Loading;
        log::debug!("{CLASS} `{}` loading", self.object.uid());

        let mut document = config.material.clone().unwrap_or_else(presets::transparent);
        if self.object.services().debug {
            document = json::extend(&document, &presets::debug());
        }

        if let Some(sound_config) = &config.sound {
            let mut sound = HotspotSound::new();
            sound.load(sound_config, config.transform.as_ref());
            self.sound = Some(sound);
        }
        self.fx = config.fx.clone();
        if let Some(events) = &config.events {
            self.events = Some(HotspotEvents::from_config(events));
        }

        self.config = Some(config);
        if let Some(material) = self.material.as_mut() {
            material.load(&document);
        }
        self.pump();
    }

    /// Per-frame step for the material and sound.
    pub fn update(&mut self) {
        if let Some(material) = self.material.as_mut() {
            material.update();
        }
        if let Some(sound) = self.sound.as_mut() {
            sound.update();
        }
        self.pump();
    }

    /// Recompute mesh placement from the transform.
    pub fn update_position(&self) {
        if let Some(transform) = &self.transform {
            let transform = *transform.borrow();
            spatial::apply(&transform, self.facing_center, &mut self.object.mesh().borrow_mut());
        }
    }

    pub fn destroy(&mut self) {
        if self.state == HotspotState::Destroyed {
            return;
        }

        // Detach first so nothing below can re-enter the ready handler.
        if let (Some(material), Some(handle)) = (self.material.as_mut(), self.material_ready.take()) {
            material.on_ready.remove(handle);
        }
        if let (Some(animation), Some(handle)) = (self.animation.as_mut(), self.progress.take()) {
            animation.on_progress.remove(handle);
        }

        {
            let mut mesh = self.object.mesh().borrow_mut();
            if same_callback(&mesh.on_before_render, &self.before_render) {
                mesh.on_before_render = None;
            }
            if same_callback(&mesh.on_after_render, &self.after_render) {
                mesh.on_after_render = None;
            }
        }
        self.before_render = None;
        self.after_render = None;

        if let Some(transform) = self.transform.take() {
            transform.borrow_mut().destroy();
        }
        if let Some(mut animation) = self.animation.take() {
            animation.destroy();
        }
        if let Some(mut material) = self.material.take() {
            material.destroy();
        }
        if let Some(mut sound) = self.sound.take() {
            sound.destroy();
        }
        if let Some(mut events) = self.events.take() {
            events.destroy();
        }
        while self.inbox.try_recv().is_ok() {}

        self.object.destroy();
        self.picking_color = None;
        self.render_state.clear();
        self.on_ready.clear();
        self.state = HotspotState::Destroyed;
    }

    fn pump(&mut self) {
        while let Ok(message) = self.inbox.try_recv() {
            match message {
                HotspotMessage::MaterialReady => self.material_ready_handler(),
            }
        }
    }

    fn material_ready_handler(&mut self) {
        if self.state != HotspotState::Loading {
            log::trace!("{CLASS} `{}`: ignoring material ready in {:?}", self.object.uid(), self.state);
            return;
        }
        let Some(material) = self.material.as_ref() else {
            return;
        };
        let Some(gpu) = material.material().cloned() else {
            log::warn!("{CLASS} `{}`: material ready without content", self.object.uid());
            return;
        };
        let content = match material.kind() {
            MaterialType::Graphics => MaterialContent::Color(material.color()),
            MaterialType::Image => MaterialContent::Texture(material.texture().cloned()),
        };
        self.render_state.content.replace(Some(content));
        self.object.mesh().borrow_mut().material = Some(gpu);

        self.create_hotspot_3d();

        let mesh_id = self.object.mesh().borrow().id;
        let color = self.object.services().picking.borrow_mut().color_for(mesh_id);
        self.picking_color = Some(color);
        self.render_state.picking_color.set(Some(color));

        {
            let mut mesh = self.object.mesh().borrow_mut();
            mesh.on_before_render = self.before_render.clone();
            mesh.on_after_render = self.after_render.clone();
        }

        if let Some(animation) = self.animation.as_mut() {
            if animation.auto_play() {
                animation.play();
            }
        }
    }

    fn create_hotspot_3d(&mut self) {
        let raw_scale = self.transform.as_ref().map_or(Vec3::ONE, |t| t.borrow().scale);
        let mut geometry = geometry::build(self.config.as_ref().and_then(|c| c.geometry.as_ref()));
        geometry.scale(raw_scale);

        {
            let mut mesh = self.object.mesh().borrow_mut();
            mesh.geometry = Some(geometry);
            mesh.user_data = self.config.as_ref().map_or(serde_json::Value::Null, HotspotConfig::document);
            mesh.frustum_culled = self.object.services().view_kind.get().supports_frustum_culling();
        }
        self.update_position();

        self.state = HotspotState::Ready;
        log::debug!("{CLASS} `{}` ready", self.object.uid());
        self.on_ready.dispatch(&());
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn uid(&self) -> &str {
        self.object.uid()
    }

    pub fn tags(&self) -> &[String] {
        self.object.tags()
    }

    /// The document's `type`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn visible(&self) -> bool {
        self.object.visible()
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.object.set_visible(visible);
    }

    pub fn fx(&self) -> Option<&str> {
        self.fx.as_deref()
    }

    pub fn facing_center(&self) -> bool {
        self.facing_center
    }

    pub fn picking_color(&self) -> Option<Color> {
        self.picking_color
    }

    pub fn mesh(&self) -> &SharedMesh {
        self.object.mesh()
    }

    pub fn material(&self) -> Option<&HotspotMaterial> {
        self.material.as_ref()
    }

    pub fn animation(&self) -> Option<&HotspotAnimation> {
        self.animation.as_ref()
    }

    pub fn animation_mut(&mut self) -> Option<&mut HotspotAnimation> {
        self.animation.as_mut()
    }

    pub fn sound(&self) -> Option<&HotspotSound> {
        self.sound.as_ref()
    }

    pub fn events(&self) -> Option<&HotspotEvents> {
        self.events.as_ref()
    }

    pub fn events_mut(&mut self) -> Option<&mut HotspotEvents> {
        self.events.as_mut()
    }

    /// Current, unclamped transform values.
    pub fn transform(&self) -> Option<HotspotTransform> {
        self.transform.as_ref().map(|t| *t.borrow())
    }

    pub fn config(&self) -> Option<&HotspotConfig> {
        self.config.as_ref()
    }

    /// Scale baked into the geometry when it was built.
    pub fn baked_scale(&self) -> Option<Vec3> {
        self.object.mesh().borrow().geometry.as_ref().map(|g| g.baked_scale())
    }

    /// Clamped scale currently on the mesh.
    pub fn live_scale(&self) -> Vec3 {
        self.object.mesh().borrow().scale
    }

    pub fn state(&self) -> HotspotState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == HotspotState::Ready
    }
}

fn same_callback(slot: &Option<RenderCallback>, ours: &Option<RenderCallback>) -> bool {
    match (slot, ours) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{MaterialConfig, MaterialState};
    use crate::spatial::{MAX_SCALE, MIN_SCALE};
    use crate::texture_source::{MemoryTextureSource, TextureLoading};
    use serde_json::{json, Value};
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::time::{Duration, Instant};
    use vista_core::math::deg_to_rad;
    use vista_renderer::geometry::primitives::{plane, PlaneOptions};
    use vista_renderer::{names, PassKind, RecordingContext, Renderer, Texture, ViewKind, ViewState};

    fn services() -> Rc<SceneServices> {
        Rc::new(SceneServices::default())
    }

    fn textured_services(loading: TextureLoading) -> Rc<SceneServices> {
        let src = MemoryTextureSource::new();
        src.insert("door.png", Texture::solid("door.png", [10, 20, 30, 255]));
        Rc::new(SceneServices::new(Arc::new(src)).with_texture_loading(loading))
    }

    fn config(v: Value) -> HotspotConfig {
        HotspotConfig::from_value(v).unwrap()
    }

    fn spot(v: Value) -> Hotspot3D {
        Hotspot3D::new(services(), Some(config(v)))
    }

    fn counter(signal: &mut Signal<()>) -> Rc<Cell<u32>> {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        signal.add(move |_| h.set(h.get() + 1));
        hits
    }

    fn assert_released(h: &Hotspot3D) {
        assert_eq!(h.state(), HotspotState::Destroyed);
        assert!(h.transform.is_none());
        assert!(h.animation.is_none());
        assert!(h.material.is_none());
        assert!(h.sound.is_none());
        assert!(h.events.is_none());
        assert!(h.before_render.is_none() && h.after_render.is_none());
        assert!(h.material_ready.is_none() && h.progress.is_none());
        let mesh = h.mesh().borrow();
        assert!(mesh.on_before_render.is_none() && mesh.on_after_render.is_none());
        assert!(mesh.geometry.is_none() && mesh.material.is_none());
    }

    #[test]
    fn image_hotspot_end_to_end() {
        let h = spot(json!({
            "uid": "h1",
            "type": "image",
            "transform": {
                "position": { "x": 0, "y": 0, "z": -5 },
                "rotation": { "x": 0, "y": 0, "z": 0 },
                "scale": { "x": 1, "y": 1, "z": 1 }
            },
            "facingCenter": false
        }));
        assert!(h.is_ready());
        assert_eq!(h.kind(), "image");
        let mesh = h.mesh().borrow();
        assert_eq!(mesh.name, "mesh-h1");
        assert_eq!(mesh.position, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(mesh.rotation.to_array(), [0.0, 0.0, 0.0]);
        assert_eq!(mesh.scale, Vec3::ONE);
        assert_eq!(mesh.geometry.as_ref(), Some(&plane(&PlaneOptions::default())));
        assert_eq!(mesh.user_data["uid"], "h1");
    }

    #[test]
    fn payload_is_the_document_as_written() {
        let doc = json!({
            "uid": "p",
            "transform": { "position": { "x": 1, "y": 0, "z": -4 }, "label": "keep" },
            "sound": { "source": { "url": "a.ogg", "format": "ogg" } }
        });
        let h = spot(doc.clone());
        assert!(h.is_ready());
        let mesh = h.mesh().borrow();
        assert_eq!(mesh.user_data, doc);
        assert_eq!(mesh.user_data["transform"]["label"], "keep");
    }

    #[test]
    fn missing_material_uses_the_transparent_preset() {
        let h = spot(json!({ "uid": "h1", "type": "image" }));
        let expected: MaterialConfig = serde_json::from_value(presets::transparent()).unwrap();
        assert_eq!(h.material().unwrap().config(), &expected);
        let gpu = h.mesh().borrow().material.clone().unwrap();
        assert_eq!(gpu.uniforms.get(names::OPACITY).and_then(|v| v.as_float()), Some(0.0));
    }

    #[test]
    fn debug_mode_merges_the_debug_preset() {
        let services = Rc::new(SceneServices::default().with_debug(true));
        let document = json!({ "type": "graphics", "color": "#ff0000", "opacity": 1, "side": "double" });
        let h = Hotspot3D::new(services, Some(config(json!({ "uid": "d", "material": document.clone() }))));

        let expected: MaterialConfig =
            serde_json::from_value(json::extend(&document, &presets::debug())).unwrap();
        let got = h.material().unwrap().config();
        assert_eq!(got, &expected);
        assert_eq!(got.color, "#00ff00");
        assert_eq!(got.opacity, 0.8);
        assert!(got.transparent);
        assert_eq!(got.side, vista_renderer::Side::Double);
    }

    #[test]
    fn default_geometry_is_a_plane() {
        let h = spot(json!({ "uid": "p" }));
        assert_eq!(h.mesh().borrow().geometry.as_ref().unwrap().label, "plane");
        let unknown = spot(json!({ "uid": "q", "geometry": { "type": "teapot" } }));
        assert_eq!(unknown.mesh().borrow().geometry.as_ref(), Some(&plane(&PlaneOptions::default())));
    }

    #[test]
    fn fixed_orientation_follows_configured_rotation() {
        let h = spot(json!({
            "uid": "r",
            "transform": { "position": { "x": 7, "y": -2, "z": 3 }, "rotation": { "x": 20, "y": -40, "z": 15 } }
        }));
        let r = h.mesh().borrow().rotation;
        assert_eq!(r.order, vista_renderer::EulerOrder::YXZ);
        let expected = Vec3::new(-deg_to_rad(20.0), deg_to_rad(-40.0), deg_to_rad(15.0));
        assert!((Vec3::from(r.to_array()) - expected).length() < 1e-6);
    }

    #[test]
    fn facing_center_straight_ahead_has_zero_baseline() {
        let h = spot(json!({ "uid": "f", "facingCenter": true, "transform": { "position": { "x": 0, "y": 0, "z": -1 } } }));
        assert!(h.facing_center());
        let r = h.mesh().borrow().rotation.to_array();
        assert!(Vec3::from(r).length() < 1e-5, "{r:?}");
    }

    #[test]
    fn baked_scale_is_raw_and_live_scale_is_clamped() {
        let h = spot(json!({ "uid": "s", "transform": { "scale": { "x": 0, "y": 2, "z": 1e7 } } }));
        assert_eq!(h.baked_scale(), Some(Vec3::new(0.0, 2.0, 1e7)));
        assert_eq!(h.live_scale(), Vec3::new(MIN_SCALE, 2.0, MAX_SCALE));
        assert_eq!(h.transform().unwrap().scale, Vec3::new(0.0, 2.0, 1e7));
    }

    #[test]
    fn ready_handler_runs_at_most_once() {
        let mut h = Hotspot3D::new(services(), None);
        let ready = counter(&mut h.on_ready);
        h.parse_config(config(json!({ "uid": "once" })));
        assert_eq!(ready.get(), 1);
        let color = h.picking_color();

        let material = h.material.as_mut().unwrap();
        material.on_ready.dispatch(&());
        material.on_ready.dispatch(&());
        h.update();
        assert_eq!(ready.get(), 1);
        assert_eq!(h.picking_color(), color);
        assert_eq!(h.object.services().picking.borrow().len(), 1);
    }

    #[test]
    fn picking_colors_are_unique_among_live_hotspots() {
        let s = services();
        let spots: Vec<_> = (0..64)
            .map(|i| Hotspot3D::new(Rc::clone(&s), Some(config(json!({ "uid": format!("h{i}") })))))
            .collect();
        let colors: HashSet<u32> = spots.iter().map(|h| h.picking_color().unwrap().to_u24()).collect();
        assert_eq!(colors.len(), spots.len());
        for h in &spots {
            let id = s.picking.borrow().mesh_for(h.picking_color().unwrap());
            assert_eq!(id, Some(h.mesh().borrow().id));
        }
    }

    #[test]
    fn background_texture_becomes_ready_on_update() {
        let mut h = Hotspot3D::new(
            textured_services(TextureLoading::Background),
            Some(config(json!({ "uid": "img", "material": { "type": "image", "url": "door.png" } }))),
        );
        assert_eq!(h.state(), HotspotState::Loading);
        assert!(h.mesh().borrow().geometry.is_none());
        assert!(h.picking_color().is_none());

        let deadline = Instant::now() + Duration::from_secs(5);
        while !h.is_ready() && Instant::now() < deadline {
            h.update();
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(h.is_ready());
        assert!(h.picking_color().is_some());
        let content = h.render_state.content.borrow().clone();
        assert!(matches!(content, Some(MaterialContent::Texture(Some(t))) if t.label == "door.png"));
    }

    #[test]
    fn failed_material_stalls_without_attaching_anything() {
        let mut h = Hotspot3D::new(
            textured_services(TextureLoading::Inline),
            Some(config(json!({ "uid": "bad", "material": { "type": "image", "url": "missing.png" } }))),
        );
        h.update();
        assert_eq!(h.state(), HotspotState::Loading);
        assert_eq!(h.material().unwrap().state(), MaterialState::Failed);
        let mesh = h.mesh().borrow();
        assert!(mesh.geometry.is_none() && mesh.material.is_none() && mesh.on_before_render.is_none());
    }

    #[test]
    fn destroy_twice_and_before_ready() {
        let s = textured_services(TextureLoading::Background);
        let mut h = Hotspot3D::new(
            Rc::clone(&s),
            Some(config(json!({
                "uid": "early",
                "material": { "type": "image", "url": "door.png" },
                "sound": { "source": { "url": "a.ogg" } },
                "animation": { "tracks": [] },
                "events": { "click": "x" }
            }))),
        );
        assert!(!h.is_ready());
        h.destroy();
        assert_released(&h);
        h.destroy();
        assert_released(&h);
        h.update();
        assert_eq!(h.state(), HotspotState::Destroyed);
        assert!(!s.registry.borrow().contains("early"));
    }

    #[test]
    fn destroy_after_ready_releases_identity_and_color() {
        let s = services();
        let mut h = Hotspot3D::new(Rc::clone(&s), Some(config(json!({ "uid": "gone" }))));
        assert!(s.registry.borrow().contains("gone"));
        assert_eq!(s.picking.borrow().len(), 1);
        h.destroy();
        assert_released(&h);
        assert!(h.picking_color().is_none());
        assert!(s.registry.borrow().is_empty());
        assert!(s.picking.borrow().is_empty());
    }

    #[test]
    fn destroy_without_config() {
        let mut h = Hotspot3D::new(services(), None);
        assert_eq!(h.state(), HotspotState::Unloaded);
        h.destroy();
        assert_released(&h);
    }

    #[test]
    fn frustum_culling_depends_on_the_view() {
        let s = Rc::new(SceneServices::default().with_view_kind(ViewKind::Gopro));
        let h = Hotspot3D::new(Rc::clone(&s), Some(config(json!({ "uid": "g" }))));
        assert!(!h.mesh().borrow().frustum_culled);
        let r = spot(json!({ "uid": "r" }));
        assert!(r.mesh().borrow().frustum_culled);
    }

    #[test]
    fn animation_progress_moves_the_mesh() {
        let mut h = spot(json!({
            "uid": "anim",
            "transform": { "position": { "x": 0, "y": 0, "z": -10 }, "scale": { "x": 3 } },
            "animation": {
                "autoPlay": true,
                "tracks": [{ "keyframes": [
                    { "time": 0, "position": { "x": 0, "y": 0, "z": -10 } },
                    { "time": 1000, "position": { "x": 10, "y": 0, "z": -10 } }
                ] }]
            }
        }));
        assert!(h.animation().unwrap().is_playing());
        h.animation_mut().unwrap().tick(0.5);
        let mesh = h.mesh().borrow();
        assert!((mesh.position.x - 5.0).abs() < 1e-4);
        assert_eq!(mesh.scale.x, 3.0);
    }

    #[test]
    fn sound_and_events_are_loaded() {
        let mut h = spot(json!({
            "uid": "loud",
            "transform": { "position": { "x": 0, "y": 0, "z": -4 } },
            "sound": { "source": { "url": "a.ogg" }, "options": { "autoPlay": true } },
            "events": { "click": ["open", "play"] },
            "fx": "glow"
        }));
        assert_eq!(h.sound().unwrap().position(), Vec3::new(0.0, 0.0, -4.0));
        h.update();
        assert!(h.sound().unwrap().is_playing());
        assert_eq!(h.events().unwrap().actions("click").len(), 2);
        assert!(h.events_mut().unwrap().trigger("click"));
        assert_eq!(h.fx(), Some("glow"));
    }

    #[test]
    fn renders_in_both_passes() {
        let h = spot(json!({
            "uid": "drawn",
            "transform": { "position": { "x": 0, "y": 0, "z": -50 } },
            "material": { "color": "#3366ff" }
        }));
        let mut renderer = Renderer::new();
        renderer.add_mesh(Rc::clone(h.mesh()));
        let (mut gl, view) = (RecordingContext::new(), ViewState::default());

        let stats = renderer.render(PassKind::Color, &mut gl, &view);
        assert_eq!(stats.drawn, 1);
        assert_eq!(gl.draws()[0].color(), vista_core::Color::parse_css("#3366ff").ok());

        renderer.render(PassKind::Picking, &mut gl, &view);
        gl.clear_frame();
        renderer.render(PassKind::Picking, &mut gl, &view);
        assert_eq!(gl.draws()[0].color(), h.picking_color());
    }

    #[test]
    fn second_parse_is_ignored() {
        let mut h = spot(json!({ "uid": "first" }));
        h.parse_config(config(json!({ "uid": "second" })));
        assert_eq!(h.uid(), "first");
        assert!(h.is_ready());
    }
}
