//! The generic scene-node part of a hotspot: identity, tags, visibility and
//! the mesh it owns.

use std::cell::RefCell;
use std::rc::Rc;

use vista_renderer::{Mesh, SharedMesh};

use crate::services::SceneServices;

#[derive(Debug)]
pub struct Object3D {
    class: &'static str,
    uid: String,
    tags: Vec<String>,
    visible: bool,
    mesh: SharedMesh,
    services: Rc<SceneServices>,
    registered: bool,
    destroyed: bool,
}

impl Object3D {
    pub fn new(class: &'static str, services: Rc<SceneServices>) -> Self {
        Self {
            class,
            uid: String::new(),
            tags: Vec::new(),
            visible: true,
            mesh: Rc::new(RefCell::new(Mesh::new())),
            services,
            registered: false,
            destroyed: false,
        }
    }

    /// Take `uid` (or generate one) and register it.  A uid that is already
    /// taken is kept but not registered, so it will not be unregistered on
    /// destroy either.
    pub fn set_identity(&mut self, uid: Option<&str>, tags: &[String]) {
        let mut registry = self.services.registry.borrow_mut();
        if self.registered {
            registry.unregister(&self.uid);
            self.registered = false;
        }
        self.uid = match uid {
            Some(uid) if !uid.is_empty() => uid.to_string(),
            _ => registry.generate_uid(self.class),
        };
        self.tags = tags.to_vec();
        match registry.register(&self.uid, self.class, &self.tags) {
            Ok(()) => self.registered = true,
            Err(err) => log::warn!("{}: {err}", self.class),
        }
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.mesh.borrow_mut().visible = visible;
    }

    pub fn mesh(&self) -> &SharedMesh {
        &self.mesh
    }

    pub fn services(&self) -> &Rc<SceneServices> {
        &self.services
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Unregister, give back the picking color and empty the mesh.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if self.registered {
            self.services.registry.borrow_mut().unregister(&self.uid);
            self.registered = false;
        }
        let mut mesh = self.mesh.borrow_mut();
        self.services.picking.borrow_mut().release(mesh.id);
        mesh.geometry = None;
        mesh.material = None;
        mesh.user_data = serde_json::Value::Null;
        mesh.visible = false;
        log::debug!("{} `{}` destroyed", self.class, self.uid);
    }
}
