//! What every hotspot of one viewer shares.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use vista_core::UidRegistry;
use vista_renderer::{PickingColorAllocator, ViewKind};

use crate::texture_source::{MemoryTextureSource, TextureLoading, TextureSource};

pub struct SceneServices {
    /// Debug mode overlays the debug material preset on every hotspot.
    pub debug: bool,
    /// Projection of the active view; read when a hotspot becomes ready.
    pub view_kind: Cell<ViewKind>,
    pub registry: RefCell<UidRegistry>,
    pub picking: RefCell<PickingColorAllocator>,
    pub textures: Arc<dyn TextureSource>,
    pub texture_loading: TextureLoading,
}

impl std::fmt::Debug for SceneServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneServices")
            .field("debug", &self.debug)
            .field("view_kind", &self.view_kind.get())
            .field("registered", &self.registry.borrow().len())
            .field("picking", &self.picking.borrow().len())
            .field("texture_loading", &self.texture_loading)
            .finish()
    }
}

impl Default for SceneServices {
    fn default() -> Self {
        Self::new(Arc::new(MemoryTextureSource::new()))
    }
}

impl SceneServices {
    pub fn new(textures: Arc<dyn TextureSource>) -> Self {
        Self {
            debug: false,
            view_kind: Cell::new(ViewKind::default()),
            registry: RefCell::new(UidRegistry::new()),
            picking: RefCell::new(PickingColorAllocator::new()),
            textures,
            texture_loading: TextureLoading::default(),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_view_kind(self, kind: ViewKind) -> Self {
        self.view_kind.set(kind);
        self
    }

    pub fn with_texture_loading(mut self, loading: TextureLoading) -> Self {
        self.texture_loading = loading;
        self
    }
}
