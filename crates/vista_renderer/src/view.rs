//! The active view: projection kind, panoramic camera and viewport.
//!
//! Render hooks call [`View::update_uniforms`] before touching their own
//! uniforms so every program sees the same view values for the frame.

use glam::{EulerRot, Mat4, Quat, Vec4};
use serde::{Deserialize, Serialize};

use crate::material::{names, Uniforms};

/// How the panorama is projected onto the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Rectilinear,
    /// Wide "little planet" style projection done in the vertex shader.
    Gopro,
    /// Unwrapped equirectangular view.
    Flat,
}

impl ViewKind {
    /// Value pushed as `tProjectionKind`.
    pub fn as_uniform(self) -> f32 {
        match self {
            ViewKind::Rectilinear => 0.0,
            ViewKind::Gopro => 1.0,
            ViewKind::Flat => 2.0,
        }
    }

    /// Only a plain perspective projection gives frustum planes the CPU can
    /// trust.
    pub fn supports_frustum_culling(self) -> bool {
        matches!(self, ViewKind::Rectilinear)
    }
}

pub trait View {
    fn kind(&self) -> ViewKind;

    fn view_proj(&self) -> Mat4;

    /// Push the shared per-view values into a pass's uniform set.
    fn update_uniforms(&self, uniforms: &mut Uniforms);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { x: 0.0, y: 0.0, width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn as_vec4(&self) -> Vec4 {
        Vec4::new(self.x, self.y, self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Camera fixed at the origin, looking down −Z when all angles are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanoramaCamera {
    /// Radians.
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    /// Vertical field of view in radians.
    pub fovy: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for PanoramaCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            fovy: 75f32.to_radians(),
            aspect: 16.0 / 9.0,
            znear: 0.1,
            zfar: 10_000.0,
        }
    }
}

impl PanoramaCamera {
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, self.roll)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orientation()).inverse()
    }

    pub fn projection(&self, kind: ViewKind) -> Mat4 {
        match kind {
            ViewKind::Rectilinear => Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar),
            // The shader bends positions itself; the matrix only needs a wide,
            // well-conditioned frustum.
            ViewKind::Gopro => {
                let fovy = (self.fovy * 2.0).min(170f32.to_radians());
                Mat4::perspective_rh(fovy, self.aspect, self.znear, self.zfar)
            }
            ViewKind::Flat => {
                let half_h = self.zfar * (self.fovy * 0.5).tan();
                let half_w = half_h * self.aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, -self.zfar, self.zfar)
            }
        }
    }
}

/// The view a renderer draws with.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub kind: ViewKind,
    pub camera: PanoramaCamera,
    pub viewport: Viewport,
}

impl ViewState {
    pub fn new(kind: ViewKind, camera: PanoramaCamera, viewport: Viewport) -> Self {
        Self { kind, camera, viewport }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.camera.aspect = self.viewport.aspect();
    }
}

impl View for ViewState {
    fn kind(&self) -> ViewKind {
        self.kind
    }

    fn view_proj(&self) -> Mat4 {
        self.camera.projection(self.kind) * self.camera.view_matrix()
    }

    fn update_uniforms(&self, uniforms: &mut Uniforms) {
        uniforms.set(names::VIEW_PROJECTION, self.view_proj());
        uniforms.set(names::VIEWPORT, self.viewport.as_vec4());
        uniforms.set(names::PROJECTION_KIND, self.kind.as_uniform());
    }
}
