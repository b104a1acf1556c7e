//! Which pass a draw belongs to, and what a pass reports back.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Regular color/texture rendering with each mesh's own material.
    Color,
    /// Every mesh drawn with the shared picking material.
    Picking,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    /// Outside the frustum.
    pub culled: usize,
    /// Invisible, not ready, or the backend refused the draw.
    pub skipped: usize,
}

impl FrameStats {
    pub fn total(&self) -> usize {
        self.drawn + self.culled + self.skipped
    }
}

impl std::ops::AddAssign for FrameStats {
    fn add_assign(&mut self, rhs: Self) {
        self.drawn += rhs.drawn;
        self.culled += rhs.culled;
        self.skipped += rhs.skipped;
    }
}
