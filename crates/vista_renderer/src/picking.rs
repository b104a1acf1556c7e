//! Unique flat colors for the picking pass.
//!
//! Each live mesh gets a 24-bit RGB code.  The code is derived from the mesh
//! id, so the same scene built in the same order yields the same colors, and
//! probes forward past codes already in use so two live meshes never share
//! one.  `0x000000` is the clear color of the picking target and is never
//! handed out.

use std::collections::HashMap;

use vista_core::Color;

use crate::mesh::MeshId;

const CODE_SPACE: u32 = 1 << 24;

#[derive(Debug, Default)]
pub struct PickingColorAllocator {
    by_mesh: HashMap<MeshId, u32>,
    by_code: HashMap<u32, MeshId>,
}

impl PickingColorAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for `mesh`; repeated calls return the same color until
    /// [`release`](Self::release).
    pub fn color_for(&mut self, mesh: MeshId) -> Color {
        if let Some(&code) = self.by_mesh.get(&mesh) {
            return Color::from_u24(code);
        }
        let mut code = Self::seed(mesh);
        while self.by_code.contains_key(&code) {
            code = code % (CODE_SPACE - 1) + 1;
        }
        self.by_mesh.insert(mesh, code);
        self.by_code.insert(code, mesh);
        log::trace!("picking code {code:#08x} -> {mesh:?}");
        Color::from_u24(code)
    }

    /// Resolve a color read back from the picking target.
    pub fn mesh_for(&self, color: Color) -> Option<MeshId> {
        self.by_code.get(&color.to_u24()).copied()
    }

    pub fn code_of(&self, mesh: MeshId) -> Option<u32> {
        self.by_mesh.get(&mesh).copied()
    }

    pub fn release(&mut self, mesh: MeshId) -> bool {
        match self.by_mesh.remove(&mesh) {
            Some(code) => {
                self.by_code.remove(&code);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.by_mesh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_mesh.is_empty()
    }

    // 1..=0xFFFFFF
    fn seed(mesh: MeshId) -> u32 {
        (mesh.raw() % (CODE_SPACE as u64 - 1)) as u32 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn colors_are_unique_and_stable() {
        let mut alloc = PickingColorAllocator::new();
        let ids: Vec<_> = (0..500).map(|_| MeshId::next()).collect();
        let codes: HashSet<u32> = ids.iter().map(|&id| alloc.color_for(id).to_u24()).collect();
        assert_eq!(codes.len(), ids.len());
        assert!(!codes.contains(&0));
        let again = alloc.color_for(ids[7]);
        assert_eq!(alloc.mesh_for(again), Some(ids[7]));
    }

    #[test]
    fn collisions_probe_forward() {
        let mut alloc = PickingColorAllocator::new();
        let a = MeshId::next();
        let seed = PickingColorAllocator::seed(a);
        // Squat on the seed with a different mesh.
        let squatter = MeshId::next();
        alloc.by_code.insert(seed, squatter);
        alloc.by_mesh.insert(squatter, seed);
        let code = alloc.color_for(a).to_u24();
        assert_ne!(code, seed);
        assert_eq!(alloc.mesh_for(Color::from_u24(code)), Some(a));
    }

    #[test]
    fn release_frees_the_code() {
        let mut alloc = PickingColorAllocator::new();
        let a = MeshId::next();
        let c = alloc.color_for(a);
        assert!(alloc.release(a));
        assert!(!alloc.release(a));
        assert_eq!(alloc.mesh_for(c), None);
        assert!(alloc.is_empty());
    }
}
