//! Uid registry: the identity half of every scene node.
//!
//! Nodes register their unique id together with their class name and tags
//! when their configuration is parsed, and unregister when destroyed.  The
//! registry uses a `HashMap` keyed by uid so lookups stay O(1) regardless of
//! scene size.
//!
//! # Quick start
//! ```rust,ignore
//! use vista_core::UidRegistry;
//!
//! let mut reg = UidRegistry::new();
//! reg.register("spot-1", "Hotspot3D", &["poi".into()])?;
//! assert!(reg.contains("spot-1"));
//! let pois: Vec<_> = reg.iter_tagged("poi").collect();
//! reg.unregister("spot-1");
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

// ─── Uid generation ────────────────────────────────────────────────────────

static UID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("uid `{0}` is already registered")]
    Duplicate(String),
}

// ─── Entry ─────────────────────────────────────────────────────────────────

/// What the registry knows about one node.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub uid: String,
    /// Class name of the node, e.g. `"Hotspot3D"`.
    pub class: String,
    pub tags: Vec<String>,
}

// ─── Registry ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct UidRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl UidRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Produce a uid of the form `<prefix>-<n>` that is not registered yet.
    pub fn generate_uid(&self, prefix: &str) -> String {
        loop {
            let uid = format!("{prefix}-{}", UID_COUNTER.fetch_add(1, Ordering::Relaxed));
            if !self.entries.contains_key(&uid) {
                return uid;
            }
        }
    }

    /// Register `uid`.  A uid that is already present is left untouched and
    /// reported as [`RegistryError::Duplicate`].
    pub fn register(
        &mut self,
        uid: &str,
        class: &str,
        tags: &[String],
    ) -> Result<(), RegistryError> {
        if self.entries.contains_key(uid) {
            return Err(RegistryError::Duplicate(uid.to_string()));
        }
        self.entries.insert(
            uid.to_string(),
            RegistryEntry {
                uid: uid.to_string(),
                class: class.to_string(),
                tags: tags.to_vec(),
            },
        );
        Ok(())
    }

    /// Remove `uid`.  Returns `true` if it existed.
    pub fn unregister(&mut self, uid: &str) -> bool {
        self.entries.remove(uid).is_some()
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.entries.contains_key(uid)
    }

    pub fn get(&self, uid: &str) -> Option<&RegistryEntry> {
        self.entries.get(uid)
    }

    pub fn class_of(&self, uid: &str) -> Option<&str> {
        self.entries.get(uid).map(|e| e.class.as_str())
    }

    /// Iterate over all entries that carry the given tag.
    pub fn iter_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a RegistryEntry> {
        self.entries
            .values()
            .filter(move |e| e.tags.iter().any(|t| t == tag))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_unregister() {
        let mut r = UidRegistry::new();
        r.register("a", "Hotspot3D", &[]).unwrap();
        assert!(r.contains("a"));
        assert_eq!(r.class_of("a"), Some("Hotspot3D"));
        assert!(r.unregister("a"));
        assert!(!r.unregister("a"));
        assert!(r.is_empty());
    }

    #[test]
    fn duplicate_is_rejected_and_original_kept() {
        let mut r = UidRegistry::new();
        r.register("a", "Hotspot3D", &["x".into()]).unwrap();
        let err = r.register("a", "Other", &[]).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("a".into()));
        assert_eq!(r.class_of("a"), Some("Hotspot3D"));
    }

    #[test]
    fn tags() {
        let mut r = UidRegistry::new();
        r.register("a", "Hotspot3D", &["poi".into()]).unwrap();
        r.register("b", "Hotspot3D", &[]).unwrap();
        let tagged: Vec<_> = r.iter_tagged("poi").map(|e| e.uid.as_str()).collect();
        assert_eq!(tagged, vec!["a"]);
    }

    #[test]
    fn generated_uids_are_fresh() {
        let mut r = UidRegistry::new();
        let a = r.generate_uid("hotspot");
        r.register(&a, "Hotspot3D", &[]).unwrap();
        let b = r.generate_uid("hotspot");
        assert_ne!(a, b);
        assert!(b.starts_with("hotspot-"));
    }
}
