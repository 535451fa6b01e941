// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-tier record of which hotspots are mounted.
//!
//! Mounting and unmounting write the *mirror* synchronously, so a hotspot
//! that checks the registry right after registering sees its own write.
//! The *published* set is what rendering and auto-fallback read; it only
//! changes in [`HotspotRegistry::publish`], which the context calls once per
//! render pass. A hotspot that unmounts and remounts between two passes
//! leaves the published set untouched.

use alloc::string::{String, ToString};

use hashbrown::HashSet;

/// Mounted hotspot ids.
#[derive(Clone, Debug, Default)]
pub struct HotspotRegistry {
    mirror: HashSet<String>,
    published: HashSet<String>,
    dirty: bool,
}

impl HotspotRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as mounted. Returns `false` if it already was.
    pub fn register(&mut self, id: &str) -> bool {
        if self.mirror.contains(id) {
            return false;
        }
        self.mirror.insert(id.to_string());
        self.dirty = true;
        true
    }

    /// Record `id` as unmounted. Returns `false` if it was not mounted.
    pub fn unregister(&mut self, id: &str) -> bool {
        if !self.mirror.remove(id) {
            return false;
        }
        self.dirty = true;
        true
    }

    /// Copy the mirror into the published set if anything changed since the last call.
    ///
    /// Returns whether the published set was rewritten.
    pub fn publish(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        if self.published == self.mirror {
            return false;
        }
        self.published.clone_from(&self.mirror);
        true
    }

    /// Whether `id` is mounted right now.
    pub fn is_mounted(&self, id: &str) -> bool {
        self.mirror.contains(id)
    }

    /// Whether `id` was mounted as of the last [`publish`](Self::publish).
    pub fn is_published(&self, id: &str) -> bool {
        self.published.contains(id)
    }

    /// Whether the mirror has unpublished writes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of mounted hotspots.
    pub fn mounted_count(&self) -> usize {
        self.mirror.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_idempotent() {
        let mut r = HotspotRegistry::new();
        assert!(r.register("a"));
        assert!(!r.register("a"));
        assert_eq!(r.mounted_count(), 1);
        assert!(r.unregister("a"));
        assert!(!r.unregister("a"));
        assert_eq!(r.mounted_count(), 0);
    }

    #[test]
    fn mirror_is_read_after_write_and_published_lags() {
        let mut r = HotspotRegistry::new();
        r.register("a");
        assert!(r.is_mounted("a"));
        assert!(!r.is_published("a"));
        assert!(r.publish());
        assert!(r.is_published("a"));
        assert!(!r.publish());
    }

    #[test]
    fn toggle_between_passes_publishes_nothing() {
        let mut r = HotspotRegistry::new();
        r.register("a");
        r.publish();
        r.unregister("a");
        r.register("a");
        assert!(r.is_dirty());
        assert!(!r.publish());
        assert!(r.is_published("a"));
        assert!(!r.is_dirty());
    }
}
