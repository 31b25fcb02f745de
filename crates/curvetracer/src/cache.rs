//! Reuse of built BVHs across entry angle queries.

use std::collections::HashMap;
use std::sync::Arc;

use curvetracer_mesh::{Bvh, SurfaceMesh};
use log::debug;

/// One BVH per structure, rebuilt when the structure's mesh changes.
///
/// An entry is served only when the mesh it was built from equals the
/// requested one. Otherwise the BVH is rebuilt and replaces the entry, so an
/// edited structure holds a single BVH however often it is re-queried.
#[derive(Debug, Default, Clone)]
pub struct BvhCache {
    entries: HashMap<String, CachedBvh>,
}

#[derive(Debug, Clone)]
struct CachedBvh {
    fingerprint: u64,
    bvh: Arc<Bvh>,
}

impl BvhCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the BVH of `structure` for `mesh`, building it when the
    /// structure is new or its mesh has changed.
    pub fn get_or_build(&mut self, structure: &str, mesh: &SurfaceMesh) -> Arc<Bvh> {
        let fingerprint = mesh.fingerprint();
        if let Some(entry) = self.entries.get(structure) {
            if entry.fingerprint == fingerprint && entry.bvh.mesh() == mesh {
                debug!(
                    "BVH cache hit for '{}' ({} triangles)",
                    structure,
                    mesh.num_triangles()
                );
                return Arc::clone(&entry.bvh);
            }
            debug!("mesh of '{}' changed, rebuilding BVH", structure);
        }
        let bvh = Arc::new(Bvh::build(mesh));
        self.entries.insert(
            structure.to_string(),
            CachedBvh {
                fingerprint,
                bvh: Arc::clone(&bvh),
            },
        );
        bvh
    }

    /// Forget the BVH of `structure`, returning whether one was cached.
    pub fn remove(&mut self, structure: &str) -> bool {
        self.entries.remove(structure).is_some()
    }

    /// Number of cached BVHs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all cached BVHs.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(z: f64) -> SurfaceMesh {
        SurfaceMesh::from_flat(&[0.0, 0.0, z, 1.0, 0.0, z, 0.0, 1.0, z], &[0, 1, 2]).unwrap()
    }

    #[test]
    fn test_reuses_bvh_for_equal_mesh() {
        let mut cache = BvhCache::new();
        let a = cache.get_or_build("skin", &tri(0.0));
        let b = cache.get_or_build("skin", &tri(0.0));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_edited_structure_replaces_its_entry() {
        let mut cache = BvhCache::new();
        let mut previous = cache.get_or_build("skin", &tri(0.0));
        for edit in 1..100 {
            let mesh = tri(edit as f64 * 0.1);
            let bvh = cache.get_or_build("skin", &mesh);
            assert!(!Arc::ptr_eq(&previous, &bvh));
            assert_eq!(bvh.mesh(), &mesh);
            previous = bvh;
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_structures_get_separate_entries() {
        let mut cache = BvhCache::new();
        let a = cache.get_or_build("skin", &tri(0.0));
        let b = cache.get_or_build("bone", &tri(1.0));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);

        assert!(cache.remove("bone"));
        assert!(!cache.remove("bone"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
