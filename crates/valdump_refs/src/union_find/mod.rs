//! Disjoint-set forest over canonical keys.
//!
//! A key that was never linked is its own root. Unions make the root with
//! the smaller location the parent, so the representative of a group is
//! always its earliest-seen storage.

use rustc_hash::FxHashMap;

use crate::CanonicalKey;


#[derive(Default)]
pub struct UnionFind {
    parent: FxHashMap<CanonicalKey, CanonicalKey>,
}

impl UnionFind {
    pub fn new() -> Self {
        Self::default()
    }

    /// Representative of `key`'s group, compressing the path behind it.
    pub fn find(&mut self, key: CanonicalKey) -> CanonicalKey {
        let root = self.find_readonly(key);
        let mut current = key;
        while let Some(&next) = self.parent.get(&current) {
            if next == root {
                break;
            }
            self.parent.insert(current, root);
            current = next;
        }
        root
    }

    /// Representative of `key`'s group without touching the forest.
    pub fn find_readonly(&self, key: CanonicalKey) -> CanonicalKey {
        let mut current = key;
        while let Some(&next) = self.parent.get(&current) {
            current = next;
        }
        current
    }

    /// Merge the groups of `a` and `b`. Returns whether they were distinct.
    pub fn union(&mut self, a: CanonicalKey, b: CanonicalKey) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if ra.location < rb.location {
            self.parent.insert(rb, ra);
        } else {
            self.parent.insert(ra, rb);
        }
        true
    }

    /// Point every linked key directly at its root.
    pub fn compress_all(&mut self) {
        let keys: Vec<CanonicalKey> = self.parent.keys().copied().collect();
        for key in keys {
            self.find(key);
        }
    }

    /// Number of keys that have been linked under another key.
    pub fn linked(&self) -> usize {
        self.parent.len()
    }
}
