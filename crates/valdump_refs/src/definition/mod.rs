//! Definition points.
//!
//! Every group with an ID is expanded at exactly one occurrence; everywhere
//! else it prints a back-reference. A second BFS compares each occurrence of
//! an ID'd group against the current choice, first rule that separates them
//! wins:
//!
//! 1. a non-pointer occurrence beats a pointer occurrence;
//! 2. between pointers, fewer hops (`*T` over `**T`) wins;
//! 3. otherwise the shallower occurrence wins.
//!
//! Ties keep the earlier choice. Slices and maps count as non-pointers here
//! even though they are pointer-like for the statistics.

use rustc_hash::FxHashMap;
use valdump_value::TypeId;

use crate::{CanonicalKey, GraphWalker, KeyDeriver, RefId, UnionFind};

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
mod tests;

/// The occurrence chosen to carry a group's expansion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefinitionPoint {
    /// Instance key of the chosen occurrence.
    pub instance: CanonicalKey,
    pub via_pointer: bool,
    pub indirection: usize,
    pub depth: usize,
    /// Type of the value after dereferencing.
    pub value_type: TypeId,
}

impl DefinitionPoint {
    /// Whether a candidate with these properties should replace `self`.
    pub fn is_beaten_by(&self, via_pointer: bool, indirection: usize, depth: usize) -> bool {
        match (self.via_pointer, via_pointer) {
            (true, false) => true,
            (false, true) => false,
            (true, true) => {
                indirection < self.indirection
                    || (indirection == self.indirection && depth < self.depth)
            }
            (false, false) => depth < self.depth,
        }
    }
}

pub struct DefinitionPointSelector<'a> {
    uf: &'a mut UnionFind,
    ids: &'a FxHashMap<CanonicalKey, RefId>,
}

impl<'a> DefinitionPointSelector<'a> {
    pub fn new(uf: &'a mut UnionFind, ids: &'a FxHashMap<CanonicalKey, RefId>) -> Self {
        Self { uf, ids }
    }

    /// Second pass: pick one definition point per ID'd group root.
    #[tracing::instrument(level = "debug", skip_all, fields(ids = self.ids.len()))]
    pub fn select(self, keys: &mut KeyDeriver<'_>) -> FxHashMap<CanonicalKey, DefinitionPoint> {
        let Self { uf, ids } = self;
        let memory = keys.memory();
        let mut points: FxHashMap<CanonicalKey, DefinitionPoint> = FxHashMap::default();
        GraphWalker::new(keys).walk(|keys, item| {
            let occ = &item.occ;
            let Some(raw) = keys.raw_key(occ) else {
                return;
            };
            let root = uf.find(raw);
            if !ids.contains_key(&root) {
                return;
            }
            let via_pointer = memory.is_pointer_ref(occ);
            let indirection = memory.indirection(occ);
            let better = match points.get(&root) {
                Some(current) => current.is_beaten_by(via_pointer, indirection, item.depth),
                None => true,
            };
            if !better {
                return;
            }
            let (Some(instance), Some(target)) = (keys.instance_key(occ), memory.deref(occ)) else {
                return;
            };
            tracing::trace!(?root, ?instance, depth = item.depth, via_pointer, "definition candidate");
            points.insert(
                root,
                DefinitionPoint {
                    instance,
                    via_pointer,
                    indirection,
                    depth: item.depth,
                    value_type: target.ty,
                },
            );
        });
        tracing::debug!(points = points.len(), "definition points selected");
        points
    }
}
