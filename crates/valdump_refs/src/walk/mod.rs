//! Breadth-first traversal of the value graph.
//!
//! Both analysis passes walk the graph the same way: one BFS per root, an
//! explicit queue, and a "traversed" set of raw keys shared by all roots of
//! the walk, so that each composite is expanded at most once per call.
//! Occurrences reached again are still visited (that is what the statistics
//! count); they are just not expanded again. Composites without a raw key
//! (non-addressable structs and arrays) are visited but never expanded.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use valdump_value::{Occurrence, Value};

use crate::{CanonicalKey, KeyDeriver, RefStats};

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]

/// One visited occurrence and its BFS depth below its root.
#[derive(Clone, Debug)]
pub struct Visit<'h> {
    pub occ: Occurrence<'h>,
    pub depth: usize,
}

/// BFS driver over the roots of a key deriver's memory.
pub struct GraphWalker<'a, 'h> {
    keys: &'a mut KeyDeriver<'h>,
}

impl<'a, 'h> GraphWalker<'a, 'h> {
    pub fn new(keys: &'a mut KeyDeriver<'h>) -> Self {
        Self { keys }
    }

    /// Visit every reachable occurrence, root by root, in BFS order.
    pub fn walk(&mut self, mut visit: impl FnMut(&mut KeyDeriver<'h>, &Visit<'h>)) {
        let memory = self.keys.memory();
        let mut traversed: FxHashSet<CanonicalKey> = FxHashSet::default();
        for root in memory.roots() {
            let mut queue = VecDeque::from([Visit {
                occ: root,
                depth: 0,
            }]);
            while let Some(item) = queue.pop_front() {
                visit(self.keys, &item);

                let Some(target) = memory.deref(&item.occ) else {
                    continue;
                };
                if !target.kind().is_composite() {
                    continue;
                }
                let Some(key) = self.keys.raw_key(&target) else {
                    continue;
                };
                if !traversed.insert(key) {
                    continue;
                }
                queue.extend(memory.children(&target).into_iter().map(|occ| Visit {
                    occ,
                    depth: item.depth + 1,
                }));
            }
        }
    }

    /// First pass: count how each canonical key is referenced.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn collect_stats(&mut self) -> FxHashMap<CanonicalKey, RefStats<'h>> {
        let memory = self.keys.memory();
        let mut stats: FxHashMap<CanonicalKey, RefStats<'h>> = FxHashMap::default();
        let mut visited = 0usize;
        self.walk(|keys, item| {
            visited += 1;
            let Some(target) = memory.deref(&item.occ) else {
                return;
            };
            let Some(key) = keys.raw_key(&target) else {
                return;
            };
            let pointer_like = memory.is_pointer_ref(&item.occ)
                || matches!(item.occ.value, Value::Slice(Some(_)) | Value::Map(Some(_)));
            tracing::trace!(?key, depth = item.depth, pointer_like, "occurrence");
            stats
                .entry(key)
                .or_insert_with(|| RefStats::new(target.ty, target.value, item.depth))
                .record(pointer_like, item.depth);
        });
        tracing::debug!(visited, keys = stats.len(), "reference statistics collected");
        stats
    }
}
