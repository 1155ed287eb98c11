//! Copy unification.
//!
//! The same logical value can show up once with pointer identity (a
//! "source") and again as a by-value copy with storage of its own (a
//! "copy"). Keys are grouped by fingerprint and merged by these rules:
//!
//! 1. Primitive group with several sources and exactly as many copies:
//!    pair sources and copies by location order, one union per pair.
//! 2. Composite group with several sources and no copies: merge all sources.
//! 3. Any group with exactly one source and at least one copy: merge every
//!    copy into the source.
//!
//! This is a similarity heuristic. Two unrelated values that happen to be
//! equal can be merged, which shows up as a back-reference between them.

use rustc_hash::FxHashMap;
use valdump_value::{fingerprint, is_fingerprinted, Heap};

use crate::{CanonicalKey, RefStats, UnionFind};

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
mod tests;

pub struct CopyUnifier<'a, 'h> {
    heap: &'h Heap,
    stats: &'a FxHashMap<CanonicalKey, RefStats<'h>>,
}

impl<'a, 'h> CopyUnifier<'a, 'h> {
    pub fn new(heap: &'h Heap, stats: &'a FxHashMap<CanonicalKey, RefStats<'h>>) -> Self {
        Self { heap, stats }
    }

    /// Keys grouped by fingerprint, each group in key order. Zero-sized
    /// structs are left out.
    pub fn groups(&self) -> Vec<Vec<CanonicalKey>> {
        let mut by_print: FxHashMap<String, Vec<CanonicalKey>> = FxHashMap::default();
        for (key, stats) in self.stats {
            if !is_fingerprinted(self.heap, key.ty) {
                continue;
            }
            by_print
                .entry(fingerprint(self.heap, stats.ty, stats.value))
                .or_default()
                .push(*key);
        }
        let mut groups: Vec<Vec<CanonicalKey>> = by_print
            .into_values()
            .filter(|keys| keys.len() > 1)
            .map(|mut keys| {
                keys.sort_unstable();
                keys
            })
            .collect();
        groups.sort_unstable();
        groups
    }

    /// Apply the merge rules to every group.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn unify(&self, uf: &mut UnionFind) {
        let mut unions = 0usize;
        let groups = self.groups();
        for keys in &groups {
            let (sources, copies): (Vec<CanonicalKey>, Vec<CanonicalKey>) = keys
                .iter()
                .copied()
                .partition(|key| self.stats.get(key).is_some_and(|s| s.pointers > 0));
            let primitive = self.stats.get(&keys[0]).is_some_and(|s| s.is_primitive);

            if primitive {
                if sources.len() > 1 && sources.len() == copies.len() {
                    for (source, copy) in sources.iter().zip(&copies) {
                        unions += usize::from(uf.union(*source, *copy));
                    }
                }
            } else if sources.len() > 1 && copies.is_empty() {
                for source in &sources[1..] {
                    unions += usize::from(uf.union(*source, sources[0]));
                }
            }

            if let [source] = sources.as_slice() {
                for copy in &copies {
                    unions += usize::from(uf.union(*copy, *source));
                }
            }
        }
        tracing::debug!(groups = groups.len(), unions, "copies unified");
    }
}
