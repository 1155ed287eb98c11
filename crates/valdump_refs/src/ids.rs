//! Visible reference IDs.

use std::fmt;

use rustc_hash::FxHashMap;
use valdump_value::TypeTable;

use crate::{CanonicalKey, RefStats, UnionFind};

/// A visible reference label, displayed as `&N`. Numbering starts at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefId(u32);

impl RefId {
    pub const fn new(n: u32) -> Self {
        Self(n)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&{}", self.0)
    }
}

/// Reference counts summed over every key of one merged group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupCounts {
    pub total: usize,
    pub pointers: usize,
}

pub struct IdAssigner;

impl IdAssigner {
    /// Sum the statistics of every key into its group's root.
    pub fn merge(
        stats: &FxHashMap<CanonicalKey, RefStats<'_>>,
        uf: &mut UnionFind,
    ) -> FxHashMap<CanonicalKey, GroupCounts> {
        let mut merged: FxHashMap<CanonicalKey, GroupCounts> = FxHashMap::default();
        for (key, s) in stats {
            let counts = merged.entry(uf.find(*key)).or_default();
            counts.total += s.total;
            counts.pointers += s.pointers;
        }
        merged
    }

    /// Give every shared group an ID, in (location, type name) order.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn assign(
        types: &TypeTable,
        merged: &FxHashMap<CanonicalKey, GroupCounts>,
    ) -> FxHashMap<CanonicalKey, RefId> {
        let mut roots: Vec<CanonicalKey> = merged
            .iter()
            .filter(|(_, c)| RefStats::is_shared(c.total, c.pointers))
            .map(|(key, _)| *key)
            .collect();
        roots.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| types.name(a.ty).cmp(types.name(b.ty)))
        });
        let ids: FxHashMap<CanonicalKey, RefId> = roots
            .into_iter()
            .zip(1..)
            .map(|(key, n)| (key, RefId::new(n)))
            .collect();
        tracing::debug!(groups = merged.len(), ids = ids.len(), "reference ids assigned");
        ids
    }
}
