//! Per-key reference statistics.

use valdump_value::{Kind, TypeId, Value};

/// What the first pass learned about one canonical key.
#[derive(Clone, Debug)]
pub struct RefStats<'h> {
    /// Every occurrence that resolved to this key.
    pub total: usize,
    /// Occurrences that were pointer-like: a pointer, an interface holding
    /// one, or a non-nil slice or map.
    pub pointers: usize,
    /// Shallowest depth at which a pointer-like occurrence was seen.
    pub min_pointer_depth: Option<usize>,
    /// Depth of the first occurrence.
    pub first_depth: usize,
    pub kind: Kind,
    pub is_primitive: bool,
    /// The dereferenced value, kept for fingerprinting.
    pub ty: TypeId,
    pub value: &'h Value,
}

impl<'h> RefStats<'h> {
    pub(crate) fn new(ty: TypeId, value: &'h Value, depth: usize) -> Self {
        let kind = value.kind();
        Self {
            total: 0,
            pointers: 0,
            min_pointer_depth: None,
            first_depth: depth,
            kind,
            is_primitive: kind.is_primitive(),
            ty,
            value,
        }
    }

    pub(crate) fn record(&mut self, pointer_like: bool, depth: usize) {
        self.total += 1;
        if pointer_like {
            self.pointers += 1;
            self.min_pointer_depth = Some(self.min_pointer_depth.map_or(depth, |d| d.min(depth)));
        }
    }

    /// Whether a merged group with these counts deserves a visible ID:
    /// more than one pointer, or a pointer plus at least one plain copy.
    pub fn is_shared(total: usize, pointers: usize) -> bool {
        pointers > 1 || (pointers > 0 && total > pointers)
    }
}
