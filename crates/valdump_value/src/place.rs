//! Addresses of addressable storage.

use std::fmt;

use smallvec::SmallVec;

use crate::{BlockId, SlotId};

/// Where an addressable value's storage starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Base {
    /// A heap slot.
    Slot(SlotId),
    /// Element `i` of a slice backing block.
    Element(BlockId, u32),
    /// The addressable copy a dump call makes of its `i`-th root value.
    Root(u32),
}

/// A base plus a path of field/element indices into inline structs and
/// arrays. Two places are the same storage iff they are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Place {
    base: Base,
    path: SmallVec<[u32; 4]>,
}

impl Place {
    pub fn new(base: Base) -> Self {
        Self {
            base,
            path: SmallVec::new(),
        }
    }

    pub fn slot(slot: SlotId) -> Self {
        Self::new(Base::Slot(slot))
    }

    pub fn element(block: BlockId, index: u32) -> Self {
        Self::new(Base::Element(block, index))
    }

    pub fn root(index: u32) -> Self {
        Self::new(Base::Root(index))
    }

    /// The place of member `index` (struct field or array element) of the
    /// value stored here.
    #[must_use]
    pub fn member(&self, index: u32) -> Self {
        let mut path = self.path.clone();
        path.push(index);
        Self {
            base: self.base,
            path,
        }
    }

    pub fn base(&self) -> Base {
        self.base
    }

    pub fn path(&self) -> &[u32] {
        &self.path
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.base {
            Base::Slot(slot) => write!(f, "{slot}")?,
            Base::Element(block, i) => write!(f, "{block}[{i}]")?,
            Base::Root(i) => write!(f, "root#{i}")?,
        }
        for step in &self.path {
            write!(f, ".{step}")?;
        }
        Ok(())
    }
}
