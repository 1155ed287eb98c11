//! Canonical keys.
//!
//! A [`CanonicalKey`] names "the storage an occurrence refers to". Storage
//! has no numeric address in this model, so every distinct piece of storage
//! is given a [`Location`] by a per-session interner the first time it is
//! seen. Non-addressable primitives get synthetic locations keyed by
//! (value, type): equal primitives share one, distinct ones never collide.
//!
//! Zero-sized storage has no extent, so all of it shares a single location;
//! the key's type keeps differently-typed zero-sized values apart.

use std::fmt;

use rustc_hash::FxHashMap;
use valdump_value::{
    BlockId, ChanId, FuncId, MapId, Memory, Occurrence, Place, PrimitiveKey, TypeId, Value,
};

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
mod tests;

/// A stable identity token for one piece of storage.
///
/// Real storage orders before synthetic primitive locations; within each
/// class, order is first-seen order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    Storage(u32),
    Synthetic(u32),
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Storage(n) => write!(f, "@{n}"),
            Location::Synthetic(n) => write!(f, "~{n}"),
        }
    }
}

/// Identity of the storage an occurrence refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey {
    pub location: Location,
    pub ty: TypeId,
}

impl CanonicalKey {
    pub fn new(location: Location, ty: TypeId) -> Self {
        Self { location, ty }
    }
}

/// Storage that can be given a location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Storage {
    Place(Place),
    Block(BlockId),
    Map(MapId),
    Func(FuncId),
    Chan(ChanId),
    ZeroSized,
}

/// First-seen interner for locations.
#[derive(Default)]
pub struct LocationTable {
    storage: FxHashMap<Storage, u32>,
    synthetic: FxHashMap<(PrimitiveKey, TypeId), u32>,
}

impl LocationTable {
    fn storage(&mut self, storage: Storage) -> Location {
        let next = index_u32(self.storage.len());
        Location::Storage(*self.storage.entry(storage).or_insert(next))
    }

    fn synthetic(&mut self, key: PrimitiveKey, ty: TypeId) -> Location {
        let next = index_u32(self.synthetic.len());
        Location::Synthetic(*self.synthetic.entry((key, ty)).or_insert(next))
    }

    /// Number of locations handed out so far.
    pub fn len(&self) -> usize {
        self.storage.len() + self.synthetic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "a session never sees u32::MAX distinct locations"
)]
fn index_u32(n: usize) -> u32 {
    n as u32
}

/// Derives raw and instance keys for occurrences of one memory.
pub struct KeyDeriver<'h> {
    memory: Memory<'h>,
    table: LocationTable,
}

impl<'h> KeyDeriver<'h> {
    pub fn new(memory: Memory<'h>) -> Self {
        Self {
            memory,
            table: LocationTable::default(),
        }
    }

    pub fn memory(&self) -> Memory<'h> {
        self.memory
    }

    pub fn locations(&self) -> &LocationTable {
        &self.table
    }

    /// Key of the storage this occurrence ultimately denotes, after following
    /// every pointer and interface. `None` for nil and for non-addressable
    /// values that are neither handles nor primitives.
    pub fn raw_key(&mut self, occ: &Occurrence<'h>) -> Option<CanonicalKey> {
        let target = self.memory.deref(occ)?;
        self.key_of(&target)
    }

    /// Key of the occurrence itself: interfaces are unwrapped, but pointers
    /// and handles are keyed by what they point at together with their own
    /// type, so two pointer variables to one value are distinguishable from
    /// the value itself.
    pub fn instance_key(&mut self, occ: &Occurrence<'h>) -> Option<CanonicalKey> {
        if matches!(occ.value, Value::Interface(_)) {
            let inner = self.memory.elem(occ)?;
            return self.instance_key(&inner);
        }
        if let Some(place) = &occ.place {
            let location = self.place_location(place, occ.ty);
            return Some(CanonicalKey::new(location, occ.ty));
        }
        if let Value::Pointer(target) = occ.value {
            let target = target.as_ref()?;
            let target_ty = self.memory.types().elem(occ.ty)?;
            let location = self.place_location(target, target_ty);
            return Some(CanonicalKey::new(location, occ.ty));
        }
        self.key_of(occ)
    }

    /// Key of an already-dereferenced occurrence.
    fn key_of(&mut self, occ: &Occurrence<'h>) -> Option<CanonicalKey> {
        if let Some(place) = &occ.place {
            let location = self.place_location(place, occ.ty);
            return Some(CanonicalKey::new(location, occ.ty));
        }
        let storage = match occ.value {
            Value::Slice(handle) => Storage::Block((*handle)?),
            Value::Map(handle) => Storage::Map((*handle)?),
            Value::Func(handle) => Storage::Func((*handle)?),
            Value::Chan(handle) => Storage::Chan((*handle)?),
            value => {
                let key = value.primitive_key()?;
                let location = self.table.synthetic(key, occ.ty);
                return Some(CanonicalKey::new(location, occ.ty));
            }
        };
        Some(CanonicalKey::new(self.table.storage(storage), occ.ty))
    }

    fn place_location(&mut self, place: &Place, ty: TypeId) -> Location {
        if self.memory.types().is_zero_sized(ty) {
            self.table.storage(Storage::ZeroSized)
        } else {
            self.table.storage(Storage::Place(place.clone()))
        }
    }
}
