//! Heap storage.
//!
//! The heap owns every piece of storage a value graph can share: slots
//! (variables), slice backing blocks, maps, functions and channels. Values
//! refer to storage by handle, so building a cycle is allocate-then-store:
//!
//! ```
//! use valdump_value::{Field, Heap, Place, TypeId, Value};
//!
//! let mut heap = Heap::new();
//! let node = heap.types_mut().declare("main.Node");
//! let node_ptr = heap.types_mut().pointer(node);
//! heap.types_mut().define(
//!     node,
//!     valdump_value::TypeKind::Struct(vec![
//!         Field::public("ID", TypeId::STRING),
//!         Field::public("Next", node_ptr),
//!     ]),
//! );
//! let a = heap.alloc(node, Value::Struct(vec![Value::str("A"), Value::Pointer(None)]));
//! heap.store(&Place::slot(a).member(1), Value::ptr(Place::slot(a))).unwrap();
//! ```

use thiserror::Error;

use crate::{
    BlockId, ChanId, FuncId, MapId, Place, SlotId, TypeId, TypeTable, TypedValue, Value,
};
use crate::place::Base;

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]

/// Errors raised while building a heap.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeapError {
    #[error("unknown slot {0}")]
    UnknownSlot(SlotId),
    #[error("unknown block {0}")]
    UnknownBlock(BlockId),
    #[error("unknown map {0}")]
    UnknownMap(MapId),
    #[error("element {index} is out of range for {block} of length {len}")]
    ElementOutOfRange { block: BlockId, index: u32, len: usize },
    #[error("step {step} of `{place}` does not address a struct field or array element")]
    InvalidPath { place: String, step: usize },
    #[error("`{0}` belongs to a dump call and cannot be stored through")]
    RootPlace(String),
}

/// Backing storage shared by slices. Elements are addressable.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub elem: TypeId,
    pub elems: Vec<Value>,
}

/// Map storage. Entries keep insertion order; walkers sort them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapData {
    pub entries: Vec<(Value, Value)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncData {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChanData {
    pub capacity: usize,
}

/// Owner of all storage and of the type table.
#[derive(Clone, Debug, Default)]
pub struct Heap {
    types: TypeTable,
    slots: Vec<TypedValue>,
    blocks: Vec<Block>,
    maps: Vec<MapData>,
    funcs: Vec<FuncData>,
    chans: Vec<ChanData>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeTable {
        &mut self.types
    }

    /// Allocate a slot holding `value` of type `ty`.
    pub fn alloc(&mut self, ty: TypeId, value: Value) -> SlotId {
        let id = SlotId::from_index(self.slots.len());
        self.slots.push(TypedValue::new(ty, value));
        id
    }

    /// Allocate a slice backing block.
    pub fn alloc_block(&mut self, elem: TypeId, elems: Vec<Value>) -> BlockId {
        let id = BlockId::from_index(self.blocks.len());
        self.blocks.push(Block { elem, elems });
        id
    }

    pub fn alloc_map(&mut self, entries: Vec<(Value, Value)>) -> MapId {
        let id = MapId::from_index(self.maps.len());
        self.maps.push(MapData { entries });
        id
    }

    pub fn alloc_func(&mut self, name: impl Into<String>) -> FuncId {
        let id = FuncId::from_index(self.funcs.len());
        self.funcs.push(FuncData { name: name.into() });
        id
    }

    pub fn alloc_chan(&mut self, capacity: usize) -> ChanId {
        let id = ChanId::from_index(self.chans.len());
        self.chans.push(ChanData { capacity });
        id
    }

    /// Insert or replace a map entry.
    pub fn map_insert(&mut self, map: MapId, key: Value, value: Value) -> Result<(), HeapError> {
        let data = self
            .maps
            .get_mut(map.index())
            .ok_or(HeapError::UnknownMap(map))?;
        if let Some(entry) = data.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            data.entries.push((key, value));
        }
        Ok(())
    }

    pub fn slot(&self, id: SlotId) -> Option<&TypedValue> {
        self.slots.get(id.index())
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    pub fn map(&self, id: MapId) -> Option<&MapData> {
        self.maps.get(id.index())
    }

    pub fn func(&self, id: FuncId) -> Option<&FuncData> {
        self.funcs.get(id.index())
    }

    pub fn chan(&self, id: ChanId) -> Option<&ChanData> {
        self.chans.get(id.index())
    }

    /// Read the value stored at `place`.
    pub fn load(&self, place: &Place) -> Result<(TypeId, &Value), HeapError> {
        let (mut ty, mut value) = match place.base() {
            Base::Slot(slot) => {
                let cell = self.slot(slot).ok_or(HeapError::UnknownSlot(slot))?;
                (cell.ty, &cell.value)
            }
            Base::Element(block, index) => {
                let data = self.block(block).ok_or(HeapError::UnknownBlock(block))?;
                let elem = data
                    .elems
                    .get(index as usize)
                    .ok_or(HeapError::ElementOutOfRange {
                        block,
                        index,
                        len: data.elems.len(),
                    })?;
                (data.elem, elem)
            }
            Base::Root(_) => return Err(HeapError::RootPlace(place.to_string())),
        };
        for (step, &index) in place.path().iter().enumerate() {
            (ty, value) = project(&self.types, ty, value, index).ok_or_else(|| {
                HeapError::InvalidPath {
                    place: place.to_string(),
                    step,
                }
            })?;
        }
        Ok((ty, value))
    }

    /// Overwrite the value stored at `place`. The caller is responsible for
    /// storing a value of the place's type.
    pub fn store(&mut self, place: &Place, value: Value) -> Result<(), HeapError> {
        let (mut ty, mut target) = match place.base() {
            Base::Slot(slot) => {
                let cell = self
                    .slots
                    .get_mut(slot.index())
                    .ok_or(HeapError::UnknownSlot(slot))?;
                (cell.ty, &mut cell.value)
            }
            Base::Element(block, index) => {
                let data = self
                    .blocks
                    .get_mut(block.index())
                    .ok_or(HeapError::UnknownBlock(block))?;
                let len = data.elems.len();
                let elem = data
                    .elems
                    .get_mut(index as usize)
                    .ok_or(HeapError::ElementOutOfRange { block, index, len })?;
                (data.elem, elem)
            }
            Base::Root(_) => return Err(HeapError::RootPlace(place.to_string())),
        };
        for (step, &index) in place.path().iter().enumerate() {
            let member_ty = member_type(&self.types, ty, index);
            let member = match target {
                Value::Struct(members) | Value::Array(members) => members.get_mut(index as usize),
                _ => None,
            };
            match (member_ty, member) {
                (Some(member_ty), Some(member)) => {
                    ty = member_ty;
                    target = member;
                }
                _ => {
                    return Err(HeapError::InvalidPath {
                        place: place.to_string(),
                        step,
                    })
                }
            }
        }
        *target = value;
        Ok(())
    }
}

/// Type of member `index` of a struct or array type.
pub(crate) fn member_type(types: &TypeTable, ty: TypeId, index: u32) -> Option<TypeId> {
    match types.kind(ty) {
        crate::TypeKind::Struct(fields) => fields.get(index as usize).map(|f| f.ty),
        crate::TypeKind::Array { elem, .. } => Some(*elem),
        _ => None,
    }
}

/// Step from a struct/array value into its member `index`.
pub(crate) fn project<'v>(
    types: &TypeTable,
    ty: TypeId,
    value: &'v Value,
    index: u32,
) -> Option<(TypeId, &'v Value)> {
    let member_ty = member_type(types, ty, index)?;
    match value {
        Value::Struct(members) | Value::Array(members) => {
            members.get(index as usize).map(|m| (member_ty, m))
        }
        _ => None,
    }
}
