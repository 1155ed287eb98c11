//! Typed memory model for the valdump value printer.
//!
//! A dump walks a graph of values that can share storage. This crate models
//! that graph explicitly:
//!
//! - [`TypeTable`]: interned types, referenced by [`TypeId`]
//! - [`Heap`]: slots, slice blocks, maps, functions and channels
//! - [`Value`]: a closed sum of value kinds; reference kinds hold handles
//! - [`Place`]: the address of addressable storage
//! - [`Memory`]/[`Occurrence`]: the read-only view the analysis walks
//!
//! Identity questions ("is this the same storage as that?") are answered by
//! comparing places and handles, never by comparing content. Content
//! comparison goes through [`fingerprint`].

mod fingerprint;
mod heap;
mod ids;
mod memory;
mod place;
mod stack;
mod types;
mod value;

pub use fingerprint::{fingerprint, is_fingerprinted};
pub use heap::{Block, ChanData, FuncData, Heap, HeapError, MapData};
pub use ids::{BlockId, ChanId, FuncId, MapId, SlotId, TypeId};
pub use memory::{Memory, Occurrence};
pub use place::{Base, Place};
pub use stack::ensure_sufficient_stack;
pub use types::{ChanDir, Field, TypeFlags, TypeInfo, TypeKind, TypeTable};
pub use value::{Kind, PrimitiveKey, TypedValue, Value};
