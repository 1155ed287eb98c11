//! Values.
//!
//! [`Value`] is a closed sum type: one variant per value kind, with one
//! traversal rule per variant. Structs and arrays hold their members inline;
//! everything with reference semantics (slices, maps, pointers, functions,
//! channels) holds a handle into the [`Heap`](crate::Heap), with `None`
//! standing for nil.

use std::cmp::Ordering;

use crate::{BlockId, ChanId, FuncId, MapId, Place, TypeId};

/// A value of some type. The type is carried alongside, never inside.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    /// Field values in declaration order.
    Struct(Vec<Value>),
    Array(Vec<Value>),
    Slice(Option<BlockId>),
    Map(Option<MapId>),
    Pointer(Option<Place>),
    /// Dynamic type and value of a non-nil interface.
    Interface(Option<Box<TypedValue>>),
    Func(Option<FuncId>),
    Chan(Option<ChanId>),
}

/// A value paired with its type: heap slots, interface payloads and the
/// root values handed to a dump call.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedValue {
    pub ty: TypeId,
    pub value: Value,
}

impl TypedValue {
    pub fn new(ty: TypeId, value: Value) -> Self {
        Self { ty, value }
    }
}

/// Value kind, mirroring the [`Value`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Struct,
    Array,
    Slice,
    Map,
    Pointer,
    Interface,
    Func,
    Chan,
}

impl Kind {
    /// Bool, number or string.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            Kind::Bool | Kind::Int | Kind::Uint | Kind::Float | Kind::String
        )
    }

    /// Kinds whose children the walkers expand.
    pub fn is_composite(self) -> bool {
        matches!(self, Kind::Struct | Kind::Array | Kind::Slice | Kind::Map)
    }
}

/// Hashable identity of a primitive value, used to give equal
/// non-addressable primitives one synthetic location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKey {
    Bool(bool),
    Int(i64),
    Uint(u64),
    /// IEEE bits, with `-0.0` folded into `0.0`.
    Float(u64),
    Str(String),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn ptr(place: Place) -> Self {
        Value::Pointer(Some(place))
    }

    pub fn iface(ty: TypeId, value: Value) -> Self {
        Value::Interface(Some(Box::new(TypedValue::new(ty, value))))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::String,
            Value::Struct(_) => Kind::Struct,
            Value::Array(_) => Kind::Array,
            Value::Slice(_) => Kind::Slice,
            Value::Map(_) => Kind::Map,
            Value::Pointer(_) => Kind::Pointer,
            Value::Interface(_) => Kind::Interface,
            Value::Func(_) => Kind::Func,
            Value::Chan(_) => Kind::Chan,
        }
    }

    /// Whether this is a nil slice, map, pointer, interface, function or channel.
    pub fn is_nil(&self) -> bool {
        match self {
            Value::Slice(h) => h.is_none(),
            Value::Map(h) => h.is_none(),
            Value::Pointer(p) => p.is_none(),
            Value::Interface(i) => i.is_none(),
            Value::Func(h) => h.is_none(),
            Value::Chan(h) => h.is_none(),
            _ => false,
        }
    }

    pub fn primitive_key(&self) -> Option<PrimitiveKey> {
        Some(match self {
            Value::Bool(b) => PrimitiveKey::Bool(*b),
            Value::Int(i) => PrimitiveKey::Int(*i),
            Value::Uint(u) => PrimitiveKey::Uint(*u),
            Value::Float(f) => {
                let f = if *f == 0.0 { 0.0 } else { *f };
                PrimitiveKey::Float(f.to_bits())
            }
            Value::Str(s) => PrimitiveKey::Str(s.clone()),
            _ => return None,
        })
    }

    /// Natural order between two primitives of the same kind. Mismatched
    /// kinds, non-primitives and NaN compare equal.
    pub fn primitive_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Uint(a), Value::Uint(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}
