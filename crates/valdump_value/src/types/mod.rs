//! Type table.
//!
//! All types live in one table and are referenced by [`TypeId`]. Primitive
//! types are pre-interned at fixed indices ([`TypeId::INT`] and friends).
//! Structural types (`*T`, `[]T`, `[N]T`, `map[K]V`, `chan T`, function
//! signatures) are memoized, so asking twice for `*T` yields the same index.
//! Named types are nominal: [`TypeTable::declare`] reserves an index before
//! the definition exists, which is how self-referential types are built.

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::TypeId;

#[cfg(test)]
mod tests;

bitflags! {
    /// Pre-computed type properties, fixed when the type is defined.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u8 {
        /// Bool, number or string.
        const PRIMITIVE = 1 << 0;
        /// Slice, map, channel or function: identity comes from a handle.
        const REFERENCE = 1 << 1;
        /// Struct, array, slice or map: has children to expand.
        const COMPOSITE = 1 << 2;
        /// Occupies no storage (empty structs, zero-length arrays).
        const ZERO_SIZED = 1 << 3;
        /// Introduced by `declare` rather than built structurally.
        const NAMED = 1 << 4;
    }
}

/// A struct field declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    pub exported: bool,
}

impl Field {
    /// An exported (publicly visible) field.
    pub fn public(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            exported: true,
        }
    }

    /// An unexported field.
    pub fn private(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            exported: false,
        }
    }
}

/// Channel direction, shown by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// The shape of a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Struct(Vec<Field>),
    Array { elem: TypeId, len: usize },
    Slice { elem: TypeId },
    Map { key: TypeId, value: TypeId },
    Pointer { elem: TypeId },
    Interface,
    Func,
    Chan { elem: TypeId, dir: ChanDir },
}

/// One interned type.
#[derive(Clone, Debug)]
pub struct TypeInfo {
    name: String,
    kind: TypeKind,
    flags: TypeFlags,
}

impl TypeInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn flags(&self) -> TypeFlags {
        self.flags
    }
}

/// Memoization key for structural types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Structural {
    Pointer(TypeId),
    Slice(TypeId),
    Array(TypeId, usize),
    Map(TypeId, TypeId),
    Chan(TypeId, ChanDir),
    Func(String),
}

/// Interned type storage.
#[derive(Clone, Debug)]
pub struct TypeTable {
    types: Vec<TypeInfo>,
    structural: FxHashMap<Structural, TypeId>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    /// Create a table with the primitive types pre-interned.
    pub fn new() -> Self {
        let mut table = Self {
            types: Vec::with_capacity(64),
            structural: FxHashMap::default(),
        };
        // Order must match the `TypeId` constants.
        for (name, kind) in [
            ("bool", TypeKind::Bool),
            ("int", TypeKind::Int),
            ("int8", TypeKind::Int),
            ("int16", TypeKind::Int),
            ("int32", TypeKind::Int),
            ("int64", TypeKind::Int),
            ("uint", TypeKind::Uint),
            ("uint8", TypeKind::Uint),
            ("uint16", TypeKind::Uint),
            ("uint32", TypeKind::Uint),
            ("uint64", TypeKind::Uint),
            ("float32", TypeKind::Float),
            ("float64", TypeKind::Float),
            ("string", TypeKind::String),
            ("any", TypeKind::Interface),
        ] {
            table.push(name.to_owned(), kind);
        }
        debug_assert_eq!(table.types.len(), TypeId::PRIMITIVE_COUNT as usize);
        table
    }

    fn push(&mut self, name: String, kind: TypeKind) -> TypeId {
        let id = TypeId::from_index(self.types.len());
        let flags = self.compute_flags(&kind);
        self.types.push(TypeInfo { name, kind, flags });
        id
    }

    fn compute_flags(&self, kind: &TypeKind) -> TypeFlags {
        match kind {
            TypeKind::Bool
            | TypeKind::Int
            | TypeKind::Uint
            | TypeKind::Float
            | TypeKind::String => TypeFlags::PRIMITIVE,
            TypeKind::Struct(fields) => {
                let mut flags = TypeFlags::COMPOSITE;
                if fields.iter().all(|f| self.is_zero_sized(f.ty)) {
                    flags |= TypeFlags::ZERO_SIZED;
                }
                flags
            }
            TypeKind::Array { elem, len } => {
                let mut flags = TypeFlags::COMPOSITE;
                if *len == 0 || self.is_zero_sized(*elem) {
                    flags |= TypeFlags::ZERO_SIZED;
                }
                flags
            }
            TypeKind::Slice { .. } | TypeKind::Map { .. } => {
                TypeFlags::COMPOSITE | TypeFlags::REFERENCE
            }
            TypeKind::Func | TypeKind::Chan { .. } => TypeFlags::REFERENCE,
            TypeKind::Pointer { .. } | TypeKind::Interface => TypeFlags::empty(),
        }
    }

    /// Reserve a named type. Until [`define`](Self::define) is called it
    /// behaves as an empty struct.
    pub fn declare(&mut self, name: impl Into<String>) -> TypeId {
        let id = self.push(name.into(), TypeKind::Struct(Vec::new()));
        self.types[id.index()].flags |= TypeFlags::NAMED;
        id
    }

    /// Give a declared type its definition.
    pub fn define(&mut self, id: TypeId, kind: TypeKind) {
        let flags = self.compute_flags(&kind) | TypeFlags::NAMED;
        let info = &mut self.types[id.index()];
        info.kind = kind;
        info.flags = flags;
    }

    /// Declare and define a named struct in one step.
    pub fn struct_type(&mut self, name: impl Into<String>, fields: Vec<Field>) -> TypeId {
        let id = self.declare(name);
        self.define(id, TypeKind::Struct(fields));
        id
    }

    /// An anonymous struct, named after its field list.
    pub fn anonymous_struct(&mut self, fields: Vec<Field>) -> TypeId {
        let body = fields
            .iter()
            .map(|f| format!("{} {}", f.name, self.name(f.ty)))
            .collect::<Vec<_>>()
            .join("; ");
        let name = if body.is_empty() {
            "struct {}".to_owned()
        } else {
            format!("struct {{ {body} }}")
        };
        self.push(name, TypeKind::Struct(fields))
    }

    /// A named interface type such as `error` or `fmt.Stringer`.
    pub fn interface(&mut self, name: impl Into<String>) -> TypeId {
        let id = self.declare(name);
        self.define(id, TypeKind::Interface);
        id
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.structural(Structural::Pointer(elem), |t| {
            (format!("*{}", t.name(elem)), TypeKind::Pointer { elem })
        })
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.structural(Structural::Slice(elem), |t| {
            (format!("[]{}", t.name(elem)), TypeKind::Slice { elem })
        })
    }

    pub fn array(&mut self, elem: TypeId, len: usize) -> TypeId {
        self.structural(Structural::Array(elem, len), |t| {
            (format!("[{len}]{}", t.name(elem)), TypeKind::Array { elem, len })
        })
    }

    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.structural(Structural::Map(key, value), |t| {
            (
                format!("map[{}]{}", t.name(key), t.name(value)),
                TypeKind::Map { key, value },
            )
        })
    }

    pub fn chan(&mut self, elem: TypeId, dir: ChanDir) -> TypeId {
        self.structural(Structural::Chan(elem, dir), |t| {
            let name = match dir {
                ChanDir::Both => format!("chan {}", t.name(elem)),
                ChanDir::Send => format!("chan<- {}", t.name(elem)),
                ChanDir::Recv => format!("<-chan {}", t.name(elem)),
            };
            (name, TypeKind::Chan { elem, dir })
        })
    }

    /// A function type identified by its signature text, e.g. `func(int) string`.
    pub fn func(&mut self, signature: &str) -> TypeId {
        self.structural(Structural::Func(signature.to_owned()), |_| {
            (signature.to_owned(), TypeKind::Func)
        })
    }

    fn structural(
        &mut self,
        key: Structural,
        build: impl FnOnce(&Self) -> (String, TypeKind),
    ) -> TypeId {
        if let Some(&id) = self.structural.get(&key) {
            return id;
        }
        let (name, kind) = build(self);
        let id = self.push(name, kind);
        self.structural.insert(key, id);
        id
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeInfo {
        &self.types[id.index()]
    }

    #[inline]
    pub fn name(&self, id: TypeId) -> &str {
        &self.types[id.index()].name
    }

    #[inline]
    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.types[id.index()].kind
    }

    #[inline]
    pub fn flags(&self, id: TypeId) -> TypeFlags {
        self.types[id.index()].flags
    }

    #[inline]
    pub fn is_zero_sized(&self, id: TypeId) -> bool {
        self.flags(id).contains(TypeFlags::ZERO_SIZED)
    }

    #[inline]
    pub fn is_primitive(&self, id: TypeId) -> bool {
        self.flags(id).contains(TypeFlags::PRIMITIVE)
    }

    /// Struct fields, or an empty slice for non-struct types.
    pub fn fields(&self, id: TypeId) -> &[Field] {
        match self.kind(id) {
            TypeKind::Struct(fields) => fields,
            _ => &[],
        }
    }

    /// Element type of a pointer, slice, array or channel.
    pub fn elem(&self, id: TypeId) -> Option<TypeId> {
        match *self.kind(id) {
            TypeKind::Pointer { elem }
            | TypeKind::Slice { elem }
            | TypeKind::Array { elem, .. }
            | TypeKind::Chan { elem, .. } => Some(elem),
            _ => None,
        }
    }

    /// Key and value types of a map.
    pub fn map_types(&self, id: TypeId) -> Option<(TypeId, TypeId)> {
        match *self.kind(id) {
            TypeKind::Map { key, value } => Some((key, value)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
