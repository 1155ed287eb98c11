//! Read-only view of a heap plus the root values of one dump call.
//!
//! An [`Occurrence`] is a single site where a value is seen while walking a
//! graph: a field, an element, a map key, an interface payload, a root. It
//! carries the place of its storage when (and only when) it is addressable.
//! Heap slots, struct/array members of addressable values, slice elements
//! and non-pointer roots are addressable; map keys and values, interface
//! payloads, pointer roots, and members of any non-addressable value are not.

use crate::heap::project;
use crate::place::Base;
use crate::{fingerprint, Heap, Kind, Place, TypeId, TypeKind, TypeTable, TypedValue, Value};

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]
mod tests;

/// One site at which a value is seen.
#[derive(Clone, Debug, PartialEq)]
pub struct Occurrence<'h> {
    pub ty: TypeId,
    pub value: &'h Value,
    pub place: Option<Place>,
}

impl<'h> Occurrence<'h> {
    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    pub fn is_addressable(&self) -> bool {
        self.place.is_some()
    }

    fn member(&self, index: u32, ty: TypeId, value: &'h Value) -> Self {
        Self {
            ty,
            value,
            place: self.place.as_ref().map(|p| p.member(index)),
        }
    }
}

/// Heap plus the roots of one call.
#[derive(Clone, Copy)]
pub struct Memory<'h> {
    heap: &'h Heap,
    roots: &'h [TypedValue],
}

impl<'h> Memory<'h> {
    pub fn new(heap: &'h Heap, roots: &'h [TypedValue]) -> Self {
        Self { heap, roots }
    }

    pub fn heap(&self) -> &'h Heap {
        self.heap
    }

    pub fn types(&self) -> &'h TypeTable {
        self.heap.types()
    }

    /// One occurrence per root. Pointer and interface roots are kept as they
    /// are; every other root is addressable at `Root(i)`, standing for the
    /// copy the call takes of it.
    pub fn roots(&self) -> Vec<Occurrence<'h>> {
        self.roots
            .iter()
            .enumerate()
            .map(|(i, root)| {
                let place = match root.value.kind() {
                    Kind::Pointer | Kind::Interface => None,
                    _ => Some(Place::root(index_u32(i))),
                };
                Occurrence {
                    ty: root.ty,
                    value: &root.value,
                    place,
                }
            })
            .collect()
    }

    /// Resolve an addressable place.
    pub fn load(&self, place: &Place) -> Option<Occurrence<'h>> {
        let (mut ty, mut value) = match place.base() {
            Base::Root(i) => {
                let root = self.roots.get(i as usize)?;
                (root.ty, &root.value)
            }
            base @ (Base::Slot(_) | Base::Element(..)) => {
                self.heap.load(&Place::new(base)).ok()?
            }
        };
        for &index in place.path() {
            (ty, value) = project(self.types(), ty, value, index)?;
        }
        Some(Occurrence {
            ty,
            value,
            place: Some(place.clone()),
        })
    }

    /// Follow one pointer or interface hop. `None` for nil and for every
    /// other kind.
    pub fn elem(&self, occ: &Occurrence<'h>) -> Option<Occurrence<'h>> {
        match occ.value {
            Value::Pointer(Some(target)) => self.load(target),
            Value::Interface(Some(payload)) => Some(Occurrence {
                ty: payload.ty,
                value: &payload.value,
                place: None,
            }),
            _ => None,
        }
    }

    /// Follow pointers and interfaces until reaching something else.
    /// `None` if a nil pointer or interface is met on the way.
    pub fn deref(&self, occ: &Occurrence<'h>) -> Option<Occurrence<'h>> {
        let mut current = occ.clone();
        while matches!(current.kind(), Kind::Pointer | Kind::Interface) {
            current = self.elem(&current)?;
        }
        Some(current)
    }

    /// Number of pointer hops from this occurrence to the value it denotes,
    /// looking through interfaces: `T` is 0, `*T` is 1, `**T` is 2.
    pub fn indirection(&self, occ: &Occurrence<'h>) -> usize {
        let mut current = occ.clone();
        while current.kind() == Kind::Interface {
            match self.elem(&current) {
                Some(next) => current = next,
                None => return 0,
            }
        }
        let mut level = 0;
        while current.kind() == Kind::Pointer {
            level += 1;
            match self.elem(&current) {
                Some(next) => current = next,
                None => break,
            }
        }
        level
    }

    /// A pointer, or an interface whose payload is (transitively) a pointer.
    pub fn is_pointer_ref(&self, occ: &Occurrence<'h>) -> bool {
        let mut current = occ.clone();
        loop {
            match current.value {
                Value::Pointer(_) => return true,
                Value::Interface(Some(_)) => match self.elem(&current) {
                    Some(next) => current = next,
                    None => return false,
                },
                _ => return false,
            }
        }
    }

    /// Fields of a struct occurrence, in declaration order.
    pub fn fields(&self, occ: &Occurrence<'h>) -> Vec<Occurrence<'h>> {
        let Value::Struct(members) = occ.value else {
            return Vec::new();
        };
        self.types()
            .fields(occ.ty)
            .iter()
            .zip(members)
            .enumerate()
            .map(|(i, (field, value))| occ.member(index_u32(i), field.ty, value))
            .collect()
    }

    /// Elements of an array or slice occurrence.
    pub fn elements(&self, occ: &Occurrence<'h>) -> Vec<Occurrence<'h>> {
        match occ.value {
            Value::Array(members) => {
                let Some(elem) = self.types().elem(occ.ty) else {
                    return Vec::new();
                };
                members
                    .iter()
                    .enumerate()
                    .map(|(i, value)| occ.member(index_u32(i), elem, value))
                    .collect()
            }
            Value::Slice(Some(block)) => {
                let Some(data) = self.heap.block(*block) else {
                    return Vec::new();
                };
                data.elems
                    .iter()
                    .enumerate()
                    .map(|(i, value)| Occurrence {
                        ty: data.elem,
                        value,
                        place: Some(Place::element(*block, index_u32(i))),
                    })
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Entries of a map occurrence as (key, value), sorted by key. Keys of
    /// primitive type sort naturally; anything else sorts by fingerprint.
    pub fn map_entries(&self, occ: &Occurrence<'h>) -> Vec<(Occurrence<'h>, Occurrence<'h>)> {
        let Value::Map(Some(map)) = occ.value else {
            return Vec::new();
        };
        let (Some(data), Some((key_ty, value_ty))) =
            (self.heap.map(*map), self.types().map_types(occ.ty))
        else {
            return Vec::new();
        };
        let mut entries: Vec<_> = data
            .entries
            .iter()
            .map(|(k, v)| {
                (
                    Occurrence {
                        ty: key_ty,
                        value: k,
                        place: None,
                    },
                    Occurrence {
                        ty: value_ty,
                        value: v,
                        place: None,
                    },
                )
            })
            .collect();
        if self.types().is_primitive(key_ty) {
            entries.sort_by(|(a, _), (b, _)| a.value.primitive_cmp(b.value));
        } else {
            let mut keyed: Vec<_> = entries
                .into_iter()
                .map(|entry| (fingerprint(self.heap, entry.0.ty, entry.0.value), entry))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
            entries = keyed.into_iter().map(|(_, entry)| entry).collect();
        }
        entries
    }

    /// The children the graph walkers expand, after dereferencing: struct
    /// fields, array/slice elements, or each map entry's key then value.
    pub fn children(&self, occ: &Occurrence<'h>) -> Vec<Occurrence<'h>> {
        let Some(target) = self.deref(occ) else {
            return Vec::new();
        };
        match self.types().kind(target.ty) {
            TypeKind::Struct(_) => self.fields(&target),
            TypeKind::Array { .. } | TypeKind::Slice { .. } => self.elements(&target),
            TypeKind::Map { .. } => self
                .map_entries(&target)
                .into_iter()
                .flat_map(|(k, v)| [k, v])
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Structural fingerprint of an occurrence's value.
    pub fn fingerprint(&self, occ: &Occurrence<'h>) -> String {
        fingerprint(self.heap, occ.ty, occ.value)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "member counts are bounded well below u32::MAX"
)]
fn index_u32(i: usize) -> u32 {
    i as u32
}
