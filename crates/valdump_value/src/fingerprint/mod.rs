//! Structural fingerprints.
//!
//! A fingerprint is a Go-syntax-like literal of a value's content:
//! `main.Person{Name:"Alice", Age:30, Friend:(*main.Person)(slot#2)}`.
//! Slices, maps and interface payloads are expanded; pointers, functions and
//! channels print their target instead of following it. Two values with the
//! same fingerprint hold the same content, which is what copy unification
//! groups on.

use rustc_hash::FxHashSet;

use crate::{ensure_sufficient_stack, BlockId, Heap, MapId, TypeId, TypeKind, Value};

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]

/// Fingerprint a value of type `ty`.
pub fn fingerprint(heap: &Heap, ty: TypeId, value: &Value) -> String {
    let mut printer = Printer {
        heap,
        out: String::new(),
        open: FxHashSet::default(),
    };
    printer.value(ty, value);
    printer.out
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Open {
    Block(BlockId),
    Map(MapId),
}

struct Printer<'h> {
    heap: &'h Heap,
    out: String,
    /// Slices and maps currently being expanded.
    open: FxHashSet<Open>,
}

impl Printer<'_> {
    fn type_name(&self, ty: TypeId) -> &str {
        self.heap.types().name(ty)
    }

    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn value(&mut self, ty: TypeId, value: &Value) {
        ensure_sufficient_stack(|| self.value_inner(ty, value));
    }

    fn value_inner(&mut self, ty: TypeId, value: &Value) {
        match value {
            Value::Bool(b) => self.push(if *b { "true" } else { "false" }),
            Value::Int(i) => self.out.push_str(&i.to_string()),
            Value::Uint(u) => self.out.push_str(&format!("0x{u:x}")),
            Value::Float(f) => self.out.push_str(&f.to_string()),
            Value::Str(s) => self.out.push_str(&format!("{s:?}")),
            Value::Struct(members) => self.structure(ty, members),
            Value::Array(members) => {
                let elem = self.heap.types().elem(ty).unwrap_or(TypeId::ANY);
                self.sequence(ty, elem, members);
            }
            Value::Slice(None) | Value::Map(None) => {
                let name = format!("{}(nil)", self.type_name(ty));
                self.push(&name);
            }
            Value::Slice(Some(block)) => self.slice(ty, *block),
            Value::Map(Some(map)) => self.map(ty, *map),
            Value::Pointer(target) => {
                let target = target.as_ref().map(ToString::to_string);
                self.handle(ty, target);
            }
            Value::Func(func) => self.handle(ty, func.map(|f| f.to_string())),
            Value::Chan(chan) => self.handle(ty, chan.map(|c| c.to_string())),
            Value::Interface(None) => {
                let name = format!("{}(nil)", self.type_name(ty));
                self.push(&name);
            }
            Value::Interface(Some(payload)) => self.value(payload.ty, &payload.value),
        }
    }

    fn structure(&mut self, ty: TypeId, members: &[Value]) {
        let heap = self.heap;
        self.push(heap.types().name(ty));
        self.push("{");
        for (i, (field, member)) in heap.types().fields(ty).iter().zip(members).enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(&field.name);
            self.push(":");
            self.value(field.ty, member);
        }
        self.push("}");
    }

    fn sequence(&mut self, ty: TypeId, elem: TypeId, members: &[Value]) {
        let heap = self.heap;
        self.push(heap.types().name(ty));
        self.push("{");
        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.value(elem, member);
        }
        self.push("}");
    }

    fn slice(&mut self, ty: TypeId, block: BlockId) {
        let heap = self.heap;
        let Some(data) = heap.block(block) else {
            return self.push("<invalid>");
        };
        if !self.open.insert(Open::Block(block)) {
            return self.push("<cycle>");
        }
        self.sequence(ty, data.elem, &data.elems);
        self.open.remove(&Open::Block(block));
    }

    fn map(&mut self, ty: TypeId, map: MapId) {
        let heap = self.heap;
        let (Some(data), Some((key_ty, value_ty))) = (heap.map(map), heap.types().map_types(ty))
        else {
            return self.push("<invalid>");
        };
        if !self.open.insert(Open::Map(map)) {
            return self.push("<cycle>");
        }
        let mut entries: Vec<&(Value, Value)> = data.entries.iter().collect();
        if heap.types().is_primitive(key_ty) {
            entries.sort_by(|(a, _), (b, _)| a.primitive_cmp(b));
        } else {
            entries.sort_by_cached_key(|(k, _)| fingerprint(heap, key_ty, k));
        }
        self.push(heap.types().name(ty));
        self.push("{");
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.value(key_ty, key);
            self.push(":");
            self.value(value_ty, value);
        }
        self.push("}");
        self.open.remove(&Open::Map(map));
    }

    /// `(T)(target)` or `(T)(nil)`.
    fn handle(&mut self, ty: TypeId, target: Option<String>) {
        let text = format!(
            "({})({})",
            self.type_name(ty),
            target.as_deref().unwrap_or("nil")
        );
        self.push(&text);
    }
}

/// Whether a value's fingerprint would be taken at all: zero-sized values
/// all look alike and never unify.
pub fn is_fingerprinted(heap: &Heap, ty: TypeId) -> bool {
    !heap.types().is_zero_sized(ty) || !matches!(heap.types().kind(ty), TypeKind::Struct(_))
}
