use pretty_assertions::assert_eq;
use valdump_value::{Field, Memory, Place, TypeId, TypedValue, Value};

use super::*;
use crate::{GraphWalker, KeyDeriver};

/// Run the first pass and unification, then report the root of each place.
fn roots_after_unify(heap: &Heap, roots: &[TypedValue], places: &[Place]) -> Vec<CanonicalKey> {
    let memory = Memory::new(heap, roots);
    let mut keys = KeyDeriver::new(memory);
    let stats = GraphWalker::new(&mut keys).collect_stats();
    let mut uf = UnionFind::new();
    CopyUnifier::new(heap, &stats).unify(&mut uf);
    places
        .iter()
        .map(|place| {
            let occ = memory.load(place).unwrap();
            uf.find(keys.raw_key(&occ).unwrap())
        })
        .collect()
}

#[test]
fn single_source_absorbs_copies() {
    let mut heap = Heap::new();
    let int_ptr = heap.types_mut().pointer(TypeId::INT);
    let holder = heap.types_mut().struct_type(
        "main.Holder",
        vec![Field::public("Value", TypeId::INT), Field::public("Ptr", int_ptr)],
    );
    let target = heap.alloc(TypeId::INT, Value::Int(333));
    let roots = vec![TypedValue::new(
        holder,
        Value::Struct(vec![Value::Int(333), Value::ptr(Place::slot(target))]),
    )];

    let found = roots_after_unify(
        &heap,
        &roots,
        &[Place::root(0).member(0), Place::slot(target)],
    );
    assert_eq!(found[0], found[1]);
}

#[test]
fn ambiguous_primitives_pair_in_location_order() {
    let mut heap = Heap::new();
    let int_ptr = heap.types_mut().pointer(TypeId::INT);
    let test = heap.types_mut().struct_type(
        "main.PointerTest",
        vec![
            Field::public("SomeInt2", TypeId::INT),
            Field::public("SomeInt3", TypeId::INT),
            Field::public("P2", int_ptr),
            Field::public("P3", int_ptr),
        ],
    );
    let v2 = heap.alloc(TypeId::INT, Value::Int(-2000));
    let v3 = heap.alloc(TypeId::INT, Value::Int(-2000));
    let roots = vec![TypedValue::new(
        test,
        Value::Struct(vec![
            Value::Int(-2000),
            Value::Int(-2000),
            Value::ptr(Place::slot(v2)),
            Value::ptr(Place::slot(v3)),
        ]),
    )];

    let found = roots_after_unify(
        &heap,
        &roots,
        &[
            Place::root(0).member(0),
            Place::root(0).member(1),
            Place::slot(v2),
            Place::slot(v3),
        ],
    );
    // First copy with first source, second with second.
    assert_eq!(found[0], found[2]);
    assert_eq!(found[1], found[3]);
    assert_ne!(found[0], found[1]);
}

#[test]
fn unbalanced_primitive_group_is_left_alone() {
    let mut heap = Heap::new();
    let int_ptr = heap.types_mut().pointer(TypeId::INT);
    let ptrs = heap.types_mut().array(int_ptr, 2);
    let a = heap.alloc(TypeId::INT, Value::Int(9));
    let b = heap.alloc(TypeId::INT, Value::Int(9));
    let roots = vec![TypedValue::new(
        ptrs,
        Value::Array(vec![Value::ptr(Place::slot(a)), Value::ptr(Place::slot(b))]),
    )];

    let found = roots_after_unify(&heap, &roots, &[Place::slot(a), Place::slot(b)]);
    assert_ne!(found[0], found[1]);
}

#[test]
fn composite_sources_without_copies_merge() {
    let mut heap = Heap::new();
    let strings = heap.types_mut().slice(TypeId::STRING);
    let nested = heap.types_mut().slice(strings);
    let shared = heap.alloc_block(TypeId::STRING, vec![Value::str("shared"), Value::str("data")]);
    let unique = heap.alloc_block(TypeId::STRING, vec![Value::str("unique"), Value::str("data")]);
    let outer = heap.alloc_block(
        strings,
        vec![
            Value::Slice(Some(shared)),
            Value::Slice(Some(unique)),
            Value::Slice(Some(shared)),
        ],
    );
    let roots = vec![TypedValue::new(nested, Value::Slice(Some(outer)))];

    let found = roots_after_unify(
        &heap,
        &roots,
        &[
            Place::element(outer, 0),
            Place::element(outer, 1),
            Place::element(outer, 2),
        ],
    );
    assert_eq!(found[0], found[2]);
    assert_ne!(found[0], found[1]);
}

#[test]
fn unequal_values_never_group() {
    let mut heap = Heap::new();
    let int_ptr = heap.types_mut().pointer(TypeId::INT);
    let ptrs = heap.types_mut().array(int_ptr, 4);
    let slots: Vec<Value> = [1, 2, 3, 4]
        .into_iter()
        .map(|n| Value::ptr(Place::slot(heap.alloc(TypeId::INT, Value::Int(n)))))
        .collect();
    let roots = vec![TypedValue::new(ptrs, Value::Array(slots))];
    let memory = Memory::new(&heap, &roots);
    let mut keys = KeyDeriver::new(memory);
    let stats = GraphWalker::new(&mut keys).collect_stats();

    let unifier = CopyUnifier::new(&heap, &stats);
    assert!(unifier.groups().is_empty());
    let mut uf = UnionFind::new();
    unifier.unify(&mut uf);
    assert_eq!(uf.linked(), 0);
}

#[test]
fn zero_sized_structs_are_not_grouped() {
    let mut heap = Heap::new();
    let empty = heap.types_mut().struct_type("main.Empty", Vec::new());
    let pair = heap.types_mut().struct_type(
        "main.Pair",
        vec![Field::public("A", empty), Field::public("B", empty)],
    );
    let roots = vec![
        TypedValue::new(
            pair,
            Value::Struct(vec![Value::Struct(Vec::new()), Value::Struct(Vec::new())]),
        ),
        TypedValue::new(empty, Value::Struct(Vec::new())),
    ];
    let memory = Memory::new(&heap, &roots);
    let mut keys = KeyDeriver::new(memory);
    let stats = GraphWalker::new(&mut keys).collect_stats();

    assert!(CopyUnifier::new(&heap, &stats).groups().is_empty());
}
