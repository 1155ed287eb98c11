use pretty_assertions::assert_eq;

use super::*;
use crate::Field;

struct Fixture {
    heap: Heap,
    node: TypeId,
    node_ptr: TypeId,
}

/// `main.Node{ID string; Next *main.Node}` with a two-node chain a -> b.
fn chain() -> (Fixture, crate::SlotId, crate::SlotId) {
    let mut heap = Heap::new();
    let node = heap.types_mut().declare("main.Node");
    let node_ptr = heap.types_mut().pointer(node);
    heap.types_mut().define(
        node,
        TypeKind::Struct(vec![
            Field::public("ID", TypeId::STRING),
            Field::public("Next", node_ptr),
        ]),
    );
    let b = heap.alloc(node, Value::Struct(vec![Value::str("B"), Value::Pointer(None)]));
    let a = heap.alloc(
        node,
        Value::Struct(vec![Value::str("A"), Value::ptr(Place::slot(b))]),
    );
    (
        Fixture {
            heap,
            node,
            node_ptr,
        },
        a,
        b,
    )
}

#[test]
fn value_roots_are_addressable_pointer_roots_are_not() {
    let (fx, a, _) = chain();
    let roots = vec![
        TypedValue::new(fx.node, fx.heap.slot(a).unwrap().value.clone()),
        TypedValue::new(fx.node_ptr, Value::ptr(Place::slot(a))),
    ];
    let memory = Memory::new(&fx.heap, &roots);

    let occs = memory.roots();
    assert_eq!(occs[0].place, Some(Place::root(0)));
    assert_eq!(occs[1].place, None);
}

#[test]
fn fields_inherit_addressability() {
    let (fx, a, _) = chain();
    let roots = vec![TypedValue::new(fx.node_ptr, Value::ptr(Place::slot(a)))];
    let memory = Memory::new(&fx.heap, &roots);

    let root = &memory.roots()[0];
    let fields = memory.children(root);
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].place, Some(Place::slot(a).member(0)));
    assert_eq!(fields[1].ty, fx.node_ptr);

    let payload = Value::iface(fx.node, fx.heap.slot(a).unwrap().value.clone());
    let boxed = Occurrence {
        ty: TypeId::ANY,
        value: &payload,
        place: None,
    };
    assert!(memory.children(&boxed).iter().all(|f| f.place.is_none()));
}

#[test]
fn deref_and_indirection() {
    let (mut fx, a, _) = chain();
    let pp_ty = fx.heap.types_mut().pointer(fx.node_ptr);
    let p = fx.heap.alloc(fx.node_ptr, Value::ptr(Place::slot(a)));
    let roots = vec![
        TypedValue::new(pp_ty, Value::ptr(Place::slot(p))),
        TypedValue::new(TypeId::ANY, Value::iface(fx.node_ptr, Value::ptr(Place::slot(a)))),
        TypedValue::new(fx.node_ptr, Value::Pointer(None)),
    ];
    let memory = Memory::new(&fx.heap, &roots);
    let occs = memory.roots();

    assert_eq!(memory.indirection(&occs[0]), 2);
    assert_eq!(memory.indirection(&occs[1]), 1);
    assert_eq!(memory.deref(&occs[0]).unwrap().place, Some(Place::slot(a)));
    assert_eq!(memory.deref(&occs[1]).unwrap().place, Some(Place::slot(a)));
    assert!(memory.deref(&occs[2]).is_none());
    assert!(memory.is_pointer_ref(&occs[1]));
}

#[test]
fn interface_holding_value_is_not_a_pointer_ref() {
    let heap = Heap::new();
    let roots = vec![TypedValue::new(
        TypeId::ANY,
        Value::iface(TypeId::INT, Value::Int(4)),
    )];
    let memory = Memory::new(&heap, &roots);
    let root = &memory.roots()[0];

    assert!(!memory.is_pointer_ref(root));
    assert_eq!(memory.indirection(root), 0);
}

#[test]
fn slice_elements_live_in_their_block() {
    let mut heap = Heap::new();
    let ints = heap.types_mut().slice(TypeId::INT);
    let block = heap.alloc_block(TypeId::INT, vec![Value::Int(7), Value::Int(8)]);
    let roots = vec![TypedValue::new(ints, Value::Slice(Some(block)))];
    let memory = Memory::new(&heap, &roots);

    let elems = memory.children(&memory.roots()[0]);
    assert_eq!(
        elems.iter().map(|e| e.place.clone()).collect::<Vec<_>>(),
        vec![
            Some(Place::element(block, 0)),
            Some(Place::element(block, 1))
        ]
    );
}

#[test]
fn map_children_are_key_then_value_in_key_order() {
    let mut heap = Heap::new();
    let ty = heap.types_mut().map(TypeId::STRING, TypeId::INT);
    let map = heap.alloc_map(vec![
        (Value::str("b"), Value::Int(2)),
        (Value::str("a"), Value::Int(1)),
    ]);
    let roots = vec![TypedValue::new(ty, Value::Map(Some(map)))];
    let memory = Memory::new(&heap, &roots);

    let children = memory.children(&memory.roots()[0]);
    let values: Vec<&Value> = children.iter().map(|c| c.value).collect();
    assert_eq!(
        values,
        vec![&Value::str("a"), &Value::Int(1), &Value::str("b"), &Value::Int(2)]
    );
    assert!(children.iter().all(|c| !c.is_addressable()));
}

#[test]
fn load_resolves_root_members() {
    let (fx, a, _) = chain();
    let roots = vec![TypedValue::new(
        fx.node,
        fx.heap.slot(a).unwrap().value.clone(),
    )];
    let memory = Memory::new(&fx.heap, &roots);

    let id = memory.load(&Place::root(0).member(0)).unwrap();
    assert_eq!(id.value, &Value::str("A"));
    assert!(memory.load(&Place::root(3)).is_none());
}
