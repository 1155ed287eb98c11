use pretty_assertions::assert_eq;

use super::*;

#[test]
fn primitives_are_pre_interned() {
    let table = TypeTable::new();
    assert_eq!(table.len(), TypeId::PRIMITIVE_COUNT as usize);
    assert_eq!(table.name(TypeId::INT), "int");
    assert_eq!(table.name(TypeId::STRING), "string");
    assert_eq!(table.name(TypeId::ANY), "any");
    assert!(table.is_primitive(TypeId::FLOAT64));
    assert!(!table.is_primitive(TypeId::ANY));
}

#[test]
fn structural_types_are_memoized() {
    let mut table = TypeTable::new();
    let a = table.pointer(TypeId::INT);
    let b = table.pointer(TypeId::INT);
    assert_eq!(a, b);
    assert_eq!(table.name(a), "*int");

    let pp = table.pointer(a);
    assert_eq!(table.name(pp), "**int");
    assert_ne!(pp, a);
}

#[test]
fn structural_names() {
    let mut table = TypeTable::new();
    let slice = table.slice(TypeId::STRING);
    let array = table.array(TypeId::INT, 3);
    let map = table.map(TypeId::STRING, slice);
    let recv = table.chan(TypeId::INT, ChanDir::Recv);
    let func = table.func("func(int) string");

    assert_eq!(table.name(slice), "[]string");
    assert_eq!(table.name(array), "[3]int");
    assert_eq!(table.name(map), "map[string][]string");
    assert_eq!(table.name(recv), "<-chan int");
    assert_eq!(table.name(func), "func(int) string");
    assert_eq!(table.map_types(map), Some((TypeId::STRING, slice)));
    assert_eq!(table.elem(array), Some(TypeId::INT));
}

#[test]
fn self_referential_struct() {
    let mut table = TypeTable::new();
    let node = table.declare("main.Node");
    let next = table.pointer(node);
    table.define(
        node,
        TypeKind::Struct(vec![
            Field::public("ID", TypeId::STRING),
            Field::public("Next", next),
        ]),
    );

    assert_eq!(table.name(next), "*main.Node");
    assert_eq!(table.fields(node).len(), 2);
    assert_eq!(table.fields(node)[1].ty, next);
    assert!(table.flags(node).contains(TypeFlags::NAMED | TypeFlags::COMPOSITE));
    assert!(!table.is_zero_sized(node));
}

#[test]
fn zero_sized_detection() {
    let mut table = TypeTable::new();
    let empty = table.struct_type("main.Empty", Vec::new());
    let wrapper = table.struct_type("main.Wrapper", vec![Field::private("e", empty)]);
    let none = table.array(TypeId::INT, 0);
    let empties = table.array(empty, 4);

    assert!(table.is_zero_sized(empty));
    assert!(table.is_zero_sized(wrapper));
    assert!(table.is_zero_sized(none));
    assert!(table.is_zero_sized(empties));
    assert!(!table.is_zero_sized(TypeId::BOOL));
}

#[test]
fn anonymous_struct_is_named_after_fields() {
    let mut table = TypeTable::new();
    let ptr = table.pointer(TypeId::INT);
    let anon = table.anonymous_struct(vec![
        Field::public("A", TypeId::INT),
        Field::public("B", ptr),
    ]);
    let empty = table.anonymous_struct(Vec::new());

    assert_eq!(table.name(anon), "struct { A int; B *int }");
    assert_eq!(table.name(empty), "struct {}");
    assert!(!table.flags(anon).contains(TypeFlags::NAMED));
}

#[test]
fn reference_flags() {
    let mut table = TypeTable::new();
    let slice = table.slice(TypeId::INT);
    let func = table.func("func()");
    let ptr = table.pointer(TypeId::INT);

    assert_eq!(table.flags(slice), TypeFlags::COMPOSITE | TypeFlags::REFERENCE);
    assert_eq!(table.flags(func), TypeFlags::REFERENCE);
    assert_eq!(table.flags(ptr), TypeFlags::empty());
}
