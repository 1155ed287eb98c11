use pretty_assertions::assert_eq;
use valdump_value::{Field, Heap, TypeId, TypedValue, Value};

use super::*;

fn point(heap: &mut Heap) -> Vec<TypedValue> {
    let pt = heap.types_mut().struct_type(
        "main.Point",
        vec![Field::public("X", TypeId::INT), Field::public("Y", TypeId::INT)],
    );
    vec![TypedValue::new(
        pt,
        Value::Struct(vec![Value::Int(1), Value::Int(2)]),
    )]
}

#[test]
fn sdump_uses_full_config() {
    let mut heap = Heap::new();
    let roots = point(&mut heap);
    assert_eq!(
        sdump(&heap, &roots),
        "main.Point => {⯀ X int => 1, ⯀ Y int => 2}\n"
    );
}

#[test]
fn sdump_simple_hides_types() {
    let mut heap = Heap::new();
    let roots = point(&mut heap);
    assert_eq!(sdump_simple(&heap, &roots), "{⯀ X => 1, ⯀ Y => 2}\n");
}

#[test]
fn fdump_writes_what_sdump_returns() {
    let mut heap = Heap::new();
    let roots = point(&mut heap);
    let mut out = Vec::new();
    fdump(&mut out, &heap, &roots).unwrap();
    assert_eq!(out, sdump(&heap, &roots).into_bytes());
}

#[test]
fn dumper_keeps_its_config() {
    let config = DumpConfig::full().with_indent_width(2);
    assert_eq!(Dumper::new(config).config(), config);
    assert_eq!(Dumper::default().config(), DumpConfig::full());
}

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
