use pretty_assertions::assert_eq;
use valdump_value::{Field, Heap, TypedValue};

use super::*;

fn occ(ty: TypeId, value: &Value) -> Occurrence<'_> {
    Occurrence {
        ty,
        value,
        place: None,
    }
}

#[test]
fn pointer_and_value_share_raw_key() {
    let mut heap = Heap::new();
    let ptr = heap.types_mut().pointer(TypeId::INT);
    let slot = heap.alloc(TypeId::INT, Value::Int(5));
    let roots = vec![
        TypedValue::new(ptr, Value::ptr(Place::slot(slot))),
        TypedValue::new(ptr, Value::ptr(Place::slot(slot))),
    ];
    let memory = Memory::new(&heap, &roots);
    let mut keys = KeyDeriver::new(memory);
    let occs = memory.roots();

    let a = keys.raw_key(&occs[0]).unwrap();
    let b = keys.raw_key(&occs[1]).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.ty, TypeId::INT);

    let direct = memory.load(&Place::slot(slot)).unwrap();
    assert_eq!(keys.raw_key(&direct), Some(a));
}

#[test]
fn instance_key_keeps_pointer_type() {
    let mut heap = Heap::new();
    let ptr = heap.types_mut().pointer(TypeId::INT);
    let slot = heap.alloc(TypeId::INT, Value::Int(5));
    let roots = vec![TypedValue::new(ptr, Value::ptr(Place::slot(slot)))];
    let memory = Memory::new(&heap, &roots);
    let mut keys = KeyDeriver::new(memory);
    let root = &memory.roots()[0];

    let raw = keys.raw_key(root).unwrap();
    let instance = keys.instance_key(root).unwrap();
    assert_eq!(raw.location, instance.location);
    assert_eq!(instance.ty, ptr);
}

#[test]
fn instance_key_unwraps_interfaces() {
    let mut heap = Heap::new();
    let ptr = heap.types_mut().pointer(TypeId::INT);
    let slot = heap.alloc(TypeId::INT, Value::Int(5));
    let boxed = Value::iface(ptr, Value::ptr(Place::slot(slot)));
    let bare = Value::ptr(Place::slot(slot));
    let memory = Memory::new(&heap, &[]);
    let mut keys = KeyDeriver::new(memory);

    assert_eq!(
        keys.instance_key(&occ(TypeId::ANY, &boxed)),
        keys.instance_key(&occ(ptr, &bare))
    );
    assert_eq!(keys.instance_key(&occ(TypeId::ANY, &Value::Interface(None))), None);
}

#[test]
fn equal_primitives_share_synthetic_location() {
    let heap = Heap::new();
    let memory = Memory::new(&heap, &[]);
    let mut keys = KeyDeriver::new(memory);
    let seven = Value::Int(7);
    let also_seven = Value::Int(7);
    let eight = Value::Int(8);

    let a = keys.raw_key(&occ(TypeId::INT, &seven)).unwrap();
    let b = keys.raw_key(&occ(TypeId::INT, &also_seven)).unwrap();
    let c = keys.raw_key(&occ(TypeId::INT, &eight)).unwrap();
    let d = keys.raw_key(&occ(TypeId::INT64, &seven)).unwrap();

    assert_eq!(a, b);
    assert_ne!(a.location, c.location);
    assert_ne!(a.location, d.location);
    assert!(matches!(a.location, Location::Synthetic(_)));
}

#[test]
fn handles_key_non_addressable_containers() {
    let mut heap = Heap::new();
    let ints = heap.types_mut().slice(TypeId::INT);
    let block = heap.alloc_block(TypeId::INT, vec![Value::Int(1)]);
    let memory = Memory::new(&heap, &[]);
    let mut keys = KeyDeriver::new(memory);
    let slice = Value::Slice(Some(block));

    let key = keys.raw_key(&occ(ints, &slice)).unwrap();
    assert!(matches!(key.location, Location::Storage(_)));
    assert_eq!(keys.raw_key(&occ(ints, &Value::Slice(None))), None);
}

#[test]
fn non_addressable_struct_has_no_key() {
    let mut heap = Heap::new();
    let point = heap.types_mut().struct_type(
        "main.Point",
        vec![Field::public("X", TypeId::INT)],
    );
    let memory = Memory::new(&heap, &[]);
    let mut keys = KeyDeriver::new(memory);
    let value = Value::Struct(vec![Value::Int(1)]);

    assert_eq!(keys.raw_key(&occ(point, &value)), None);
}

#[test]
fn zero_sized_storage_shares_one_location() {
    let mut heap = Heap::new();
    let empty = heap.types_mut().struct_type("main.Empty", Vec::new());
    let a = heap.alloc(empty, Value::Struct(Vec::new()));
    let b = heap.alloc(empty, Value::Struct(Vec::new()));
    let memory = Memory::new(&heap, &[]);
    let mut keys = KeyDeriver::new(memory);

    let ka = keys.raw_key(&memory.load(&Place::slot(a)).unwrap()).unwrap();
    let kb = keys.raw_key(&memory.load(&Place::slot(b)).unwrap()).unwrap();
    assert_eq!(ka, kb);
}

#[test]
fn storage_orders_before_synthetic() {
    let mut heap = Heap::new();
    let slot = heap.alloc(TypeId::INT, Value::Int(1));
    let memory = Memory::new(&heap, &[]);
    let mut keys = KeyDeriver::new(memory);
    let loose = Value::Int(2);

    let synthetic = keys.raw_key(&occ(TypeId::INT, &loose)).unwrap();
    let stored = keys
        .raw_key(&memory.load(&Place::slot(slot)).unwrap())
        .unwrap();
    assert!(stored.location < synthetic.location);
    assert_eq!(keys.locations().len(), 2);
}
