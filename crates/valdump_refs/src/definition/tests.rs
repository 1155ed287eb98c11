use pretty_assertions::assert_eq;
use valdump_value::{Field, Heap, Memory, Place, TypedValue, Value};

use super::*;
use crate::{IdAssigner, Location};

fn point(via_pointer: bool, indirection: usize, depth: usize) -> DefinitionPoint {
    DefinitionPoint {
        instance: CanonicalKey::new(Location::Storage(0), TypeId::INT),
        via_pointer,
        indirection,
        depth,
        value_type: TypeId::INT,
    }
}

#[test]
fn value_beats_pointer() {
    assert!(point(true, 1, 0).is_beaten_by(false, 0, 5));
    assert!(!point(false, 0, 5).is_beaten_by(true, 1, 0));
}

#[test]
fn fewer_hops_beat_depth() {
    assert!(point(true, 2, 0).is_beaten_by(true, 1, 4));
    assert!(!point(true, 1, 4).is_beaten_by(true, 2, 0));
}

#[test]
fn shallower_wins_ties_keep_incumbent() {
    assert!(point(true, 1, 3).is_beaten_by(true, 1, 2));
    assert!(point(false, 0, 3).is_beaten_by(false, 0, 2));
    assert!(!point(false, 0, 2).is_beaten_by(false, 0, 2));
    assert!(!point(true, 1, 2).is_beaten_by(true, 1, 2));
}

#[test]
fn single_hop_pointer_defines_over_double_hop() {
    let mut heap = Heap::new();
    let int_ptr = heap.types_mut().pointer(TypeId::INT);
    let int_ptr_ptr = heap.types_mut().pointer(int_ptr);
    let container = heap.types_mut().struct_type(
        "main.Container",
        vec![Field::public("Name", TypeId::STRING), Field::public("IntPtr", int_ptr)],
    );
    let outer = heap.types_mut().anonymous_struct(vec![
        Field::public("DeepPtr", int_ptr_ptr),
        Field::public("Container", container),
    ]);
    let shared = heap.alloc(TypeId::INT, Value::Int(666));
    let p = heap.alloc(int_ptr, Value::ptr(Place::slot(shared)));
    let roots = vec![TypedValue::new(
        outer,
        Value::Struct(vec![
            Value::ptr(Place::slot(p)),
            Value::Struct(vec![Value::str("OurContainer"), Value::ptr(Place::slot(shared))]),
        ]),
    )];
    let memory = Memory::new(&heap, &roots);
    let mut keys = KeyDeriver::new(memory);
    let stats = GraphWalker::new(&mut keys).collect_stats();
    let mut uf = UnionFind::new();
    let merged = IdAssigner::merge(&stats, &mut uf);
    let ids = IdAssigner::assign(memory.types(), &merged);
    assert_eq!(ids.len(), 1);

    let points = DefinitionPointSelector::new(&mut uf, &ids).select(&mut keys);
    let (_, def) = points.iter().next().unwrap();
    assert!(def.via_pointer);
    assert_eq!(def.indirection, 1);
    assert_eq!(def.depth, 2);
    assert_eq!(def.instance.ty, int_ptr);
    assert_eq!(def.value_type, TypeId::INT);
}
