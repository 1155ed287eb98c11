//! Built-in value graphs for the CLI.
//!
//! Each demo lays out a heap the way a program would: variables are slots,
//! `&x` is a pointer to a slot, and values handed to the dump are copies.

use valdump_value::{Field, Heap, HeapError, Place, TypeId, TypeKind, TypedValue, Value};

/// A heap plus the roots of one dump call.
pub struct Scene {
    pub heap: Heap,
    pub roots: Vec<TypedValue>,
}

#[derive(Debug)]
pub struct Demo {
    pub name: &'static str,
    pub summary: &'static str,
    build: fn() -> Result<Scene, HeapError>,
}

impl Demo {
    pub fn build(&self) -> Result<Scene, HeapError> {
        (self.build)()
    }
}

static DEMOS: &[Demo] = &[
    Demo {
        name: "people",
        summary: "four people whose Loves pointers form a cycle",
        build: people,
    },
    Demo {
        name: "shared-points",
        summary: "a slice holding the same *Point twice",
        build: shared_points,
    },
    Demo {
        name: "copy-vs-pointer",
        summary: "a pointer to a struct next to a copy of it",
        build: copy_vs_pointer,
    },
    Demo {
        name: "recursive-slice",
        summary: "a slice whose only element points back at it",
        build: recursive_slice,
    },
    Demo {
        name: "unequal-ints",
        summary: "four different ints, each pointed to once",
        build: unequal_ints,
    },
    Demo {
        name: "equal-ints",
        summary: "copies of equal ints paired with their pointers",
        build: equal_ints,
    },
    Demo {
        name: "deep-pointers",
        summary: "a **int and a *int reaching the same int",
        build: deep_pointers,
    },
    Demo {
        name: "zero-sized",
        summary: "pointers to distinct zero-sized structs",
        build: zero_sized,
    },
];

pub fn all() -> &'static [Demo] {
    DEMOS
}

pub fn find(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().find(|demo| demo.name == name)
}

fn people() -> Result<Scene, HeapError> {
    let mut heap = Heap::new();
    let person = heap.types_mut().declare("main.Person");
    let person_ptr = heap.types_mut().pointer(person);
    heap.types_mut().define(
        person,
        TypeKind::Struct(vec![
            Field::public("Name", TypeId::STRING),
            Field::public("Age", TypeId::INT),
            Field::public("Loves", person_ptr),
        ]),
    );
    let people_ty = heap.types_mut().slice(person_ptr);

    let mut alloc = |name: &str, age| {
        heap.alloc(
            person,
            Value::Struct(vec![Value::str(name), Value::Int(age), Value::Pointer(None)]),
        )
    };
    let alice = alloc("Alice", 44);
    let bob = alloc("Bob", 23);
    let penny = alloc("Penny", 21);
    let joe = alloc("Joe", 54);
    for (from, to) in [(alice, bob), (bob, penny), (penny, alice), (joe, penny)] {
        heap.store(&Place::slot(from).member(2), Value::ptr(Place::slot(to)))?;
    }

    let elems = [alice, bob, joe, penny]
        .into_iter()
        .map(|p| Value::ptr(Place::slot(p)))
        .collect();
    let block = heap.alloc_block(person_ptr, elems);
    Ok(Scene {
        heap,
        roots: vec![TypedValue::new(people_ty, Value::Slice(Some(block)))],
    })
}

fn point_type(heap: &mut Heap) -> TypeId {
    heap.types_mut().struct_type(
        "main.Point",
        vec![Field::public("X", TypeId::INT), Field::public("Y", TypeId::INT)],
    )
}

fn shared_points() -> Result<Scene, HeapError> {
    let mut heap = Heap::new();
    let point = point_type(&mut heap);
    let point_ptr = heap.types_mut().pointer(point);
    let points_ty = heap.types_mut().slice(point_ptr);
    let p1 = heap.alloc(point, Value::Struct(vec![Value::Int(1), Value::Int(1)]));
    let p2 = heap.alloc(point, Value::Struct(vec![Value::Int(2), Value::Int(2)]));
    let elems = [p1, p2, p1]
        .into_iter()
        .map(|p| Value::ptr(Place::slot(p)))
        .collect();
    let block = heap.alloc_block(point_ptr, elems);
    Ok(Scene {
        heap,
        roots: vec![TypedValue::new(points_ty, Value::Slice(Some(block)))],
    })
}

fn copy_vs_pointer() -> Result<Scene, HeapError> {
    let mut heap = Heap::new();
    let point = point_type(&mut heap);
    let point_ptr = heap.types_mut().pointer(point);
    let pair = heap.types_mut().struct_type(
        "main.Pair",
        vec![Field::public("Ref", point_ptr), Field::public("Copy", point)],
    );
    let value = Value::Struct(vec![Value::Int(3), Value::Int(4)]);
    let p = heap.alloc(point, value.clone());
    Ok(Scene {
        heap,
        roots: vec![TypedValue::new(
            pair,
            Value::Struct(vec![Value::ptr(Place::slot(p)), value]),
        )],
    })
}

fn recursive_slice() -> Result<Scene, HeapError> {
    let mut heap = Heap::new();
    let rs = heap.types_mut().declare("main.RecursiveSlice");
    heap.types_mut()
        .define(rs, TypeKind::Slice { elem: TypeId::ANY });
    let rs_ptr = heap.types_mut().pointer(rs);
    let block = heap.alloc_block(TypeId::ANY, vec![Value::Interface(None)]);
    let s = heap.alloc(rs, Value::Slice(Some(block)));
    heap.store(
        &Place::element(block, 0),
        Value::iface(rs_ptr, Value::ptr(Place::slot(s))),
    )?;
    Ok(Scene {
        heap,
        roots: vec![TypedValue::new(rs, Value::Slice(Some(block)))],
    })
}

fn unequal_ints() -> Result<Scene, HeapError> {
    let mut heap = Heap::new();
    let int_ptr = heap.types_mut().pointer(TypeId::INT);
    let ptrs = heap.types_mut().array(int_ptr, 4);
    let elems = [10, 20, 30, 40]
        .into_iter()
        .map(|n| Value::ptr(Place::slot(heap.alloc(TypeId::INT, Value::Int(n)))))
        .collect();
    Ok(Scene {
        heap,
        roots: vec![TypedValue::new(ptrs, Value::Array(elems))],
    })
}

fn equal_ints() -> Result<Scene, HeapError> {
    let mut heap = Heap::new();
    let int_ptr = heap.types_mut().pointer(TypeId::INT);
    let pointers = heap.types_mut().anonymous_struct(vec![
        Field::public("ToSecond", int_ptr),
        Field::public("ToThird", int_ptr),
    ]);
    let test = heap.types_mut().struct_type(
        "main.EqualInts",
        vec![
            Field::public("First", TypeId::INT),
            Field::public("Second", TypeId::INT),
            Field::public("Third", TypeId::INT),
            Field::public("Pointers", pointers),
        ],
    );
    let _first = heap.alloc(TypeId::INT, Value::Int(1000));
    let second = heap.alloc(TypeId::INT, Value::Int(-2000));
    let third = heap.alloc(TypeId::INT, Value::Int(-2000));
    Ok(Scene {
        heap,
        roots: vec![TypedValue::new(
            test,
            Value::Struct(vec![
                Value::Int(1000),
                Value::Int(-2000),
                Value::Int(-2000),
                Value::Struct(vec![
                    Value::ptr(Place::slot(second)),
                    Value::ptr(Place::slot(third)),
                ]),
            ]),
        )],
    })
}

fn deep_pointers() -> Result<Scene, HeapError> {
    let mut heap = Heap::new();
    let int_ptr = heap.types_mut().pointer(TypeId::INT);
    let int_ptr_ptr = heap.types_mut().pointer(int_ptr);
    let container = heap.types_mut().struct_type(
        "main.PtrContainer",
        vec![
            Field::public("Name", TypeId::STRING),
            Field::public("IntPtr", int_ptr),
        ],
    );
    let outer = heap.types_mut().anonymous_struct(vec![
        Field::public("DeepPtr", int_ptr_ptr),
        Field::public("Container", container),
    ]);
    let shared = heap.alloc(TypeId::INT, Value::Int(666));
    let p = heap.alloc(int_ptr, Value::ptr(Place::slot(shared)));
    Ok(Scene {
        heap,
        roots: vec![TypedValue::new(
            outer,
            Value::Struct(vec![
                Value::ptr(Place::slot(p)),
                Value::Struct(vec![Value::str("OurContainer"), Value::ptr(Place::slot(shared))]),
            ]),
        )],
    })
}

fn zero_sized() -> Result<Scene, HeapError> {
    let mut heap = Heap::new();
    let zst = heap.types_mut().struct_type("main.ZST", Vec::new());
    let zst_ptr = heap.types_mut().pointer(zst);
    let z1 = heap.alloc(zst, Value::Struct(Vec::new()));
    let z2 = heap.alloc(zst, Value::Struct(Vec::new()));
    Ok(Scene {
        heap,
        roots: vec![
            TypedValue::new(zst_ptr, Value::ptr(Place::slot(z1))),
            TypedValue::new(zst_ptr, Value::ptr(Place::slot(z2))),
            TypedValue::new(zst, Value::Struct(Vec::new())),
        ],
    })
}
