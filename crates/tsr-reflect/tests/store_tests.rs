//! Store registration, lookup, and the lazy-reference contract.

mod common;

use common::{class_desc, init_tracing, native_ref, poll_ready, prop};
use std::sync::Arc;
use tsr_reflect::{
    ClassHandle, ConditionDescriptor, CtorFuture, CtorResolver, IndexedAccessDescriptor,
    LiteralValue, MetadataStore, TypeDescriptor, TypeId, TypeKind, TypeRef,
};

#[test]
fn test_get_absent_id_is_none() {
    let store = MetadataStore::new();
    assert!(store.get(TypeId(99)).is_none());
    assert!(!store.contains(TypeId(99)));
    assert!(store.is_empty());
}

#[test]
fn test_set_then_get_returns_same_instance() {
    init_tracing();
    let store = MetadataStore::new();
    let registered = store.set(TypeId(1), class_desc("Person", vec![]));
    let fetched = store.get(TypeId(1)).expect("registered");
    assert!(Arc::ptr_eq(&registered, &fetched));
    assert_eq!(store.len(), 1);
    assert_eq!(fetched.id(), Some(TypeId(1)));
}

#[test]
fn test_reset_overwrites_without_invalidating_resolved_lazies() {
    let store = MetadataStore::new();
    store.set(TypeId(1), class_desc("First", vec![]));
    let lazy = store.get_lazy(TypeId(1));
    let first = lazy.get();
    assert_eq!(first.name_str().as_ref(), "First");

    store.set(TypeId(1), class_desc("Second", vec![]));
    // The table now holds the new entry...
    assert_eq!(store.get(TypeId(1)).unwrap().name_str().as_ref(), "Second");
    // ...but the already-resolved reference keeps pointing at the old one.
    assert!(Arc::ptr_eq(&lazy.get(), &first));
}

#[test]
fn test_forward_reference_resolves_after_registration() {
    let store = MetadataStore::new();
    let lazy = store.get_lazy(TypeId(5));
    assert!(!lazy.is_resolved());

    // Before registration the reference degrades to Unknown without
    // memoizing.
    let before = lazy.get();
    assert!(before.is_unknown());
    assert!(!lazy.is_resolved());

    let registered = store.set(TypeId(5), class_desc("Late", vec![]));
    let after = lazy.get();
    assert!(Arc::ptr_eq(&after, &registered));
    assert!(lazy.is_resolved());
}

#[test]
fn test_wrap_native_returns_store_singleton() {
    let store = MetadataStore::new();
    let wrapped = store.wrap(TypeDescriptor {
        kind: TypeKind::Native,
        name: "string".into(),
        full_name: "string".into(),
        ..Default::default()
    });
    assert!(Arc::ptr_eq(&wrapped, &store.natives().string()));
}

#[test]
fn test_native_singletons_are_per_store() {
    let a = MetadataStore::new();
    let b = MetadataStore::new();
    assert_ne!(a.instance_id(), b.instance_id());
    assert!(!Arc::ptr_eq(&a.natives().string(), &b.natives().string()));
    // Name-based identity still holds across stores.
    assert!(a.natives().string().is(&b.natives().string()));
}

#[test]
fn test_unknown_never_equals_anything_including_itself() {
    let store = MetadataStore::new();
    let unknown = store.natives().unknown();
    assert!(unknown.is_unknown());
    assert!(!unknown.is(&unknown));
    assert!(!unknown.is(&store.natives().string()));
    assert!(!store.natives().string().is(&unknown));
}

#[test]
fn test_degenerate_containers_collapse_at_registration() {
    let store = MetadataStore::new();
    let empty = store.wrap(TypeDescriptor {
        kind: TypeKind::Container,
        ..Default::default()
    });
    assert!(Arc::ptr_eq(&empty, &store.natives().undefined()));

    let single = store.wrap(TypeDescriptor {
        kind: TypeKind::Container,
        union: true,
        types: vec![native_ref("number")],
        ..Default::default()
    });
    assert!(Arc::ptr_eq(&single, &store.natives().number()));
}

#[test]
fn test_enum_entries_preserve_declaration_order() {
    let store = MetadataStore::new();
    let literal = |name: &str, value: f64| {
        TypeRef::Inline(Box::new(TypeDescriptor {
            kind: TypeKind::LiteralType,
            name: name.into(),
            full_name: format!("test/Color.{name}"),
            literal_value: Some(LiteralValue::Number(value)),
            ..Default::default()
        }))
    };
    let color = store.set(
        TypeId(1),
        TypeDescriptor {
            kind: TypeKind::Enum,
            name: "Color".into(),
            full_name: "test/Color".into(),
            types: vec![literal("Red", 0.0), literal("Green", 1.0), literal("Blue", 2.0)],
            ..Default::default()
        },
    );
    assert!(color.is_enum());
    let entries = color.enum_entries();
    let names: Vec<_> = entries.iter().map(|e| e.name_str().to_string()).collect();
    assert_eq!(names, ["Red", "Green", "Blue"]);
    assert_eq!(entries[1].value(), Some(&LiteralValue::Number(1.0)));
}

#[test]
fn test_conditional_type_parts_resolve() {
    let store = MetadataStore::new();
    let cond = store.set(
        TypeId(1),
        TypeDescriptor {
            kind: TypeKind::ConditionalType,
            name: "Cond".into(),
            full_name: "test/Cond".into(),
            condition: Some(ConditionDescriptor {
                extends: native_ref("string"),
                true_type: native_ref("number"),
                false_type: native_ref("boolean"),
            }),
            ..Default::default()
        },
    );
    assert_eq!(cond.kind(), TypeKind::ConditionalType);
    let condition = cond.condition().expect("condition parts");
    assert!(condition.extends().is_string());
    assert!(condition.true_type().is_number());
    assert!(condition.false_type().is_boolean());
}

#[test]
fn test_indexed_access_parts_resolve() {
    let store = MetadataStore::new();
    store.set(
        TypeId(1),
        class_desc("Subject", vec![prop("a", native_ref("string"))]),
    );
    let access = store.set(
        TypeId(2),
        TypeDescriptor {
            kind: TypeKind::IndexedAccess,
            name: "Access".into(),
            full_name: "test/Access".into(),
            indexed_access: Some(IndexedAccessDescriptor {
                object_type: TypeRef::Id(TypeId(1)),
                index_type: native_ref("string"),
            }),
            ..Default::default()
        },
    );
    assert_eq!(access.kind(), TypeKind::IndexedAccess);
    let parts = access.indexed_access().expect("indexed-access parts");
    assert!(parts.object_type().is(&store.get(TypeId(1)).unwrap()));
    assert!(parts.index_type().is_string());
}

#[test]
fn test_tuple_descriptor_realizes() {
    let store = MetadataStore::new();
    let pair = store.set(
        TypeId(1),
        TypeDescriptor {
            kind: TypeKind::Tuple,
            name: "Pair".into(),
            full_name: "test/Pair".into(),
            type_arguments: vec![native_ref("string"), native_ref("number")],
            ..Default::default()
        },
    );
    assert!(pair.is_tuple());
    let args = pair.type_arguments();
    assert_eq!(args.len(), 2);
    assert!(args[0].is_string());
    assert!(args[1].is_number());
}

#[test]
fn test_ctor_resolver_makes_class_instantiable() {
    let store = MetadataStore::new();
    let handle: ClassHandle = Arc::new(42u32);
    let mut desc = class_desc("Widget", vec![prop("size", native_ref("number"))]);
    desc.ctor = Some(CtorResolver::new(move || -> CtorFuture {
        let handle = handle.clone();
        Box::pin(async move { Some(handle) })
    }));
    let widget = store.set(TypeId(1), desc);
    assert!(widget.is_instantiable());

    let resolved = poll_ready(widget.ctor().expect("resolver attached")).expect("handle");
    let value = resolved.downcast::<u32>().expect("u32 handle");
    assert_eq!(*value, 42);
}

#[test]
fn test_active_backend_installs_once() {
    let mine = MetadataStore::new();
    assert!(tsr_reflect::store::install_active(mine.clone()));
    assert!(!tsr_reflect::store::install_active(MetadataStore::new()));
    assert_eq!(tsr_reflect::store::active().instance_id(), mine.instance_id());

    // The process and thread backends are created once and then reused.
    let process = tsr_reflect::store::process();
    assert_eq!(process.instance_id(), tsr_reflect::store::process().instance_id());
    let thread = tsr_reflect::store::thread();
    assert_eq!(thread.instance_id(), tsr_reflect::store::thread().instance_id());
}

#[test]
fn test_class_without_resolver_is_not_instantiable() {
    let store = MetadataStore::new();
    let plain = store.set(TypeId(1), class_desc("Plain", vec![]));
    assert!(!plain.is_instantiable());
    assert!(plain.ctor().is_none());
}
