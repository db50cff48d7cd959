//! The assignability relation: nominal derivation, structural
//! compatibility, containers, arrays, and literals.

mod common;

use common::{class_desc, interface_desc, native_ref, optional_prop, prop};
use std::sync::Arc;
use tsr_reflect::{
    intersection_of, union_of, LiteralValue, MetadataStore, MethodDescriptor,
    ParameterDescriptor, Type, TypeDescriptor, TypeId, TypeKind, TypeRef,
};

fn boolean_literal(store: &MetadataStore, value: bool) -> Arc<Type> {
    store.wrap(TypeDescriptor {
        kind: TypeKind::LiteralType,
        name: value.to_string(),
        full_name: value.to_string(),
        literal_value: Some(LiteralValue::Boolean(value)),
        ..Default::default()
    })
}

fn method(name: &str, parameters: Vec<ParameterDescriptor>) -> MethodDescriptor {
    MethodDescriptor {
        name: name.into(),
        parameters,
        return_type: native_ref("void"),
        ..Default::default()
    }
}

fn param(name: &str, ty: TypeRef) -> ParameterDescriptor {
    ParameterDescriptor {
        name: name.into(),
        ty,
        ..Default::default()
    }
}

/// Animal (id 1) <- Dog (id 2); Cat (id 3) is unrelated and has an extra
/// member so it is not structurally interchangeable with Dog.
fn animal_fixture(store: &MetadataStore) {
    store.set(
        TypeId(1),
        class_desc("Animal", vec![prop("name", native_ref("string"))]),
    );
    let mut dog = class_desc(
        "Dog",
        vec![
            prop("name", native_ref("string")),
            prop("breed", native_ref("string")),
        ],
    );
    dog.base_type = Some(TypeRef::Id(TypeId(1)));
    store.set(TypeId(2), dog);
    store.set(
        TypeId(3),
        class_desc(
            "Cat",
            vec![
                prop("name", native_ref("string")),
                prop("lives", native_ref("number")),
            ],
        ),
    );
}

#[test]
fn test_any_is_assignable_in_both_directions() {
    let store = MetadataStore::new();
    let any = store.natives().any();
    let number = store.natives().number();
    assert!(any.is_assignable_to(&number));
    assert!(number.is_assignable_to(&any));
}

#[test]
fn test_distinct_primitives_are_not_assignable() {
    let store = MetadataStore::new();
    assert!(!store.natives().string().is_assignable_to(&store.natives().number()));
    assert!(store.natives().string().is_assignable_to(&store.natives().string()));
}

#[test]
fn test_boolean_literals_are_assignable_to_boolean() {
    let store = MetadataStore::new();
    let boolean = store.natives().boolean();
    assert!(boolean_literal(&store, true).is_assignable_to(&boolean));
    assert!(boolean_literal(&store, false).is_assignable_to(&boolean));
    assert!(!boolean_literal(&store, true).is_assignable_to(&store.natives().number()));
}

#[test]
fn test_derivation_through_base_chain() {
    let store = MetadataStore::new();
    animal_fixture(&store);
    let animal = store.get(TypeId(1)).unwrap();
    let dog = store.get(TypeId(2)).unwrap();
    assert!(dog.is_derived_from(&animal));
    assert!(dog.is_assignable_to(&animal));
    assert!(!animal.is_derived_from(&dog));
    assert!(dog.is_subclass_of(&animal));
    assert!(!dog.is_subclass_of(&dog));
}

#[test]
fn test_derivation_through_implemented_interface() {
    let store = MetadataStore::new();
    store.set(
        TypeId(1),
        interface_desc("Named", vec![prop("name", native_ref("string"))]),
    );
    let mut badge = class_desc("Badge", vec![prop("name", native_ref("string"))]);
    badge.interface = Some(TypeRef::Id(TypeId(1)));
    store.set(TypeId(2), badge);

    let named = store.get(TypeId(1)).unwrap();
    let badge = store.get(TypeId(2)).unwrap();
    assert!(badge.is_derived_from(&named));
}

#[test]
fn test_structural_subsumption_is_directional() {
    let store = MetadataStore::new();
    store.set(
        TypeId(1),
        class_desc(
            "Person",
            vec![
                prop("name", native_ref("string")),
                prop("age", native_ref("number")),
            ],
        ),
    );
    store.set(
        TypeId(2),
        interface_desc("Named", vec![prop("name", native_ref("string"))]),
    );
    let person = store.get(TypeId(1)).unwrap();
    let named = store.get(TypeId(2)).unwrap();
    // The wider shape satisfies the narrower one, not the other way around.
    assert!(person.is_structurally_assignable_to(&named));
    assert!(person.is_assignable_to(&named));
    assert!(!named.is_structurally_assignable_to(&person));
    assert!(!named.is_assignable_to(&person));
}

#[test]
fn test_optional_target_members_may_be_missing() {
    let store = MetadataStore::new();
    store.set(TypeId(1), class_desc("Bare", vec![prop("a", native_ref("string"))]));
    store.set(
        TypeId(2),
        interface_desc(
            "WithExtras",
            vec![
                prop("a", native_ref("string")),
                optional_prop("b", native_ref("number")),
            ],
        ),
    );
    let bare = store.get(TypeId(1)).unwrap();
    let with_extras = store.get(TypeId(2)).unwrap();
    assert!(bare.is_assignable_to(&with_extras));
}

#[test]
fn test_optional_target_method_may_be_missing() {
    let store = MetadataStore::new();
    store.set(TypeId(1), interface_desc("Empty", vec![]));
    let mut target = interface_desc("MaybeCallable", vec![]);
    let mut maybe = method("ping", vec![]);
    maybe.optional = true;
    target.methods = vec![maybe];
    store.set(TypeId(2), target);

    let empty = store.get(TypeId(1)).unwrap();
    let maybe_callable = store.get(TypeId(2)).unwrap();
    assert!(empty.is_assignable_to(&maybe_callable));
}

#[test]
fn test_union_target_requires_some_constituent() {
    let store = MetadataStore::new();
    let string_or_number = union_of(
        &store,
        [store.natives().string(), store.natives().number()],
    );
    assert!(store.natives().string().is_assignable_to(&string_or_number));
    assert!(store.natives().number().is_assignable_to(&string_or_number));
    assert!(!store.natives().boolean().is_assignable_to(&string_or_number));
}

#[test]
fn test_container_source_against_plain_target() {
    let store = MetadataStore::new();
    store.set(TypeId(1), interface_desc("HasA", vec![prop("a", native_ref("string"))]));
    store.set(TypeId(2), interface_desc("HasB", vec![prop("b", native_ref("number"))]));
    let has_a = store.get(TypeId(1)).unwrap();
    let has_b = store.get(TypeId(2)).unwrap();
    let both = intersection_of(&store, [has_a.clone(), has_b.clone()]);
    // Some constituent of the intersection satisfies each plain target.
    assert!(both.is_assignable_to(&has_a));
    assert!(both.is_assignable_to(&has_b));
}

#[test]
fn test_intersection_target_requires_all_constituents() {
    let store = MetadataStore::new();
    store.set(TypeId(1), interface_desc("HasA", vec![prop("a", native_ref("string"))]));
    store.set(TypeId(2), interface_desc("HasB", vec![prop("b", native_ref("number"))]));
    store.set(
        TypeId(3),
        class_desc(
            "Full",
            vec![prop("a", native_ref("string")), prop("b", native_ref("number"))],
        ),
    );
    let has_a = store.get(TypeId(1)).unwrap();
    let has_b = store.get(TypeId(2)).unwrap();
    let full = store.get(TypeId(3)).unwrap();
    let both = intersection_of(&store, [has_a.clone(), has_b]);
    assert!(full.is_assignable_to(&both));
    assert!(!has_a.is_assignable_to(&both));
}

#[test]
fn test_container_to_container_uses_all_some_subsumption() {
    let store = MetadataStore::new();
    let narrow = union_of(&store, [store.natives().string(), store.natives().number()]);
    let wide = union_of(
        &store,
        [
            store.natives().number(),
            store.natives().string(),
            store.natives().boolean(),
        ],
    );
    // Constituent order does not matter; every source constituent just needs
    // some compatible target constituent.
    assert!(narrow.is_assignable_to(&wide));
    assert!(!wide.is_assignable_to(&narrow));
}

#[test]
fn test_union_and_intersection_do_not_mix() {
    let store = MetadataStore::new();
    store.set(TypeId(1), interface_desc("HasA", vec![prop("a", native_ref("string"))]));
    store.set(TypeId(2), interface_desc("HasB", vec![prop("b", native_ref("number"))]));
    let has_a = store.get(TypeId(1)).unwrap();
    let has_b = store.get(TypeId(2)).unwrap();
    let union = union_of(&store, [has_a.clone(), has_b.clone()]);
    let intersection = intersection_of(&store, [has_a, has_b]);
    assert!(!union.is_assignable_to(&intersection));
}

#[test]
fn test_array_elements_compare_covariantly() {
    let store = MetadataStore::new();
    animal_fixture(&store);
    let builder = store.builder();
    let dogs = builder.array(store.get(TypeId(2)).unwrap());
    let animals = builder.array(store.get(TypeId(1)).unwrap());
    let cats = builder.array(store.get(TypeId(3)).unwrap());
    assert!(dogs.is_assignable_to(&animals));
    assert!(!animals.is_assignable_to(&cats));
}

#[test]
fn test_array_ness_must_match() {
    let store = MetadataStore::new();
    animal_fixture(&store);
    let animal = store.get(TypeId(1)).unwrap();
    let animals = store.builder().array(animal.clone());
    assert!(!animals.is_assignable_to(&animal));
    assert!(!animal.is_assignable_to(&animals));
}

#[test]
fn test_method_parameters_compare_covariantly() {
    let store = MetadataStore::new();
    animal_fixture(&store);
    let mut narrow = interface_desc("FeedsDogs", vec![]);
    narrow.methods = vec![method("feed", vec![param("animal", TypeRef::Id(TypeId(2)))])];
    store.set(TypeId(10), narrow);
    let mut wide = interface_desc("FeedsAnimals", vec![]);
    wide.methods = vec![method("feed", vec![param("animal", TypeRef::Id(TypeId(1)))])];
    store.set(TypeId(11), wide);

    let feeds_dogs = store.get(TypeId(10)).unwrap();
    let feeds_animals = store.get(TypeId(11)).unwrap();
    // Parameters compare in the same direction as properties, so the
    // narrower parameter satisfies the wider one.
    assert!(feeds_dogs.is_assignable_to(&feeds_animals));
    assert!(!feeds_animals.is_assignable_to(&feeds_dogs));
}

#[test]
fn test_unbound_trailing_parameters_must_be_droppable() {
    let store = MetadataStore::new();
    let mut short = interface_desc("Short", vec![]);
    short.methods = vec![method("run", vec![])];
    store.set(TypeId(1), short);

    let mut lenient = interface_desc("Lenient", vec![]);
    let mut opt = param("extra", native_ref("string"));
    opt.optional = true;
    lenient.methods = vec![method("run", vec![opt])];
    store.set(TypeId(2), lenient);

    let mut strict = interface_desc("Strict", vec![]);
    strict.methods = vec![method("run", vec![param("extra", native_ref("string"))])];
    store.set(TypeId(3), strict);

    let mut variadic = interface_desc("Variadic", vec![]);
    let mut rest = param("rest", native_ref("string"));
    rest.rest = true;
    variadic.methods = vec![method("run", vec![rest])];
    store.set(TypeId(4), variadic);

    let short = store.get(TypeId(1)).unwrap();
    assert!(short.is_assignable_to(&store.get(TypeId(2)).unwrap()));
    assert!(!short.is_assignable_to(&store.get(TypeId(3)).unwrap()));
    assert!(short.is_assignable_to(&store.get(TypeId(4)).unwrap()));
}
