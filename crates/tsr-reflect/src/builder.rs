//! Runtime constructors for dynamic types.
//!
//! Reflecting a plain runtime value needs types no descriptor ever
//! described: ad-hoc arrays, unions, intersections, object literals, and
//! function shapes. Builders produce them against a store so that the
//! container collapse laws hold by construction:
//!
//! - zero constituents → the Undefined native
//! - exactly one constituent → that type, returned as-is (a one-element
//!   container is never materialized)
//! - an intersection with any primitive constituent → the Never native
//!
//! Built types get a synthetic, process-unique full name, so structurally
//! identical dynamic types stay distinguishable unless a caller reuses one.

use crate::descriptor::TypeKind;
use crate::lazy::LazyTypeRef;
use crate::member::{MemberFlags, Parameter, Property, Signature};
use crate::store::MetadataStore;
use crate::ty::Type;
use smallvec::SmallVec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::trace;
use tsr_common::interner;
use tsr_common::Atom;

static NEXT_DYNAMIC_ID: AtomicU64 = AtomicU64::new(1);

/// Monotonic counter plus timestamp keeps dynamic names unique within a
/// process and unlikely to collide across serialized fixtures.
fn synthetic_full_name(prefix: &str) -> Atom {
    let counter = NEXT_DYNAMIC_ID.fetch_add(1, Ordering::Relaxed);
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    interner::intern(&format!("@dynamic/{prefix}#{counter}@{millis}"))
}

/// Entry point for building dynamic types against one store.
pub struct TypeBuilder {
    store: MetadataStore,
}

impl MetadataStore {
    /// A builder producing dynamic types owned by this store.
    pub fn builder(&self) -> TypeBuilder {
        TypeBuilder::new(self)
    }
}

impl TypeBuilder {
    pub fn new(store: &MetadataStore) -> Self {
        TypeBuilder {
            store: store.clone(),
        }
    }

    /// An `Array<element>` type.
    pub fn array(&self, element: Arc<Type>) -> Arc<Type> {
        let name = interner::intern("Array");
        let mut ty = Type::empty(
            TypeKind::Native,
            name,
            synthetic_full_name("Array"),
            self.store.downgrade(),
        );
        ty.type_arguments = vec![LazyTypeRef::from_type(element)];
        Arc::new(ty)
    }

    pub fn union(&self) -> ContainerTypeBuilder {
        ContainerTypeBuilder {
            store: self.store.clone(),
            union: true,
            types: SmallVec::new(),
        }
    }

    pub fn intersection(&self) -> ContainerTypeBuilder {
        ContainerTypeBuilder {
            store: self.store.clone(),
            union: false,
            types: SmallVec::new(),
        }
    }

    pub fn object(&self) -> ObjectTypeBuilder {
        ObjectTypeBuilder {
            store: self.store.clone(),
            properties: Vec::new(),
        }
    }

    pub fn function(&self) -> FunctionTypeBuilder {
        FunctionTypeBuilder {
            store: self.store.clone(),
            parameters: Vec::new(),
            return_type: None,
        }
    }
}

/// Builder for union and intersection types.
pub struct ContainerTypeBuilder {
    store: MetadataStore,
    union: bool,
    types: SmallVec<[Arc<Type>; 4]>,
}

impl ContainerTypeBuilder {
    /// Add a constituent. Adding the same instance twice is a no-op.
    pub fn add(mut self, ty: Arc<Type>) -> Self {
        if !self.types.iter().any(|existing| Arc::ptr_eq(existing, &ty)) {
            self.types.push(ty);
        }
        self
    }

    pub fn extend<I: IntoIterator<Item = Arc<Type>>>(mut self, types: I) -> Self {
        for ty in types {
            self = self.add(ty);
        }
        self
    }

    /// Apply the collapse laws and produce the container.
    pub fn build(&self) -> Arc<Type> {
        let natives = self.store.natives();
        match self.types.len() {
            0 => natives.undefined(),
            1 => self.types[0].clone(),
            _ => {
                if !self.union && self.types.iter().any(|t| t.is_primitive()) {
                    // A primitive intersected with anything else is
                    // uninhabited.
                    return natives.never();
                }
                let (name, prefix) = if self.union {
                    ("Union", "union")
                } else {
                    ("Intersection", "intersection")
                };
                trace!(
                    constituents = self.types.len(),
                    union = self.union,
                    "ContainerTypeBuilder::build"
                );
                let mut ty = Type::empty(
                    TypeKind::Container,
                    interner::intern(name),
                    synthetic_full_name(prefix),
                    self.store.downgrade(),
                );
                ty.union = self.union;
                ty.intersection = !self.union;
                ty.types = self
                    .types
                    .iter()
                    .map(|t| LazyTypeRef::from_type(t.clone()))
                    .collect();
                Arc::new(ty)
            }
        }
    }
}

/// Builder for anonymous object-literal types.
pub struct ObjectTypeBuilder {
    store: MetadataStore,
    properties: Vec<Property>,
}

impl ObjectTypeBuilder {
    pub fn add_property(mut self, name: &str, ty: Arc<Type>, flags: MemberFlags) -> Self {
        self.properties.push(Property {
            name: interner::intern(name),
            ty: LazyTypeRef::from_type(ty),
            flags,
            access_modifier: Default::default(),
            accessor: Default::default(),
        });
        self
    }

    pub fn build(&self) -> Arc<Type> {
        let mut ty = Type::empty(
            TypeKind::Object,
            interner::intern("Object"),
            synthetic_full_name("object"),
            self.store.downgrade(),
        );
        ty.properties = self.properties.clone();
        Arc::new(ty)
    }
}

/// Builder for anonymous function types.
pub struct FunctionTypeBuilder {
    store: MetadataStore,
    parameters: Vec<Parameter>,
    return_type: Option<Arc<Type>>,
}

impl FunctionTypeBuilder {
    pub fn add_parameter(mut self, name: &str, ty: Arc<Type>, flags: MemberFlags) -> Self {
        self.parameters.push(Parameter {
            name: interner::intern(name),
            ty: LazyTypeRef::from_type(ty),
            flags,
        });
        self
    }

    pub fn returns(mut self, ty: Arc<Type>) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn build(&self) -> Arc<Type> {
        let return_type = self
            .return_type
            .clone()
            .unwrap_or_else(|| self.store.natives().get(crate::natives::IntrinsicKind::Void));
        let mut ty = Type::empty(
            TypeKind::Function,
            interner::intern("Function"),
            synthetic_full_name("function"),
            self.store.downgrade(),
        );
        ty.signatures = vec![Signature {
            type_parameters: Vec::new(),
            parameters: self.parameters.clone(),
            return_type: LazyTypeRef::from_type(return_type),
        }];
        Arc::new(ty)
    }
}

/// Union of `parts` under the collapse laws.
pub fn union_of<I: IntoIterator<Item = Arc<Type>>>(store: &MetadataStore, parts: I) -> Arc<Type> {
    store.builder().union().extend(parts).build()
}

/// Intersection of `parts` under the collapse laws.
pub fn intersection_of<I: IntoIterator<Item = Arc<Type>>>(
    store: &MetadataStore,
    parts: I,
) -> Arc<Type> {
    store.builder().intersection().extend(parts).build()
}
