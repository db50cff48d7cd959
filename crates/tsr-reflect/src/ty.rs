//! The realized type node.
//!
//! A [`Type`] is the queryable counterpart of a descriptor: names are
//! interned, member lists are realized, and every relationship to another
//! type is a [`LazyTypeRef`] resolved on first read. Types are immutable
//! after realization and live as long as their store's table does.
//!
//! Construction happens only inside this crate — through the store
//! ([`MetadataStore::set`](crate::MetadataStore::set) /
//! [`wrap`](crate::MetadataStore::wrap)) or the builders. The fields are
//! private precisely so that embedding code cannot assemble a `Type` by
//! hand; misuse is a compile error rather than a runtime check.

use crate::builder;
use crate::descriptor::{
    ConditionDescriptor, CtorFuture, CtorResolver, IndexedAccessDescriptor, LiteralValue,
    TypeDescriptor, TypeId, TypeKind,
};
use crate::lazy::LazyTypeRef;
use crate::member::{Constructor, Decorator, EnumEntry, IndexInfo, Method, Property, Signature};
use crate::natives::IntrinsicKind;
use crate::store::{MetadataStore, StoreInner, WeakStore};
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;
use tsr_common::interner;
use tsr_common::Atom;

/// The extends/true/false parts of a conditional type.
#[derive(Clone, Debug)]
pub struct Condition {
    pub(crate) extends: LazyTypeRef,
    pub(crate) true_type: LazyTypeRef,
    pub(crate) false_type: LazyTypeRef,
}

impl Condition {
    fn realize(desc: &ConditionDescriptor, store: &WeakStore) -> Self {
        Condition {
            extends: LazyTypeRef::from_type_ref(store, &desc.extends),
            true_type: LazyTypeRef::from_type_ref(store, &desc.true_type),
            false_type: LazyTypeRef::from_type_ref(store, &desc.false_type),
        }
    }

    pub fn extends(&self) -> Arc<Type> {
        self.extends.get()
    }

    pub fn true_type(&self) -> Arc<Type> {
        self.true_type.get()
    }

    pub fn false_type(&self) -> Arc<Type> {
        self.false_type.get()
    }
}

/// The object/index parts of an indexed access type.
#[derive(Clone, Debug)]
pub struct IndexedAccess {
    pub(crate) object_type: LazyTypeRef,
    pub(crate) index_type: LazyTypeRef,
}

impl IndexedAccess {
    fn realize(desc: &IndexedAccessDescriptor, store: &WeakStore) -> Self {
        IndexedAccess {
            object_type: LazyTypeRef::from_type_ref(store, &desc.object_type),
            index_type: LazyTypeRef::from_type_ref(store, &desc.index_type),
        }
    }

    pub fn object_type(&self) -> Arc<Type> {
        self.object_type.get()
    }

    pub fn index_type(&self) -> Arc<Type> {
        self.index_type.get()
    }
}

/// A realized, queryable type graph node.
pub struct Type {
    pub(crate) kind: TypeKind,
    pub(crate) id: Option<TypeId>,
    pub(crate) name: Atom,
    pub(crate) full_name: Atom,
    /// Set only for the per-store native singletons.
    pub(crate) intrinsic: Option<IntrinsicKind>,
    pub(crate) store: WeakStore,
    pub(crate) base_type: Option<LazyTypeRef>,
    pub(crate) interface: Option<LazyTypeRef>,
    pub(crate) literal_value: Option<LiteralValue>,
    pub(crate) union: bool,
    pub(crate) intersection: bool,
    pub(crate) types: Vec<LazyTypeRef>,
    pub(crate) type_arguments: Vec<LazyTypeRef>,
    pub(crate) type_parameters: Vec<LazyTypeRef>,
    pub(crate) properties: Vec<Property>,
    pub(crate) methods: Vec<Method>,
    pub(crate) constructors: Vec<Constructor>,
    pub(crate) indexes: Vec<IndexInfo>,
    pub(crate) decorators: Vec<Decorator>,
    pub(crate) condition: Option<Condition>,
    pub(crate) indexed_access: Option<IndexedAccess>,
    pub(crate) signatures: Vec<Signature>,
    pub(crate) constraint: Option<LazyTypeRef>,
    pub(crate) default_type: Option<LazyTypeRef>,
    pub(crate) definition: Option<LazyTypeRef>,
    pub(crate) generic: bool,
    pub(crate) ctor: Option<CtorResolver>,
}

impl Type {
    /// An empty shell with the given identity; used by builders and native
    /// construction to fill in only the fields they care about.
    pub(crate) fn empty(kind: TypeKind, name: Atom, full_name: Atom, store: WeakStore) -> Type {
        Type {
            kind,
            id: None,
            name,
            full_name,
            intrinsic: None,
            store,
            base_type: None,
            interface: None,
            literal_value: None,
            union: false,
            intersection: false,
            types: Vec::new(),
            type_arguments: Vec::new(),
            type_parameters: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            indexes: Vec::new(),
            decorators: Vec::new(),
            condition: None,
            indexed_access: None,
            signatures: Vec::new(),
            constraint: None,
            default_type: None,
            definition: None,
            generic: false,
            ctor: None,
        }
    }

    /// Allocate a native singleton. Unknown gets an empty full name so that
    /// it never compares equal to anything, including itself.
    pub(crate) fn native(kind: IntrinsicKind, store: WeakStore) -> Arc<Type> {
        let name = interner::intern(kind.name());
        let full_name = if kind == IntrinsicKind::Unknown {
            Atom::NONE
        } else {
            name
        };
        let mut ty = Type::empty(TypeKind::Native, name, full_name, store);
        ty.intrinsic = Some(kind);
        Arc::new(ty)
    }

    /// Realize a descriptor into a type node.
    ///
    /// Every nested type field becomes a lazy reference; nothing is resolved
    /// here, which is what makes mutually referencing descriptors safe to
    /// register in any order.
    pub(crate) fn realize(
        desc: &TypeDescriptor,
        id: Option<TypeId>,
        store: &Arc<StoreInner>,
    ) -> Arc<Type> {
        let weak = Arc::downgrade(store);

        // Degenerate containers are collapsed at construction time: no
        // zero- or one-constituent container ever exists in the graph.
        if desc.kind == TypeKind::Container {
            match desc.types.len() {
                0 => return store.natives.undefined(),
                1 => return LazyTypeRef::from_type_ref(&weak, &desc.types[0]).get(),
                _ => {}
            }
        }

        let lazy = |r| LazyTypeRef::from_type_ref(&weak, r);
        let lazy_list =
            |refs: &Vec<_>| refs.iter().map(|r| LazyTypeRef::from_type_ref(&weak, r)).collect();

        // Exactly one of the container flags holds. Malformed flag
        // combinations degrade to a union rather than failing.
        let (union, intersection) = if desc.kind == TypeKind::Container {
            (!desc.intersection, desc.intersection)
        } else {
            (false, false)
        };

        Arc::new(Type {
            kind: desc.kind,
            id,
            name: interner::intern(&desc.name),
            full_name: interner::intern(&desc.full_name),
            intrinsic: None,
            union,
            intersection,
            base_type: desc.base_type.as_ref().map(lazy),
            interface: desc.interface.as_ref().map(lazy),
            literal_value: desc.literal_value.clone(),
            types: lazy_list(&desc.types),
            type_arguments: lazy_list(&desc.type_arguments),
            type_parameters: lazy_list(&desc.type_parameters),
            properties: desc
                .properties
                .iter()
                .map(|p| Property::realize(p, &weak))
                .collect(),
            methods: desc.methods.iter().map(|m| Method::realize(m, &weak)).collect(),
            constructors: desc
                .constructors
                .iter()
                .map(|c| Constructor::realize(c, &weak))
                .collect(),
            indexes: desc.indexes.iter().map(|i| IndexInfo::realize(i, &weak)).collect(),
            decorators: desc.decorators.iter().map(Decorator::realize).collect(),
            condition: desc.condition.as_ref().map(|c| Condition::realize(c, &weak)),
            indexed_access: desc
                .indexed_access
                .as_ref()
                .map(|i| IndexedAccess::realize(i, &weak)),
            signatures: desc
                .signatures
                .iter()
                .map(|s| Signature::realize(s, &weak))
                .collect(),
            constraint: desc.constraint.as_ref().map(lazy),
            default_type: desc.default.as_ref().map(lazy),
            definition: desc.definition.as_ref().map(lazy),
            generic: desc.is_generic,
            ctor: desc.ctor.clone(),
            store: weak,
        })
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    /// The kind of this type.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The id this type was registered under, if any.
    pub fn id(&self) -> Option<TypeId> {
        self.id
    }

    pub fn name(&self) -> Atom {
        self.name
    }

    pub fn name_str(&self) -> Arc<str> {
        interner::resolve(self.name)
    }

    /// The globally unique, identity-significant name. [`Atom::NONE`] means
    /// this type has no identity (the Unknown type).
    pub fn full_name(&self) -> Atom {
        self.full_name
    }

    pub fn full_name_str(&self) -> Arc<str> {
        interner::resolve(self.full_name)
    }

    /// Identity comparison by full name.
    ///
    /// Always false when either side has an empty full name, which excludes
    /// Unknown from ever equaling anything — including itself.
    pub fn is(&self, other: &Type) -> bool {
        !self.full_name.is_none() && !other.full_name.is_none() && self.full_name == other.full_name
    }

    // -----------------------------------------------------------------------
    // Predicates
    // -----------------------------------------------------------------------

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_native(&self) -> bool {
        self.kind == TypeKind::Native
    }

    /// Whether this is one of the primitive native singletons.
    pub fn is_primitive(&self) -> bool {
        self.intrinsic.is_some_and(IntrinsicKind::is_primitive)
    }

    pub fn is_string(&self) -> bool {
        self.intrinsic == Some(IntrinsicKind::String)
    }

    pub fn is_number(&self) -> bool {
        self.intrinsic == Some(IntrinsicKind::Number)
    }

    pub fn is_boolean(&self) -> bool {
        self.intrinsic == Some(IntrinsicKind::Boolean)
    }

    pub fn is_any(&self) -> bool {
        self.intrinsic == Some(IntrinsicKind::Any)
    }

    pub fn is_unknown(&self) -> bool {
        self.intrinsic == Some(IntrinsicKind::Unknown)
    }

    pub fn is_undefined(&self) -> bool {
        self.intrinsic == Some(IntrinsicKind::Undefined)
    }

    pub fn is_null(&self) -> bool {
        self.intrinsic == Some(IntrinsicKind::Null)
    }

    pub fn is_never(&self) -> bool {
        self.intrinsic == Some(IntrinsicKind::Never)
    }

    /// Whether this is an array type (`Array` or `ReadonlyArray`).
    pub fn is_array(&self) -> bool {
        let name = self.name_str();
        name.as_ref() == "Array" || name.as_ref() == "ReadonlyArray"
    }

    pub fn is_promise(&self) -> bool {
        self.name_str().as_ref() == "Promise"
    }

    pub fn is_tuple(&self) -> bool {
        self.kind == TypeKind::Tuple
    }

    /// The `true` literal type.
    pub fn is_true(&self) -> bool {
        self.kind == TypeKind::LiteralType
            && self.literal_value == Some(LiteralValue::Boolean(true))
    }

    /// The `false` literal type.
    pub fn is_false(&self) -> bool {
        self.kind == TypeKind::LiteralType
            && self.literal_value == Some(LiteralValue::Boolean(false))
    }

    /// Object-like types are the domain of structural assignability.
    pub fn is_object_like(&self) -> bool {
        self.is_interface() || self.is_class() || self.kind == TypeKind::Object
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    pub fn is_generic_type(&self) -> bool {
        self.generic
    }

    pub fn is_union(&self) -> bool {
        self.union
    }

    pub fn is_intersection(&self) -> bool {
        self.intersection
    }

    pub fn is_union_or_intersection(&self) -> bool {
        self.union || self.intersection
    }

    /// Whether a runtime constructor can be obtained for this type.
    pub fn is_instantiable(&self) -> bool {
        self.is_class() && self.ctor.is_some()
    }

    pub fn is_literal(&self) -> bool {
        self.kind == TypeKind::LiteralType
    }

    // -----------------------------------------------------------------------
    // Relationships and members
    // -----------------------------------------------------------------------

    /// The base type.
    ///
    /// Defaults to the root Object native unless this *is* that root or a
    /// bare native with no members.
    pub fn base_type(&self) -> Option<Arc<Type>> {
        if let Some(base) = &self.base_type {
            return Some(base.get());
        }
        if self.intrinsic == Some(IntrinsicKind::Object) {
            return None;
        }
        if self.is_native() && self.properties.is_empty() && self.methods.is_empty() {
            return None;
        }
        self.store.upgrade().map(|inner| inner.natives.object())
    }

    /// The single implemented interface, if any.
    pub fn interface(&self) -> Option<Arc<Type>> {
        self.interface.as_ref().map(LazyTypeRef::get)
    }

    /// Constituent types (containers and enums), in declaration order.
    pub fn types(&self) -> Vec<Arc<Type>> {
        self.types.iter().map(LazyTypeRef::get).collect()
    }

    pub fn type_arguments(&self) -> Vec<Arc<Type>> {
        self.type_arguments.iter().map(LazyTypeRef::get).collect()
    }

    pub fn type_parameters(&self) -> Vec<Arc<Type>> {
        self.type_parameters.iter().map(LazyTypeRef::get).collect()
    }

    pub fn properties(&self) -> Vec<Property> {
        self.properties.clone()
    }

    pub fn methods(&self) -> Vec<Method> {
        self.methods.clone()
    }

    pub fn constructors(&self) -> Vec<Constructor> {
        self.constructors.clone()
    }

    pub fn indexes(&self) -> Vec<IndexInfo> {
        self.indexes.clone()
    }

    pub fn decorators(&self) -> Vec<Decorator> {
        self.decorators.clone()
    }

    pub fn literal_value(&self) -> Option<&LiteralValue> {
        self.literal_value.as_ref()
    }

    pub fn condition(&self) -> Option<Condition> {
        self.condition.clone()
    }

    pub fn indexed_access(&self) -> Option<IndexedAccess> {
        self.indexed_access.clone()
    }

    pub fn signatures(&self) -> Vec<Signature> {
        self.signatures.clone()
    }

    /// Generic type parameter constraint.
    pub fn constraint(&self) -> Option<Arc<Type>> {
        self.constraint.as_ref().map(LazyTypeRef::get)
    }

    /// Generic type parameter default.
    pub fn default_type(&self) -> Option<Arc<Type>> {
        self.default_type.as_ref().map(LazyTypeRef::get)
    }

    /// The generic definition a transient reference instantiates.
    pub fn definition(&self) -> Option<Arc<Type>> {
        self.definition.as_ref().map(LazyTypeRef::get)
    }

    /// Enum entries, in the order the constituent literal types were
    /// declared.
    pub fn enum_entries(&self) -> Vec<EnumEntry> {
        self.types
            .iter()
            .map(|lazy| {
                let constituent = lazy.get();
                EnumEntry {
                    name: constituent.name,
                    value: constituent.literal_value.clone(),
                }
            })
            .collect()
    }

    /// Resolve this class's runtime constructor.
    ///
    /// This is the one asynchronous leaf of the model: the implementation
    /// may live in a separately loaded module. Resolution never re-enters
    /// the type graph.
    pub fn ctor(&self) -> Option<CtorFuture> {
        self.ctor.as_ref().map(CtorResolver::call)
    }

    /// This type with Null and Undefined stripped from its union
    /// constituents; non-unions are returned unchanged.
    pub fn non_nullable(self: &Arc<Self>) -> Arc<Type> {
        if !self.is_union() {
            return self.clone();
        }
        let parts: Vec<Arc<Type>> = self
            .types()
            .into_iter()
            .filter(|t| !t.is_null() && !t.is_undefined())
            .collect();
        if parts.len() == self.types.len() {
            return self.clone();
        }
        match self.store.upgrade() {
            Some(inner) => builder::union_of(&MetadataStore::from_inner(inner), parts),
            None => self.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Inheritance walks
    // -----------------------------------------------------------------------

    /// Whether this type's base-type chain passes through `target`.
    ///
    /// `target` must be a class; anything else returns false rather than
    /// failing. The receiver itself does not count as its own subclass.
    pub fn is_subclass_of(&self, target: &Type) -> bool {
        if !target.is_class() {
            return false;
        }
        let mut seen: FxHashSet<usize> = FxHashSet::default();
        let mut current = self.base_type();
        while let Some(base) = current {
            if base.is(target) {
                return true;
            }
            // A cyclic base chain in malformed data must not loop forever.
            // The guard keys on node identity since anonymous types have no
            // full name.
            if !seen.insert(Arc::as_ptr(&base) as usize) {
                return false;
            }
            current = base.base_type();
        }
        false
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.full_name.is_none() {
            self.name_str()
        } else {
            self.full_name_str()
        };
        f.write_str(&name)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("kind", &self.kind)
            .field("name", &self.name_str())
            .field("full_name", &self.full_name_str())
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
