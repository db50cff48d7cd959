//! Runtime model of a statically-typed language's type system.
//!
//! An external extraction phase walks a compiler's type-checker output and
//! emits flat, serializable [`TypeDescriptor`] records. This crate turns
//! those descriptors into a queryable, cycle-safe, in-memory type graph and
//! answers structural compatibility queries ("is X assignable to Y?") over
//! it.
//!
//! Key pieces:
//! - **[`MetadataStore`]**: the registry mapping numeric ids to realized
//!   types; its four operations (`get`, `get_lazy`, `set`, `wrap`) are the
//!   entire boundary with an embedding runtime.
//! - **[`LazyTypeRef`]**: deferred, memoizing pointers between nodes, which
//!   is what permits cyclic and forward references.
//! - **[`Type`]**: the realized node — predicates, relationships, member
//!   flattening, and the assignability algorithm.
//! - **[`TypeBuilder`]**: runtime constructors for dynamic types no
//!   descriptor ever described.
//!
//! # Error policy
//!
//! Data gaps (missing descriptor fields, unresolvable references, absent
//! store entries) degrade silently to the Unknown type or empty
//! collections; reflection consumers never crash because an exotic type
//! shape was not captured upstream. Constructing a `Type` outside the store
//! and builders is impossible by construction — the fields are private.

mod assignable;
pub mod builder;
pub mod descriptor;
pub mod flatten;
pub mod lazy;
pub mod member;
pub mod natives;
mod recursion;
pub mod store;
pub mod ty;

pub use builder::{
    ContainerTypeBuilder, FunctionTypeBuilder, ObjectTypeBuilder, TypeBuilder, intersection_of,
    union_of,
};
pub use descriptor::{
    AccessModifier, Accessor, ClassHandle, ConditionDescriptor, ConstructorDescriptor,
    CtorFuture, CtorResolver, DecoratorDescriptor, IndexDescriptor, IndexedAccessDescriptor,
    LiteralValue, MethodDescriptor, ParameterDescriptor, PropertyDescriptor, SignatureDescriptor,
    TypeDescriptor, TypeId, TypeKind, TypeRef,
};
pub use flatten::FlattenedMembers;
pub use lazy::LazyTypeRef;
pub use member::{
    Constructor, Decorator, EnumEntry, IndexInfo, MemberFlags, Method, Parameter, Property,
    Signature,
};
pub use natives::{IntrinsicKind, NativeTypes};
pub use store::MetadataStore;
pub use ty::{Condition, IndexedAccess, Type};
pub use tsr_common::Atom;
