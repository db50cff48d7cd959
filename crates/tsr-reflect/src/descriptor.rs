//! Type descriptors: the inert, serializable records handed to the store.
//!
//! Descriptors are produced by an external extraction phase that walks a
//! compiler's type-checker output. They are pure data: every relationship to
//! another type is expressed either as a numeric [`TypeId`] or as an inline
//! nested descriptor, never as a pointer into the realized graph. The store
//! turns a descriptor into a [`Type`](crate::Type) exactly once; after that
//! the descriptor plays no further role.
//!
//! All descriptor records deserialize with `#[serde(default)]` so that sparse
//! extractor output parses without error; missing fields degrade to the
//! Unknown type or empty collections when the type is realized.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Extractor-assigned identifier for a reflected type.
///
/// Ids are only meaningful within one metadata store. `TypeId::INVALID`
/// is never registered; lazy references to it resolve to the Unknown type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Sentinel for "no id". Never present in a store.
    pub const INVALID: Self = Self(0);

    /// Check whether this id can ever name a registered type.
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of a reflected type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// Interface declaration.
    Interface,
    /// Class declaration.
    Class,
    /// Built-in type (primitives and well-known globals).
    Native,
    /// Union or intersection wrapper; exactly one of the two flags is set.
    Container,
    /// Reference to a generic type instantiated with type arguments.
    TransientTypeReference,
    /// Anonymous object/structural type.
    Object,
    /// Literal type ("abc", 42, true, ...).
    LiteralType,
    /// Tuple type.
    Tuple,
    /// Generic type parameter.
    TypeParameter,
    /// Conditional type (extends/true/false parts).
    ConditionalType,
    /// Indexed access type (object/index parts).
    IndexedAccess,
    /// Module/namespace.
    Module,
    /// Method type.
    Method,
    /// Enum declaration.
    Enum,
    /// Function type.
    Function,
}

impl Default for TypeKind {
    fn default() -> Self {
        TypeKind::Object
    }
}

/// Reference to another type inside a descriptor: either the numeric id of a
/// separately registered type, or a nested descriptor embedded at the use
/// site (used for anonymous/structural types the extractor never registers).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    /// Numeric id, resolved against the store on first access.
    Id(TypeId),
    /// Inline descriptor, wrapped on first access.
    Inline(Box<TypeDescriptor>),
}

impl Default for TypeRef {
    fn default() -> Self {
        TypeRef::Id(TypeId::INVALID)
    }
}

/// Value of a literal type or a decorator argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Number(f64),
    String(String),
    /// Bigint literals carry their digits as a string to survive JSON.
    BigInt { bigint: String },
}

/// Property/method access level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessModifier {
    Private,
    Protected,
    Public,
}

impl Default for AccessModifier {
    fn default() -> Self {
        AccessModifier::Public
    }
}

/// Whether a property is backed by a getter or setter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessor {
    None,
    Getter,
    Setter,
}

impl Default for Accessor {
    fn default() -> Self {
        Accessor::None
    }
}

/// Property member of a type.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub optional: bool,
    pub readonly: bool,
    pub access_modifier: AccessModifier,
    pub accessor: Accessor,
}

/// Parameter of a method, constructor, or call signature.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub optional: bool,
    pub rest: bool,
}

/// Method member of a type.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MethodDescriptor {
    pub name: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: TypeRef,
    pub optional: bool,
    pub type_parameters: Vec<TypeRef>,
}

/// Constructor member of a class.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConstructorDescriptor {
    pub parameters: Vec<ParameterDescriptor>,
}

/// Index signature of a type.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexDescriptor {
    pub key_type: TypeRef,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub readonly: bool,
}

/// Decorator (annotation) attached to a type.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecoratorDescriptor {
    pub name: String,
    pub full_name: String,
    /// Literal arguments the decorator was applied with.
    pub args: Vec<LiteralValue>,
}

/// Call signature of a function type.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignatureDescriptor {
    pub type_parameters: Vec<TypeRef>,
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: TypeRef,
}

/// The extends/true/false parts of a conditional type.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionDescriptor {
    pub extends: TypeRef,
    pub true_type: TypeRef,
    pub false_type: TypeRef,
}

/// The object/index parts of an indexed access type.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexedAccessDescriptor {
    pub object_type: TypeRef,
    pub index_type: TypeRef,
}

/// Opaque handle to a class's runtime constructor, supplied by the embedding
/// runtime. The reflection core never looks inside it.
pub type ClassHandle = Arc<dyn Any + Send + Sync>;

/// Future returned by a constructor resolver.
pub type CtorFuture = Pin<Box<dyn Future<Output = Option<ClassHandle>> + Send>>;

/// Deferred resolver for a class's constructor function.
///
/// The implementation behind a class may live in a separately loaded module,
/// so resolution is asynchronous. This is a leaf operation: resolving a
/// constructor never re-enters the type graph.
#[derive(Clone)]
pub struct CtorResolver(Arc<dyn Fn() -> CtorFuture + Send + Sync>);

impl CtorResolver {
    pub fn new<F>(resolver: F) -> Self
    where
        F: Fn() -> CtorFuture + Send + Sync + 'static,
    {
        CtorResolver(Arc::new(resolver))
    }

    /// Invoke the resolver, producing a future for the constructor handle.
    pub fn call(&self) -> CtorFuture {
        (self.0)()
    }
}

impl fmt::Debug for CtorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CtorResolver(..)")
    }
}

/// Flat, serializable record describing one reflected type.
///
/// Every field is optional in the serialized form; a descriptor carrying only
/// `kind` and names is valid and realizes to a type with empty collections.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub kind: TypeKind,
    pub name: String,
    /// Globally unique, identity-significant name. Empty means "no identity"
    /// (the Unknown type never equals anything, including itself).
    pub full_name: String,
    pub properties: Vec<PropertyDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    pub constructors: Vec<ConstructorDescriptor>,
    pub indexes: Vec<IndexDescriptor>,
    pub decorators: Vec<DecoratorDescriptor>,
    pub type_parameters: Vec<TypeRef>,
    /// Exactly one of `union`/`intersection` is set for Container kinds.
    pub union: bool,
    pub intersection: bool,
    /// Constituents for containers and enums, in declaration order.
    pub types: Vec<TypeRef>,
    pub base_type: Option<TypeRef>,
    /// The single implemented interface; the model does not represent more.
    pub interface: Option<TypeRef>,
    pub literal_value: Option<LiteralValue>,
    /// Type arguments of a generic instantiation.
    pub type_arguments: Vec<TypeRef>,
    pub condition: Option<ConditionDescriptor>,
    pub indexed_access: Option<IndexedAccessDescriptor>,
    pub signatures: Vec<SignatureDescriptor>,
    /// Generic type parameter constraint.
    pub constraint: Option<TypeRef>,
    /// Generic type parameter default.
    pub default: Option<TypeRef>,
    /// The generic definition a transient reference instantiates.
    pub definition: Option<TypeRef>,
    pub is_generic: bool,
    /// Constructor resolver for class kinds. Not serialized; the embedding
    /// runtime attaches it after deserialization.
    #[serde(skip)]
    pub ctor: Option<CtorResolver>,
}

impl TypeDescriptor {
    /// Parse a descriptor from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize this descriptor to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
