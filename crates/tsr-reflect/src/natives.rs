//! Native singleton types.
//!
//! A small fixed set of built-in types exists exactly once per store. The
//! predicates on [`Type`](crate::Type) and the assignability rules compare
//! against these specific instances, so they are allocated by the store
//! during construction and tagged with an [`IntrinsicKind`] that nothing
//! outside this crate can set.

use crate::store::WeakStore;
use crate::ty::Type;
use once_cell::sync::Lazy;
use std::sync::{Arc, Weak};

/// The built-in singleton kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    /// The root Object type; default base of everything object-like.
    Object,
    Unknown,
    Any,
    Void,
    String,
    Number,
    BigInt,
    Boolean,
    Date,
    Null,
    Undefined,
    Never,
}

impl IntrinsicKind {
    /// The canonical name of this native type.
    pub const fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Object => "Object",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Any => "any",
            IntrinsicKind::Void => "void",
            IntrinsicKind::String => "string",
            IntrinsicKind::Number => "number",
            IntrinsicKind::BigInt => "bigint",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Date => "Date",
            IntrinsicKind::Null => "null",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Never => "never",
        }
    }

    /// Recognize a native type name from extractor output. Extractors differ
    /// on capitalization of primitive names, so both forms are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Object" | "object" => Some(IntrinsicKind::Object),
            "unknown" | "Unknown" => Some(IntrinsicKind::Unknown),
            "any" | "Any" => Some(IntrinsicKind::Any),
            "void" | "Void" => Some(IntrinsicKind::Void),
            "string" | "String" => Some(IntrinsicKind::String),
            "number" | "Number" => Some(IntrinsicKind::Number),
            "bigint" | "BigInt" => Some(IntrinsicKind::BigInt),
            "boolean" | "Boolean" => Some(IntrinsicKind::Boolean),
            "Date" => Some(IntrinsicKind::Date),
            "null" | "Null" => Some(IntrinsicKind::Null),
            "undefined" | "Undefined" => Some(IntrinsicKind::Undefined),
            "never" | "Never" => Some(IntrinsicKind::Never),
            _ => None,
        }
    }

    /// Whether this native counts as a primitive for intersection collapse.
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            IntrinsicKind::Void
                | IntrinsicKind::String
                | IntrinsicKind::Number
                | IntrinsicKind::BigInt
                | IntrinsicKind::Boolean
                | IntrinsicKind::Null
                | IntrinsicKind::Undefined
                | IntrinsicKind::Never
        )
    }
}

/// The per-store set of native singletons.
///
/// Referential uniqueness of these instances is what identity-sensitive
/// logic relies on; mixing natives from two different stores is unsupported.
pub struct NativeTypes {
    object: Arc<Type>,
    unknown: Arc<Type>,
    any: Arc<Type>,
    void_type: Arc<Type>,
    string: Arc<Type>,
    number: Arc<Type>,
    bigint: Arc<Type>,
    boolean: Arc<Type>,
    date: Arc<Type>,
    null: Arc<Type>,
    undefined: Arc<Type>,
    never: Arc<Type>,
}

impl NativeTypes {
    pub(crate) fn new(store: WeakStore) -> Self {
        NativeTypes {
            object: Type::native(IntrinsicKind::Object, store.clone()),
            unknown: Type::native(IntrinsicKind::Unknown, store.clone()),
            any: Type::native(IntrinsicKind::Any, store.clone()),
            void_type: Type::native(IntrinsicKind::Void, store.clone()),
            string: Type::native(IntrinsicKind::String, store.clone()),
            number: Type::native(IntrinsicKind::Number, store.clone()),
            bigint: Type::native(IntrinsicKind::BigInt, store.clone()),
            boolean: Type::native(IntrinsicKind::Boolean, store.clone()),
            date: Type::native(IntrinsicKind::Date, store.clone()),
            null: Type::native(IntrinsicKind::Null, store.clone()),
            undefined: Type::native(IntrinsicKind::Undefined, store.clone()),
            never: Type::native(IntrinsicKind::Never, store),
        }
    }

    /// Look up the singleton for a native kind.
    pub fn get(&self, kind: IntrinsicKind) -> Arc<Type> {
        match kind {
            IntrinsicKind::Object => self.object.clone(),
            IntrinsicKind::Unknown => self.unknown.clone(),
            IntrinsicKind::Any => self.any.clone(),
            IntrinsicKind::Void => self.void_type.clone(),
            IntrinsicKind::String => self.string.clone(),
            IntrinsicKind::Number => self.number.clone(),
            IntrinsicKind::BigInt => self.bigint.clone(),
            IntrinsicKind::Boolean => self.boolean.clone(),
            IntrinsicKind::Date => self.date.clone(),
            IntrinsicKind::Null => self.null.clone(),
            IntrinsicKind::Undefined => self.undefined.clone(),
            IntrinsicKind::Never => self.never.clone(),
        }
    }

    pub fn object(&self) -> Arc<Type> {
        self.object.clone()
    }

    pub fn unknown(&self) -> Arc<Type> {
        self.unknown.clone()
    }

    pub fn any(&self) -> Arc<Type> {
        self.any.clone()
    }

    pub fn string(&self) -> Arc<Type> {
        self.string.clone()
    }

    pub fn number(&self) -> Arc<Type> {
        self.number.clone()
    }

    pub fn boolean(&self) -> Arc<Type> {
        self.boolean.clone()
    }

    pub fn null(&self) -> Arc<Type> {
        self.null.clone()
    }

    pub fn undefined(&self) -> Arc<Type> {
        self.undefined.clone()
    }

    pub fn never(&self) -> Arc<Type> {
        self.never.clone()
    }
}

/// Fallback Unknown for lazy references whose owning store has been dropped.
/// Its full name is empty, so it never compares equal to anything — the same
/// contract as every store's own Unknown.
pub(crate) fn detached_unknown() -> Arc<Type> {
    static DETACHED: Lazy<Arc<Type>> =
        Lazy::new(|| Type::native(IntrinsicKind::Unknown, Weak::new()));
    DETACHED.clone()
}
