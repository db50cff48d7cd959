//! Lazy type references.
//!
//! Every relationship field in the realized graph is a [`LazyTypeRef`], never
//! a direct pointer to another [`Type`]. Resolution is deferred until first
//! read, which is what allows mutually referencing types to be registered
//! without unbounded recursion, and forward references to ids that have not
//! been populated yet.

use crate::descriptor::{TypeDescriptor, TypeId, TypeRef};
use crate::natives;
use crate::store::WeakStore;
use crate::ty::Type;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

type Thunk = Box<dyn Fn() -> Option<Arc<Type>> + Send + Sync>;

enum LazySource {
    /// Already realized; `get` is a clone.
    Resolved(Arc<Type>),
    /// Resolved against the store table on first read.
    Id { store: WeakStore, id: TypeId },
    /// Arbitrary deferred computation (inline descriptors, builder output).
    Thunk(Thunk),
}

struct LazyInner {
    memo: OnceCell<Arc<Type>>,
    source: LazySource,
}

/// Deferred, memoizing pointer to a realized type.
///
/// Cloning is cheap and clones share the memoized result. A reference whose
/// id is absent from the store resolves to the Unknown native *without*
/// memoizing, so an id registered later becomes visible on the next read;
/// the first successful resolution is cached forever.
#[derive(Clone)]
pub struct LazyTypeRef {
    inner: Arc<LazyInner>,
}

impl LazyTypeRef {
    fn with_source(source: LazySource) -> Self {
        LazyTypeRef {
            inner: Arc::new(LazyInner {
                memo: OnceCell::new(),
                source,
            }),
        }
    }

    pub(crate) fn from_type(ty: Arc<Type>) -> Self {
        Self::with_source(LazySource::Resolved(ty))
    }

    pub(crate) fn by_id(store: WeakStore, id: TypeId) -> Self {
        Self::with_source(LazySource::Id { store, id })
    }

    pub(crate) fn from_thunk<F>(thunk: F) -> Self
    where
        F: Fn() -> Option<Arc<Type>> + Send + Sync + 'static,
    {
        Self::with_source(LazySource::Thunk(Box::new(thunk)))
    }

    /// Build a lazy reference from a descriptor's [`TypeRef`] field.
    ///
    /// Inline descriptors are wrapped on first read, not eagerly, so that
    /// realizing a type never recurses into its relationship fields.
    pub(crate) fn from_type_ref(store: &WeakStore, type_ref: &TypeRef) -> Self {
        match type_ref {
            TypeRef::Id(id) => Self::by_id(store.clone(), *id),
            TypeRef::Inline(desc) => {
                let store = store.clone();
                let desc: TypeDescriptor = (**desc).clone();
                Self::from_thunk(move || {
                    store.upgrade().map(|inner| inner.realize(&desc, None))
                })
            }
        }
    }

    /// Resolve the referenced type, memoizing on first success.
    ///
    /// Resolution never fails loudly: an unresolvable reference yields the
    /// Unknown type of the owning store (or a detached Unknown if the store
    /// is gone), which callers treat like any other type.
    pub fn get(&self) -> Arc<Type> {
        if let Some(resolved) = self.inner.memo.get() {
            return resolved.clone();
        }
        let resolved = match &self.inner.source {
            LazySource::Resolved(ty) => Some(ty.clone()),
            LazySource::Id { store, id } => store.upgrade().and_then(|inner| inner.lookup(*id)),
            LazySource::Thunk(thunk) => thunk(),
        };
        match resolved {
            Some(ty) => {
                let _ = self.inner.memo.set(ty.clone());
                ty
            }
            None => self.unknown_fallback(),
        }
    }

    /// Whether this reference has already been resolved.
    pub fn is_resolved(&self) -> bool {
        self.inner.memo.get().is_some()
    }

    fn unknown_fallback(&self) -> Arc<Type> {
        if let LazySource::Id { store, .. } = &self.inner.source {
            if let Some(inner) = store.upgrade() {
                return inner.natives.unknown();
            }
        }
        natives::detached_unknown()
    }
}

impl fmt::Debug for LazyTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.memo.get() {
            Some(ty) => write!(f, "LazyTypeRef(resolved: {})", ty),
            None => match &self.inner.source {
                LazySource::Resolved(ty) => write!(f, "LazyTypeRef(direct: {})", ty),
                LazySource::Id { id, .. } => write!(f, "LazyTypeRef(id: {})", id),
                LazySource::Thunk(_) => f.write_str("LazyTypeRef(thunk)"),
            },
        }
    }
}
