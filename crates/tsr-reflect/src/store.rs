//! Metadata store: the registry mapping numeric ids to realized types.
//!
//! The store is the only way a [`Type`] comes into existence. Its public
//! surface is exactly four operations — `get`, `get_lazy`, `set`, `wrap` —
//! and none of them can fail: absent ids and malformed descriptors degrade
//! to the Unknown native or empty collections, never to an error.
//!
//! # Backends
//!
//! Three interchangeable backends satisfy the same contract:
//!
//! - [`MetadataStore::new`] — an isolated in-memory store, one per call.
//!   This is what tests use to get hermetic registries.
//! - [`process`] — a process-wide singleton, created on first use.
//! - [`thread`] — a thread-local singleton.
//!
//! [`install_active`]/[`active`] bind one store as *the* active backend,
//! first installation wins, idempotently. Swapping the active backend after
//! types have been realized invalidates identity comparisons against the old
//! backend's native singletons and is unsupported.

use crate::descriptor::{TypeDescriptor, TypeId, TypeKind};
use crate::lazy::LazyTypeRef;
use crate::natives::{IntrinsicKind, NativeTypes};
use crate::ty::Type;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::trace;

/// Global counter for assigning unique instance ids to stores.
/// Used to tell store instances apart in trace output.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) type WeakStore = Weak<StoreInner>;

pub(crate) struct StoreInner {
    instance_id: u64,
    types: DashMap<TypeId, Arc<Type>>,
    pub(crate) natives: NativeTypes,
}

impl StoreInner {
    /// Pure table lookup; no construction.
    pub(crate) fn lookup(&self, id: TypeId) -> Option<Arc<Type>> {
        self.types.get(&id).map(|entry| entry.value().clone())
    }

    /// Realize a descriptor into a type without touching the table.
    ///
    /// A descriptor naming a recognized native kind yields the store's
    /// pre-built singleton instead of a duplicate allocation.
    pub(crate) fn realize(self: &Arc<Self>, desc: &TypeDescriptor, id: Option<TypeId>) -> Arc<Type> {
        if desc.kind == TypeKind::Native {
            if let Some(kind) = IntrinsicKind::from_name(&desc.name) {
                return self.natives.get(kind);
            }
        }
        Type::realize(desc, id, self)
    }
}

/// Cheap-clone handle to a metadata store.
///
/// All clones share the same table and native singletons. The table is an
/// append-only cache for the life of the store; entries are never evicted.
#[derive(Clone)]
pub struct MetadataStore {
    inner: Arc<StoreInner>,
}

impl Default for MetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataStore {
    /// Create a new, isolated store with its own native singletons.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "MetadataStore::new - creating new instance");
        let inner = Arc::new_cyclic(|weak: &WeakStore| StoreInner {
            instance_id,
            types: DashMap::new(),
            natives: NativeTypes::new(weak.clone()),
        });
        MetadataStore { inner }
    }

    pub(crate) fn from_inner(inner: Arc<StoreInner>) -> Self {
        MetadataStore { inner }
    }

    pub(crate) fn downgrade(&self) -> WeakStore {
        Arc::downgrade(&self.inner)
    }

    /// Look up a realized type by id. O(1), no construction.
    pub fn get(&self, id: TypeId) -> Option<Arc<Type>> {
        self.inner.lookup(id)
    }

    /// A lazy reference that re-queries this store at read time.
    ///
    /// The id does not have to be registered yet; the reference resolves to
    /// whatever `set` has registered by the time it is first read.
    pub fn get_lazy(&self, id: TypeId) -> LazyTypeRef {
        LazyTypeRef::by_id(self.downgrade(), id)
    }

    /// Realize `descriptor` and register it under `id`.
    ///
    /// Registration is a single unconditional table write: re-setting an id
    /// overwrites the entry (last write wins) but does not retroactively
    /// invalidate lazy references that already resolved to the prior entry.
    /// Population never resolves a relationship field, so no reader can
    /// observe a half-constructed type.
    pub fn set(&self, id: TypeId, descriptor: TypeDescriptor) -> Arc<Type> {
        trace!(
            instance_id = self.inner.instance_id,
            id = id.0,
            full_name = %descriptor.full_name,
            kind = ?descriptor.kind,
            "MetadataStore::set"
        );
        let ty = self.inner.realize(&descriptor, Some(id));
        self.inner.types.insert(id, ty.clone());
        ty
    }

    /// Realize `descriptor` without registering it under an id.
    ///
    /// Used for anonymous, structural, and dynamically produced types. A
    /// descriptor naming a recognized native kind returns the pre-built
    /// singleton.
    pub fn wrap(&self, descriptor: TypeDescriptor) -> Arc<Type> {
        trace!(
            instance_id = self.inner.instance_id,
            full_name = %descriptor.full_name,
            kind = ?descriptor.kind,
            "MetadataStore::wrap"
        );
        self.inner.realize(&descriptor, None)
    }

    /// The native singletons owned by this store.
    pub fn natives(&self) -> &NativeTypes {
        &self.inner.natives
    }

    /// Number of registered types (natives excluded).
    pub fn len(&self) -> usize {
        self.inner.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.types.is_empty()
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.inner.types.contains_key(&id)
    }

    /// Identifier for trace output; unique per store instance.
    pub fn instance_id(&self) -> u64 {
        self.inner.instance_id
    }
}

// ---------------------------------------------------------------------------
// Backend binding points
// ---------------------------------------------------------------------------

static ACTIVE_STORE: OnceCell<MetadataStore> = OnceCell::new();
static PROCESS_STORE: OnceCell<MetadataStore> = OnceCell::new();

thread_local! {
    static THREAD_STORE: once_cell::unsync::OnceCell<MetadataStore> =
        const { once_cell::unsync::OnceCell::new() };
}

/// The process-wide store, created on first use.
pub fn process() -> MetadataStore {
    PROCESS_STORE.get_or_init(MetadataStore::new).clone()
}

/// The store bound to the current thread, created on first use.
pub fn thread() -> MetadataStore {
    THREAD_STORE.with(|cell| cell.get_or_init(MetadataStore::new).clone())
}

/// Install `store` as the single active backend.
///
/// Returns `true` on the first installation; later calls leave the existing
/// binding untouched and return `false`. Installation after [`active`] has
/// already defaulted to the process store also returns `false`.
pub fn install_active(store: MetadataStore) -> bool {
    ACTIVE_STORE.set(store).is_ok()
}

/// The active store: the explicitly installed backend, or the process-wide
/// store when none was installed.
pub fn active() -> MetadataStore {
    ACTIVE_STORE.get_or_init(process).clone()
}
