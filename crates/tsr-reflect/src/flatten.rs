//! Member flattening across inheritance chains and container constituents.
//!
//! For ordinary object-like types, flattening merges members by name in
//! precedence order: interface members first, then base-type members, then
//! the type's own members, later layers overriding earlier ones.
//!
//! Container types flatten differently: every constituent is flattened
//! recursively, members are bucketed by name across constituents, and the
//! buckets reduce under the container's laws:
//!
//! - **Union**: a name survives only if present in *every* constituent; its
//!   type becomes the union of the per-constituent types; optional is AND,
//!   readonly is OR.
//! - **Intersection**: every name present in *any* constituent is kept;
//!   collisions merge by intersecting their types; optional is AND across
//!   the constituents that have the name; readonly is OR.

use crate::builder;
use crate::lazy::LazyTypeRef;
use crate::member::{MemberFlags, Method, Property};
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::store::MetadataStore;
use crate::ty::Type;
use indexmap::IndexMap;
use std::sync::Arc;
use tsr_common::Atom;

/// The by-name member view produced by flattening.
#[derive(Clone, Debug, Default)]
pub struct FlattenedMembers {
    pub properties: IndexMap<Atom, Property>,
    pub methods: IndexMap<Atom, Method>,
}

impl FlattenedMembers {
    fn absorb(&mut self, other: FlattenedMembers) {
        for (name, property) in other.properties {
            self.properties.insert(name, property);
        }
        for (name, method) in other.methods {
            self.methods.insert(name, method);
        }
    }
}

impl Type {
    /// Merge inherited and own members into a single by-name view.
    pub fn flatten_inherited_members(&self) -> FlattenedMembers {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::Flatten);
        self.flatten_with(&mut guard)
    }

    pub(crate) fn flatten_with(&self, guard: &mut RecursionGuard<usize>) -> FlattenedMembers {
        let key = self as *const Type as usize;
        if !guard.enter(key).is_entered() {
            // Revisited node or exhausted budget: contribute nothing rather
            // than recurse forever.
            return FlattenedMembers::default();
        }
        let members = if self.is_union_or_intersection() {
            self.flatten_container(guard)
        } else {
            self.flatten_ordinary(guard)
        };
        guard.leave(key);
        members
    }

    fn flatten_ordinary(&self, guard: &mut RecursionGuard<usize>) -> FlattenedMembers {
        let mut members = FlattenedMembers::default();
        if let Some(interface) = self.interface() {
            members.absorb(interface.flatten_with(guard));
        }
        if let Some(base) = self.base_type() {
            members.absorb(base.flatten_with(guard));
        }
        for property in &self.properties {
            members.properties.insert(property.name, property.clone());
        }
        for method in &self.methods {
            members.methods.insert(method.name, method.clone());
        }
        members
    }

    fn flatten_container(&self, guard: &mut RecursionGuard<usize>) -> FlattenedMembers {
        let constituents = self.types();
        let flats: Vec<FlattenedMembers> =
            constituents.iter().map(|t| t.flatten_with(guard)).collect();
        let Some((first, rest)) = flats.split_first() else {
            return FlattenedMembers::default();
        };
        let store = self.store.upgrade().map(MetadataStore::from_inner);

        let mut members = FlattenedMembers::default();
        if self.is_union() {
            // Common-subset rule: only names present in every constituent
            // survive a union.
            for (name, property) in &first.properties {
                if !rest.iter().all(|f| f.properties.contains_key(name)) {
                    continue;
                }
                let bucket: Vec<&Property> = flats
                    .iter()
                    .filter_map(|f| f.properties.get(name))
                    .collect();
                members
                    .properties
                    .insert(*name, merge_properties(property, &bucket, &store, true));
            }
            for (name, method) in &first.methods {
                if !rest.iter().all(|f| f.methods.contains_key(name)) {
                    continue;
                }
                let bucket: Vec<&Method> =
                    flats.iter().filter_map(|f| f.methods.get(name)).collect();
                members.methods.insert(*name, merge_methods(method, &bucket));
            }
        } else {
            for flat in &flats {
                for name in flat.properties.keys() {
                    if members.properties.contains_key(name) {
                        continue;
                    }
                    let bucket: Vec<&Property> = flats
                        .iter()
                        .filter_map(|f| f.properties.get(name))
                        .collect();
                    let template = bucket[0];
                    members
                        .properties
                        .insert(*name, merge_properties(template, &bucket, &store, false));
                }
                for name in flat.methods.keys() {
                    if members.methods.contains_key(name) {
                        continue;
                    }
                    let bucket: Vec<&Method> =
                        flats.iter().filter_map(|f| f.methods.get(name)).collect();
                    members.methods.insert(*name, merge_methods(bucket[0], &bucket));
                }
            }
        }
        members
    }
}

/// Reduce a by-name property bucket under the container laws.
fn merge_properties(
    template: &Property,
    bucket: &[&Property],
    store: &Option<MetadataStore>,
    union: bool,
) -> Property {
    let optional = bucket.iter().all(|p| p.optional());
    let readonly = bucket.iter().any(|p| p.readonly());

    let ty = if bucket.len() == 1 {
        bucket[0].ty.clone()
    } else {
        let parts: Vec<Arc<Type>> = bucket.iter().map(|p| p.ty()).collect();
        match store {
            Some(store) => {
                let merged = if union {
                    builder::union_of(store, parts)
                } else {
                    builder::intersection_of(store, parts)
                };
                LazyTypeRef::from_type(merged)
            }
            // The owning store is gone; keep the first type rather than
            // invent a detached container.
            None => bucket[0].ty.clone(),
        }
    };

    let mut flags = MemberFlags::empty();
    flags.set(MemberFlags::OPTIONAL, optional);
    flags.set(MemberFlags::READONLY, readonly);
    Property {
        name: template.name,
        ty,
        flags,
        access_modifier: template.access_modifier,
        accessor: template.accessor,
    }
}

/// Reduce a by-name method bucket. The first constituent's signature wins;
/// only the optional flag is combined (AND across the bucket).
fn merge_methods(template: &Method, bucket: &[&Method]) -> Method {
    let optional = bucket.iter().all(|m| m.optional());
    let mut merged = template.clone();
    merged.flags.set(MemberFlags::OPTIONAL, optional);
    merged
}
