//! Realized member records attached to a type.
//!
//! These are the live counterparts of the member descriptors: names are
//! interned, modifier bools are folded into [`MemberFlags`], and every type
//! field is a [`LazyTypeRef`]. Members are plain `Clone` data; the collection
//! accessors on [`Type`](crate::Type) hand out defensive copies.

use crate::descriptor::{
    AccessModifier, Accessor, ConstructorDescriptor, DecoratorDescriptor, IndexDescriptor,
    LiteralValue, MethodDescriptor, ParameterDescriptor, PropertyDescriptor, SignatureDescriptor,
};
use crate::lazy::LazyTypeRef;
use crate::store::WeakStore;
use crate::ty::Type;
use bitflags::bitflags;
use std::sync::Arc;
use tsr_common::interner;
use tsr_common::Atom;

bitflags! {
    /// Modifier flags shared by the realized member records.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct MemberFlags: u8 {
        const OPTIONAL = 1 << 0;
        const READONLY = 1 << 1;
        const REST = 1 << 2;
    }
}

impl MemberFlags {
    fn from_bools(optional: bool, readonly: bool, rest: bool) -> Self {
        let mut flags = MemberFlags::empty();
        flags.set(MemberFlags::OPTIONAL, optional);
        flags.set(MemberFlags::READONLY, readonly);
        flags.set(MemberFlags::REST, rest);
        flags
    }
}

/// A property member.
#[derive(Clone, Debug)]
pub struct Property {
    pub(crate) name: Atom,
    pub(crate) ty: LazyTypeRef,
    pub(crate) flags: MemberFlags,
    pub(crate) access_modifier: AccessModifier,
    pub(crate) accessor: Accessor,
}

impl Property {
    pub(crate) fn realize(desc: &PropertyDescriptor, store: &WeakStore) -> Self {
        Property {
            name: interner::intern(&desc.name),
            ty: LazyTypeRef::from_type_ref(store, &desc.ty),
            flags: MemberFlags::from_bools(desc.optional, desc.readonly, false),
            access_modifier: desc.access_modifier,
            accessor: desc.accessor,
        }
    }

    pub fn name(&self) -> Atom {
        self.name
    }

    pub fn name_str(&self) -> Arc<str> {
        interner::resolve(self.name)
    }

    /// The property's type, resolved on demand.
    pub fn ty(&self) -> Arc<Type> {
        self.ty.get()
    }

    pub fn optional(&self) -> bool {
        self.flags.contains(MemberFlags::OPTIONAL)
    }

    pub fn readonly(&self) -> bool {
        self.flags.contains(MemberFlags::READONLY)
    }

    pub fn flags(&self) -> MemberFlags {
        self.flags
    }

    pub fn access_modifier(&self) -> AccessModifier {
        self.access_modifier
    }

    pub fn accessor(&self) -> Accessor {
        self.accessor
    }
}

/// A parameter of a method, constructor, or call signature.
#[derive(Clone, Debug)]
pub struct Parameter {
    pub(crate) name: Atom,
    pub(crate) ty: LazyTypeRef,
    pub(crate) flags: MemberFlags,
}

impl Parameter {
    pub(crate) fn realize(desc: &ParameterDescriptor, store: &WeakStore) -> Self {
        Parameter {
            name: interner::intern(&desc.name),
            ty: LazyTypeRef::from_type_ref(store, &desc.ty),
            flags: MemberFlags::from_bools(desc.optional, false, desc.rest),
        }
    }

    pub fn name(&self) -> Atom {
        self.name
    }

    pub fn name_str(&self) -> Arc<str> {
        interner::resolve(self.name)
    }

    pub fn ty(&self) -> Arc<Type> {
        self.ty.get()
    }

    pub fn optional(&self) -> bool {
        self.flags.contains(MemberFlags::OPTIONAL)
    }

    pub fn rest(&self) -> bool {
        self.flags.contains(MemberFlags::REST)
    }
}

fn realize_parameters(descs: &[ParameterDescriptor], store: &WeakStore) -> Vec<Parameter> {
    descs.iter().map(|d| Parameter::realize(d, store)).collect()
}

/// A method member.
#[derive(Clone, Debug)]
pub struct Method {
    pub(crate) name: Atom,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) return_type: LazyTypeRef,
    pub(crate) flags: MemberFlags,
    pub(crate) type_parameters: Vec<LazyTypeRef>,
}

impl Method {
    pub(crate) fn realize(desc: &MethodDescriptor, store: &WeakStore) -> Self {
        Method {
            name: interner::intern(&desc.name),
            parameters: realize_parameters(&desc.parameters, store),
            return_type: LazyTypeRef::from_type_ref(store, &desc.return_type),
            flags: MemberFlags::from_bools(desc.optional, false, false),
            type_parameters: desc
                .type_parameters
                .iter()
                .map(|r| LazyTypeRef::from_type_ref(store, r))
                .collect(),
        }
    }

    pub fn name(&self) -> Atom {
        self.name
    }

    pub fn name_str(&self) -> Arc<str> {
        interner::resolve(self.name)
    }

    pub fn parameters(&self) -> Vec<Parameter> {
        self.parameters.clone()
    }

    pub fn return_type(&self) -> Arc<Type> {
        self.return_type.get()
    }

    pub fn optional(&self) -> bool {
        self.flags.contains(MemberFlags::OPTIONAL)
    }

    pub fn type_parameters(&self) -> Vec<Arc<Type>> {
        self.type_parameters.iter().map(LazyTypeRef::get).collect()
    }
}

/// A constructor member of a class.
#[derive(Clone, Debug)]
pub struct Constructor {
    pub(crate) parameters: Vec<Parameter>,
}

impl Constructor {
    pub(crate) fn realize(desc: &ConstructorDescriptor, store: &WeakStore) -> Self {
        Constructor {
            parameters: realize_parameters(&desc.parameters, store),
        }
    }

    pub fn parameters(&self) -> Vec<Parameter> {
        self.parameters.clone()
    }
}

/// An index signature.
#[derive(Clone, Debug)]
pub struct IndexInfo {
    pub(crate) key_type: LazyTypeRef,
    pub(crate) value_type: LazyTypeRef,
    pub(crate) readonly: bool,
}

impl IndexInfo {
    pub(crate) fn realize(desc: &IndexDescriptor, store: &WeakStore) -> Self {
        IndexInfo {
            key_type: LazyTypeRef::from_type_ref(store, &desc.key_type),
            value_type: LazyTypeRef::from_type_ref(store, &desc.ty),
            readonly: desc.readonly,
        }
    }

    pub fn key_type(&self) -> Arc<Type> {
        self.key_type.get()
    }

    pub fn value_type(&self) -> Arc<Type> {
        self.value_type.get()
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }
}

/// A decorator (annotation) applied to a type.
#[derive(Clone, Debug)]
pub struct Decorator {
    pub(crate) name: Atom,
    pub(crate) full_name: Atom,
    pub(crate) args: Vec<LiteralValue>,
}

impl Decorator {
    pub(crate) fn realize(desc: &DecoratorDescriptor) -> Self {
        Decorator {
            name: interner::intern(&desc.name),
            full_name: interner::intern(&desc.full_name),
            args: desc.args.clone(),
        }
    }

    pub fn name(&self) -> Atom {
        self.name
    }

    pub fn name_str(&self) -> Arc<str> {
        interner::resolve(self.name)
    }

    pub fn full_name(&self) -> Atom {
        self.full_name
    }

    pub fn args(&self) -> &[LiteralValue] {
        &self.args
    }
}

/// A call signature of a function type.
#[derive(Clone, Debug)]
pub struct Signature {
    pub(crate) type_parameters: Vec<LazyTypeRef>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) return_type: LazyTypeRef,
}

impl Signature {
    pub(crate) fn realize(desc: &SignatureDescriptor, store: &WeakStore) -> Self {
        Signature {
            type_parameters: desc
                .type_parameters
                .iter()
                .map(|r| LazyTypeRef::from_type_ref(store, r))
                .collect(),
            parameters: realize_parameters(&desc.parameters, store),
            return_type: LazyTypeRef::from_type_ref(store, &desc.return_type),
        }
    }

    pub fn type_parameters(&self) -> Vec<Arc<Type>> {
        self.type_parameters.iter().map(LazyTypeRef::get).collect()
    }

    pub fn parameters(&self) -> Vec<Parameter> {
        self.parameters.clone()
    }

    pub fn return_type(&self) -> Arc<Type> {
        self.return_type.get()
    }
}

/// One entry of an enum, derived from its literal constituents.
#[derive(Clone, Debug)]
pub struct EnumEntry {
    pub(crate) name: Atom,
    pub(crate) value: Option<LiteralValue>,
}

impl EnumEntry {
    pub fn name(&self) -> Atom {
        self.name
    }

    pub fn name_str(&self) -> Arc<str> {
        interner::resolve(self.name)
    }

    pub fn value(&self) -> Option<&LiteralValue> {
        self.value.as_ref()
    }
}
