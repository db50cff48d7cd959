//! Assignability: derivation, structural compatibility, and the general
//! `is_assignable_to` query.
//!
//! All three relations recurse through a single [`AssignabilityChecker`]
//! that owns one [`RecursionGuard`] per top-level query, so a cyclic graph
//! (types whose members refer back to each other) terminates: a revisited
//! structural pair is assumed compatible (coinductive semantics), while a
//! revisited derivation pair means the chain made no progress and fails.

use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::ty::Type;
use std::sync::Arc;

/// Which relation a guard key belongs to. The same pair of nodes can
/// legitimately appear in more than one relation on the same call stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Relation {
    Assignable,
    Derived,
    Structural,
}

type Key = (Relation, usize, usize);

fn addr(ty: &Type) -> usize {
    ty as *const Type as usize
}

pub(crate) struct AssignabilityChecker {
    guard: RecursionGuard<Key>,
}

impl AssignabilityChecker {
    pub(crate) fn new() -> Self {
        AssignabilityChecker {
            guard: RecursionGuard::with_profile(RecursionProfile::Assignability),
        }
    }

    /// The general assignability relation, checked in order:
    ///
    /// 1. Either side is Any.
    /// 2. A true/false literal is assignable to boolean.
    /// 3. Container rules (all-some subsumption, not positional pairing).
    /// 4. Array-ness must match; array elements compare covariantly.
    /// 5. Derivation or structural compatibility.
    pub(crate) fn check(&mut self, source: &Type, target: &Type) -> bool {
        let key = (Relation::Assignable, addr(source), addr(target));
        match self.guard.enter(key) {
            RecursionResult::Entered => {}
            // A self-referential pair is compatible unless something else
            // on the stack disproves it.
            RecursionResult::Cycle => return true,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => return false,
        }
        let result = self.check_inner(source, target);
        self.guard.leave(key);
        result
    }

    fn check_inner(&mut self, source: &Type, target: &Type) -> bool {
        if source.is_any() || target.is_any() {
            return true;
        }
        if (source.is_true() || source.is_false()) && target.is_boolean() {
            return true;
        }
        if source.is_union_or_intersection() || target.is_union_or_intersection() {
            return self.check_containers(source, target);
        }
        if source.is_array() != target.is_array() {
            return false;
        }
        if source.is_array() {
            return self.check_array_elements(source, target);
        }
        self.derived(source, target) || self.structural(source, target)
    }

    fn check_containers(&mut self, source: &Type, target: &Type) -> bool {
        if !target.is_union_or_intersection() {
            // The source is the container: some constituent must fit the
            // plain target.
            return source.types().iter().any(|c| self.check(c, target));
        }
        if !source.is_union_or_intersection() {
            // Plain source against a container target.
            let parts = target.types();
            if target.is_union() {
                parts.iter().any(|c| self.check(source, c))
            } else {
                parts.iter().all(|c| self.check(source, c))
            }
        } else {
            // Both containers: kinds must agree, then every source
            // constituent must find some compatible target constituent.
            if source.is_union() != target.is_union() {
                return false;
            }
            let targets = target.types();
            source
                .types()
                .iter()
                .all(|c| targets.iter().any(|t| self.check(c, t)))
        }
    }

    fn check_array_elements(&mut self, source: &Type, target: &Type) -> bool {
        let source_element = element_type(source);
        let target_element = element_type(target);
        match (source_element, target_element) {
            (Some(s), Some(t)) => self.derived(&s, &t) || self.structural(&s, &t),
            // An unparameterized array cannot be related to a parameterized
            // one; two unparameterized arrays are trivially compatible.
            (None, None) => true,
            _ => false,
        }
    }

    /// Nominal derivation: identity, or the base-type chain, or the
    /// implemented-interface chain.
    pub(crate) fn derived(&mut self, source: &Type, target: &Type) -> bool {
        let key = (Relation::Derived, addr(source), addr(target));
        match self.guard.enter(key) {
            RecursionResult::Entered => {}
            // Revisiting a derivation pair means the chain looped without
            // reaching the target.
            _ => return false,
        }
        let result = source.is(target)
            || source.base_type().is_some_and(|base| self.derived(&base, target))
            || source
                .interface()
                .is_some_and(|interface| self.derived(&interface, target));
        self.guard.leave(key);
        result
    }

    /// Structural compatibility over flattened members.
    ///
    /// Method parameters deliberately compare in the same covariant
    /// direction as properties.
    pub(crate) fn structural(&mut self, source: &Type, target: &Type) -> bool {
        let key = (Relation::Structural, addr(source), addr(target));
        match self.guard.enter(key) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return true,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => return false,
        }
        let result = self.structural_inner(source, target);
        self.guard.leave(key);
        result
    }

    fn structural_inner(&mut self, source: &Type, target: &Type) -> bool {
        if !source.is_object_like() || !target.is_object_like() {
            return false;
        }
        let source_members = source.flatten_inherited_members();
        let target_members = target.flatten_inherited_members();

        for (name, target_property) in &target_members.properties {
            if target_property.optional() {
                continue;
            }
            let Some(source_property) = source_members.properties.get(name) else {
                return false;
            };
            if !self.check(&source_property.ty(), &target_property.ty()) {
                return false;
            }
        }

        for (name, target_method) in &target_members.methods {
            if target_method.optional() {
                continue;
            }
            let Some(source_method) = source_members.methods.get(name) else {
                return false;
            };
            let source_params = source_method.parameters();
            let target_params = target_method.parameters();
            for (source_param, target_param) in source_params.iter().zip(target_params.iter()) {
                if !self.check(&source_param.ty(), &target_param.ty()) {
                    return false;
                }
            }
            // Trailing target parameters the source never binds must be
            // droppable.
            if target_params.len() > source_params.len()
                && !target_params[source_params.len()..]
                    .iter()
                    .all(|p| p.optional() || p.rest())
            {
                return false;
            }
        }
        true
    }
}

fn element_type(array: &Type) -> Option<Arc<Type>> {
    array.type_arguments().into_iter().next()
}

impl Type {
    /// Is a value of this type assignable to a slot of type `target`?
    pub fn is_assignable_to(&self, target: &Type) -> bool {
        AssignabilityChecker::new().check(self, target)
    }

    /// Identity-or-inheritance: this type, its base-type chain, or its
    /// implemented-interface chain reaches `target`.
    pub fn is_derived_from(&self, target: &Type) -> bool {
        AssignabilityChecker::new().derived(self, target)
    }

    /// Shape compatibility over flattened members; both sides must be
    /// object-like.
    pub fn is_structurally_assignable_to(&self, target: &Type) -> bool {
        AssignabilityChecker::new().structural(self, target)
    }
}
