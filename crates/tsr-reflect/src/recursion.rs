//! Recursion guard for cycle detection, depth limiting, and iteration
//! bounding in recursive graph computations.
//!
//! The type graph is cyclic by construction (mutually referencing types are
//! a supported case), so every recursive walk over it — assignability,
//! derivation chains, member flattening — runs behind a guard that detects
//! revisited nodes and bounds depth and total work.

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecursionProfile {
    /// Assignability and derivation checks: deep structural comparison of
    /// recursive types. Needs the deepest limit because comparison can
    /// legitimately nest far before a cycle is found.
    ///
    /// depth = 100, iterations = 100,000
    Assignability,

    /// Member flattening across inheritance chains and container
    /// constituents. Intentionally shallower.
    ///
    /// depth = 50, iterations = 100,000
    Flatten,
}

impl RecursionProfile {
    pub(crate) const fn max_depth(self) -> u32 {
        match self {
            Self::Assignability => 100,
            Self::Flatten => 50,
        }
    }

    pub(crate) const fn max_iterations(self) -> u32 {
        match self {
            Self::Assignability => 100_000,
            Self::Flatten => 100_000,
        }
    }
}

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already being visited — cycle detected.
    Cycle,
    /// Maximum recursion depth exceeded.
    DepthExceeded,
    /// Maximum iteration count exceeded.
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub(crate) fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

/// Tracks recursion state for one top-level query.
///
/// Callers pair every successful `enter(key)` with a `leave(key)` once the
/// nested computation finishes. In debug builds, leaving a key that was never
/// entered panics.
pub(crate) struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub(crate) fn with_profile(profile: RecursionProfile) -> Self {
        RecursionGuard {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth: profile.max_depth(),
            max_iterations: profile.max_iterations(),
        }
    }

    /// Try to enter a recursive computation keyed by `key`.
    pub(crate) fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);
        if self.iterations > self.max_iterations {
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }
        if !self.visiting.insert(key) {
            return RecursionResult::Cycle;
        }
        self.depth += 1;
        RecursionResult::Entered
    }

    /// Leave a computation previously entered with `key`.
    pub(crate) fn leave(&mut self, key: K) {
        let removed = self.visiting.remove(&key);
        debug_assert!(removed, "leave() without matching enter()");
        self.depth = self.depth.saturating_sub(1);
    }
}
