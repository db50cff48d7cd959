//! String interner for type and member names.
//!
//! Full names are compared constantly during identity and assignability
//! checks; interning them into `Atom`s turns those comparisons into u32
//! equality and removes duplicate allocations for common identifiers like
//! "name", "length", or "Array".

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::{Arc, OnceLock, RwLock};

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `Interner::resolve(atom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    /// Check if this is the empty/none atom.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Identifiers that show up in virtually every reflected type graph.
/// Pre-interning them keeps early atoms stable and avoids write locks
/// on the hot startup path.
const COMMON_STRINGS: &[&str] = &[
    // Well-known type names
    "Object",
    "Array",
    "ReadonlyArray",
    "Promise",
    "Date",
    "Function",
    "Symbol",
    "any",
    "unknown",
    "never",
    "void",
    "string",
    "number",
    "bigint",
    "boolean",
    "null",
    "undefined",
    "true",
    "false",
    // Common member names
    "name",
    "id",
    "value",
    "length",
    "constructor",
    "toString",
];

struct InternerShard {
    map: FxHashMap<Arc<str>, u32>,
    strings: Vec<Arc<str>>,
}

impl InternerShard {
    fn push(&mut self, text: &str) -> u32 {
        let index = self.strings.len() as u32;
        let entry: Arc<str> = Arc::from(text);
        self.strings.push(entry.clone());
        self.map.insert(entry, index);
        index
    }
}

/// Interns strings into a shared pool, handing out `Atom` indices.
///
/// Reads take a shared lock; the write lock is only taken when a string is
/// seen for the first time.
pub struct Interner {
    inner: RwLock<InternerShard>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Create an interner preseeded with [`COMMON_STRINGS`].
    ///
    /// `Atom(0)` is always the empty string, matching [`Atom::NONE`].
    pub fn new() -> Self {
        let mut shard = InternerShard {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(COMMON_STRINGS.len() + 1),
        };
        shard.push("");
        for text in COMMON_STRINGS {
            shard.push(text);
        }
        Interner {
            inner: RwLock::new(shard),
        }
    }

    /// Intern a string, returning its atom. Empty strings intern to
    /// [`Atom::NONE`].
    pub fn intern(&self, text: &str) -> Atom {
        if text.is_empty() {
            return Atom::NONE;
        }
        if let Ok(shard) = self.inner.read() {
            if let Some(&index) = shard.map.get(text) {
                return Atom(index);
            }
        }
        match self.inner.write() {
            Ok(mut shard) => {
                // Re-check under the write lock: another thread may have
                // interned the same string between the two lock scopes.
                if let Some(&index) = shard.map.get(text) {
                    return Atom(index);
                }
                Atom(shard.push(text))
            }
            Err(_) => Atom::NONE,
        }
    }

    /// Resolve an atom back to its string. Unknown atoms resolve to the
    /// empty string rather than failing.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.inner
            .read()
            .ok()
            .and_then(|shard| shard.strings.get(atom.0 as usize).cloned())
            .unwrap_or_else(|| Arc::from(""))
    }

    /// Number of interned strings, including the reserved empty string.
    pub fn len(&self) -> usize {
        self.inner.read().map(|shard| shard.strings.len()).unwrap_or(0)
    }

    /// Whether the interner holds only the reserved empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

/// The process-wide interner used by the reflection crates.
pub fn global() -> &'static Interner {
    static GLOBAL: OnceLock<Interner> = OnceLock::new();
    GLOBAL.get_or_init(Interner::new)
}

/// Intern `text` in the global interner.
pub fn intern(text: &str) -> Atom {
    global().intern(text)
}

/// Resolve an atom from the global interner.
pub fn resolve(atom: Atom) -> Arc<str> {
    global().resolve(atom)
}
