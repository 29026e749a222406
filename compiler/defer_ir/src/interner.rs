//! String interner for identifiers and string literals.
//!
//! Interning is append-only: a string once interned keeps its `Name` for the
//! lifetime of the interner. Reads take a shared lock, so a `SharedInterner`
//! can be handed to any number of threads evaluating independent lazy values.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::ops::Deref;
use std::sync::Arc;

/// Operator symbols produced by the parser, pre-interned in this order so
/// every interner agrees on their position right after the empty string.
pub const OPERATOR_SYMBOLS: &[&str] = &[
    "+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "&&", "||", "!",
];

#[derive(Default)]
struct InternTable {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents (indexed by `Name::index`).
    strings: Vec<&'static str>,
}

/// Append-only string interner.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string and operator symbols
    /// pre-interned.
    pub fn new() -> Self {
        let interner = StringInterner {
            table: RwLock::new(InternTable::default()),
        };
        interner.pre_intern();
        interner
    }

    fn pre_intern(&self) {
        let mut table = self.table.write();
        for s in std::iter::once("").chain(OPERATOR_SYMBOLS.iter().copied()) {
            let index = table.strings.len() as u32;
            table.strings.push(s);
            table.map.insert(s, index);
        }
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if the interner exceeds `u32::MAX` strings.
    pub fn intern(&self, s: &str) -> Name {
        // Fast path: check if already interned
        if let Some(&index) = self.table.read().map.get(s) {
            return Name::from_raw(index);
        }

        let mut table = self.table.write();

        // Double-check after acquiring write lock
        if let Some(&index) = table.map.get(s) {
            return Name::from_raw(index);
        }

        let index = u32::try_from(table.strings.len())
            .unwrap_or_else(|_| panic!("interner exceeded {} strings", u32::MAX));

        // Leak the string to get 'static lifetime; interned strings live as
        // long as the process anyway.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        table.strings.push(leaked);
        table.map.insert(leaked, index);

        Name::from_raw(index)
    }

    /// Look up the string for a Name.
    ///
    /// Names from a foreign interner that fall outside this table resolve to
    /// the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Look up an already-interned string without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).copied().map(Name::from_raw)
    }

    /// Number of interned strings (including pre-interned ones).
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Check if the interner is empty (never true after construction).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

/// Thread-safe shared interner handle.
#[derive(Clone, Default, Debug)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
