//! Interned string identifier.
//!
//! A `Name` is a 32-bit index into a [`StringInterner`](crate::StringInterner).
//! Equality and hashing are integer operations, so scope frames keyed by
//! `Name` never touch string contents during lookup.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Interned string identifier.
///
/// Only meaningful together with the interner that produced it. Comparing
/// names from two different interners is a logic error (it will not panic,
/// but the answer is meaningless).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Create from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into the interner's string table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Hash for Name {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
