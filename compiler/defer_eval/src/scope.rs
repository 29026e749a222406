//! Lexical scopes: persistent chains of name to value frames.
//!
//! A `ScopeChain` is an `Arc`-linked list of frames, innermost first.
//! Chains are immutable once built; a child scope shares its parent, so many
//! lazy values can hold the same scope and outlive whatever created it.
//! Two chains are the same scope only if they are the same allocation.

use crate::value::Value;
use defer_ir::Name;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// One frame of bindings. Also used as the overrides mapping for evaluation.
#[derive(Clone, Default, PartialEq)]
pub struct Frame {
    bindings: FxHashMap<Name, Value>,
}

impl Frame {
    pub fn new() -> Self {
        Frame::default()
    }

    /// Builder-style `define`.
    #[must_use]
    pub fn with(mut self, name: Name, value: impl Into<Value>) -> Self {
        self.define(name, value);
        self
    }

    /// Bind `name`, replacing any earlier binding in this frame.
    pub fn define(&mut self, name: Name, value: impl Into<Value>) {
        self.bindings.insert(name, value.into());
    }

    #[inline]
    pub fn get(&self, name: Name) -> Option<&Value> {
        self.bindings.get(&name)
    }

    pub fn contains(&self, name: Name) -> bool {
        self.bindings.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &Value)> {
        self.bindings.iter().map(|(name, value)| (*name, value))
    }
}

impl FromIterator<(Name, Value)> for Frame {
    fn from_iter<I: IntoIterator<Item = (Name, Value)>>(iter: I) -> Self {
        Frame {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.bindings.iter()).finish()
    }
}

struct ScopeNode {
    frame: Frame,
    parent: ScopeChain,
}

/// Persistent scope chain.
#[derive(Clone, Default)]
pub struct ScopeChain(Option<Arc<ScopeNode>>);

impl ScopeChain {
    /// The chain with no frames; every lookup fails.
    pub fn empty() -> Self {
        ScopeChain(None)
    }

    /// New scope whose innermost frame is `frame` and whose parent is `self`.
    #[must_use]
    pub fn child(&self, frame: Frame) -> Self {
        ScopeChain(Some(Arc::new(ScopeNode {
            frame,
            parent: self.clone(),
        })))
    }

    /// Resolve `name`, innermost frame first.
    pub fn lookup(&self, name: Name) -> Option<&Value> {
        let mut current = self.0.as_deref();
        while let Some(node) = current {
            if let Some(value) = node.frame.get(name) {
                return Some(value);
            }
            current = node.parent.0.as_deref();
        }
        None
    }

    /// Innermost frame, if any.
    pub fn frame(&self) -> Option<&Frame> {
        self.0.as_deref().map(|node| &node.frame)
    }

    pub fn parent(&self) -> Option<&ScopeChain> {
        self.0.as_deref().map(|node| &node.parent)
    }

    /// Number of frames.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.0.as_deref();
        while let Some(node) = current {
            depth += 1;
            current = node.parent.0.as_deref();
        }
        depth
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl PartialEq for ScopeChain {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for ScopeChain {}

impl fmt::Debug for ScopeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => write!(f, "ScopeChain(empty)"),
            Some(node) => write!(
                f,
                "ScopeChain({:p}, depth {}, {} local)",
                Arc::as_ptr(node),
                self.depth(),
                node.frame.len()
            ),
        }
    }
}
