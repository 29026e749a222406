//! The interpreter: root scope, host and configuration, plus the operations
//! that capture, coerce, evaluate and build lazy values.
//!
//! An `Interpreter` is immutable after `build()` and `Send + Sync`; share it
//! behind an `Arc` to evaluate independent lazy values on several threads.

mod builder;
mod eval;
mod interp;

pub use builder::InterpreterBuilder;
pub use interp::{Substitution, Substitutions};

use crate::coerce::{value_tree, LazyInput};
use crate::config::EvalConfig;
use crate::dots::LazyDots;
use crate::errors::{CoercionError, EvalResult};
use crate::host::Host;
use crate::lazy::{Embedded, LazyValue};
use crate::promise::{CallFrame, Promise};
use crate::scope::{Frame, ScopeChain};
use crate::value::Value;
use defer_ir::{EmbedIdx, ExprTree, Name, SharedInterner, StringInterner};
use defer_parse::ParseError;
use std::fmt;
use std::sync::Arc;

pub struct Interpreter {
    interner: SharedInterner,
    root: ScopeChain,
    host: Arc<dyn Host>,
    config: EvalConfig,
}

impl Interpreter {
    /// Interpreter with the standard builtins and default configuration.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Scope holding the builtins and registered globals.
    #[inline]
    pub fn root_scope(&self) -> &ScopeChain {
        &self.root
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Frame binding each `(name, value)` pair.
    pub fn frame<I, S, V>(&self, bindings: I) -> Frame
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: Into<Value>,
    {
        bindings
            .into_iter()
            .map(|(name, value)| (self.intern(name.as_ref()), value.into()))
            .collect()
    }

    /// New scope directly under the root scope.
    pub fn scope<I, S, V>(&self, bindings: I) -> ScopeChain
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: Into<Value>,
    {
        self.root.child(self.frame(bindings))
    }

    pub fn parse(&self, source: &str) -> Result<ExprTree, ParseError> {
        defer_parse::parse(source, &self.interner)
    }

    /// Normalize `input` into a lazy value.
    ///
    /// Lazy values come back unchanged. Trees without a scope and source text
    /// are paired with the root scope, plain values become literals in the
    /// root scope. Applying `as_lazy` to its own output is the identity.
    pub fn as_lazy(&self, input: impl Into<LazyInput>) -> Result<LazyValue, CoercionError> {
        match input.into() {
            LazyInput::Lazy(lazy) => Ok(lazy),
            LazyInput::Tree(tree) => self.tree_in(tree, self.root.clone()),
            LazyInput::TreeIn(tree, scope) => self.tree_in(tree, scope),
            LazyInput::Text(source_text) => match self.parse(&source_text) {
                Ok(tree) => Ok(LazyValue::new(tree, self.root.clone())),
                Err(error) => Err(CoercionError::Parse { source_text, error }),
            },
            LazyInput::Value(value) => match value_tree(&value, &self.interner)? {
                Some(tree) => Ok(LazyValue::new(tree, self.root.clone())),
                None => Err(CoercionError::Unsupported {
                    kind: value.type_name().to_string(),
                }),
            },
        }
    }

    fn tree_in(&self, tree: ExprTree, scope: ScopeChain) -> Result<LazyValue, CoercionError> {
        // A bare tree has no table for its embed nodes to index
        if tree.has_embeds() {
            return Err(CoercionError::Unsupported {
                kind: "tree with embed nodes".to_string(),
            });
        }
        Ok(LazyValue::new(tree, scope))
    }

    /// Lazy value for a binding's source expression.
    ///
    /// Forwarded bindings are followed back to the promise the original
    /// caller created, so the result holds the expression that caller wrote
    /// and the caller's scope. A binding already forced yields its value as a
    /// literal in the root scope.
    pub fn capture(&self, binding: &Promise) -> LazyValue {
        let mut hops = 0usize;
        for promise in binding.chain() {
            if let Some(value) = promise.value() {
                tracing::trace!(hops, "captured forced binding");
                return self.lazy_of_value(value.clone());
            }
            if promise.forwarded_from().is_none() {
                tracing::trace!(hops, "captured binding");
                return LazyValue::new(promise.expr().clone(), promise.scope().clone());
            }
            hops += 1;
        }
        // `chain` always ends at a promise with no upstream
        LazyValue::new(binding.expr().clone(), binding.scope().clone())
    }

    /// Capture every parameter bound in `frame`, named by parameter.
    pub fn capture_frame(&self, frame: &CallFrame) -> LazyDots {
        frame
            .params()
            .filter_map(|param| frame.arg(param).map(|p| (Some(param), self.capture(p))))
            .collect()
    }

    /// Value of a binding, computed at most once.
    ///
    /// Forcing a forwarded binding forces the promise it relays and caches
    /// the value on every promise along the way.
    pub fn force(&self, binding: &Promise) -> EvalResult {
        if let Some(value) = binding.value() {
            return Ok(value.clone());
        }
        let value = self.evaluate(&self.capture(binding), None)?;
        for promise in binding.chain() {
            promise.fulfill(value.clone());
        }
        Ok(value)
    }

    /// Literal in the root scope, or an embedded value when `value` has no
    /// literal form.
    fn lazy_of_value(&self, value: Value) -> LazyValue {
        match value_tree(&value, &self.interner) {
            Ok(Some(tree)) if tree.as_literal().is_some() => LazyValue::new(tree, self.root.clone()),
            _ => LazyValue::from_parts(
                ExprTree::embed(EmbedIdx::new(0)),
                self.root.clone(),
                Arc::from([Embedded::Value(value)]),
            ),
        }
    }

    /// Source-like text for `lazy`.
    pub fn deparse(&self, lazy: &LazyValue) -> String {
        lazy.deparse(&self.interner)
    }

    /// Name every unnamed entry of `dots` after its expression.
    pub fn auto_name(&self, dots: &LazyDots) -> LazyDots {
        dots.auto_named(&self.interner, self.config.name_width)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
