//! Pending argument bindings and the frames that hold them.
//!
//! A `Promise` records the expression a caller wrote for an argument and the
//! caller's scope. When a function hands one of its own parameters on to
//! another call without evaluating it, the new promise is a *forward*: it
//! points back at the promise it relays, so capture can recover the
//! expression the original caller wrote instead of the relaying name.

use crate::scope::ScopeChain;
use crate::value::Value;
use defer_ir::{ExprTree, Literal, Name};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A not-yet-evaluated argument binding.
pub struct Promise {
    expr: ExprTree,
    scope: ScopeChain,
    forwarded_from: Option<Arc<Promise>>,
    value: OnceLock<Value>,
}

impl Promise {
    /// Promise for `expr` written in `scope`.
    pub fn new(expr: ExprTree, scope: ScopeChain) -> Arc<Self> {
        Arc::new(Promise {
            expr,
            scope,
            forwarded_from: None,
            value: OnceLock::new(),
        })
    }

    /// Promise that relays `upstream` under the expression `expr` written in
    /// the relaying frame's `scope`.
    pub fn forward(upstream: &Arc<Promise>, expr: ExprTree, scope: ScopeChain) -> Arc<Self> {
        Arc::new(Promise {
            expr,
            scope,
            forwarded_from: Some(Arc::clone(upstream)),
            value: OnceLock::new(),
        })
    }

    /// A binding that already holds a value.
    pub fn forced(value: Value) -> Arc<Self> {
        Arc::new(Promise {
            expr: ExprTree::literal(Literal::Null),
            scope: ScopeChain::empty(),
            forwarded_from: None,
            value: OnceLock::from(value),
        })
    }

    pub fn expr(&self) -> &ExprTree {
        &self.expr
    }

    pub fn scope(&self) -> &ScopeChain {
        &self.scope
    }

    pub fn forwarded_from(&self) -> Option<&Arc<Promise>> {
        self.forwarded_from.as_ref()
    }

    /// Cached value, once forced.
    pub fn value(&self) -> Option<&Value> {
        self.value.get()
    }

    pub fn is_forced(&self) -> bool {
        self.value.get().is_some()
    }

    /// Record the forced value. A promise is forced at most once; a second
    /// value is ignored.
    pub(crate) fn fulfill(&self, value: Value) {
        let _ = self.value.set(value);
    }

    /// Promises from `self` up to the original, `self` first.
    pub fn chain(&self) -> impl Iterator<Item = &Promise> {
        std::iter::successors(Some(self), |p| p.forwarded_from.as_deref())
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("expr", &self.expr)
            .field("scope", &self.scope)
            .field("forwarded", &self.forwarded_from.is_some())
            .field("value", &self.value.get())
            .finish()
    }
}

/// The argument bindings of one simulated function call.
#[derive(Clone, Debug, Default)]
pub struct CallFrame {
    scope: ScopeChain,
    args: Vec<(Name, Arc<Promise>)>,
}

impl CallFrame {
    /// Frame whose body runs in `scope`.
    pub fn new(scope: ScopeChain) -> Self {
        CallFrame {
            scope,
            args: Vec::new(),
        }
    }

    pub fn scope(&self) -> &ScopeChain {
        &self.scope
    }

    /// Bind parameter `param` to `promise`, replacing an earlier binding.
    pub fn bind(&mut self, param: Name, promise: Arc<Promise>) {
        match self.args.iter_mut().find(|(name, _)| *name == param) {
            Some(slot) => slot.1 = promise,
            None => self.args.push((param, promise)),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, param: Name, promise: Arc<Promise>) -> Self {
        self.bind(param, promise);
        self
    }

    pub fn arg(&self, param: Name) -> Option<&Arc<Promise>> {
        self.args.iter().find(|(name, _)| *name == param).map(|(_, p)| p)
    }

    /// Bound parameters in binding order.
    pub fn params(&self) -> impl Iterator<Item = Name> + '_ {
        self.args.iter().map(|(name, _)| *name)
    }

    /// Promise for an argument expression written in this frame.
    pub fn promise(&self, expr: ExprTree) -> Arc<Promise> {
        Promise::new(expr, self.scope.clone())
    }

    /// Relay this frame's own parameter `param` to another call unevaluated.
    pub fn relay(&self, param: Name) -> Option<Arc<Promise>> {
        let upstream = self.arg(param)?;
        Some(Promise::forward(upstream, ExprTree::symbol(param), self.scope.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Frame;

    #[test]
    fn test_relay_links_to_upstream() {
        let cond = Name::from_raw(100);
        let caller = ScopeChain::empty().child(Frame::new());
        let original = Promise::new(ExprTree::literal(Literal::Int(1)), caller);

        let relay = CallFrame::new(ScopeChain::empty().child(Frame::new())).with_arg(cond, Arc::clone(&original));
        let forwarded = relay.relay(cond).unwrap();

        assert_eq!(forwarded.expr().as_symbol(), Some(cond));
        assert!(Arc::ptr_eq(forwarded.forwarded_from().unwrap(), &original));
        assert_eq!(forwarded.chain().count(), 2);
        assert!(relay.relay(Name::from_raw(101)).is_none());
    }

    #[test]
    fn test_fulfill_is_once() {
        let p = Promise::new(ExprTree::literal(Literal::Null), ScopeChain::empty());
        assert!(!p.is_forced());
        p.fulfill(Value::Int(1));
        p.fulfill(Value::Int(2));
        assert_eq!(p.value(), Some(&Value::Int(1)));
        assert_eq!(Promise::forced(Value::Bool(true)).value(), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_bind_replaces() {
        let x = Name::from_raw(100);
        let mut frame = CallFrame::default();
        frame.bind(x, Promise::forced(Value::Int(1)));
        frame.bind(x, Promise::forced(Value::Int(2)));
        assert_eq!(frame.params().count(), 1);
        assert_eq!(frame.arg(x).unwrap().value(), Some(&Value::Int(2)));
    }
}
