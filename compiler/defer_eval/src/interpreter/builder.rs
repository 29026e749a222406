//! `InterpreterBuilder` for assembling the root scope and configuration.

use super::Interpreter;
use crate::builtins::Builtin;
use crate::config::EvalConfig;
use crate::errors::ApplyError;
use crate::host::{Host, StdHost};
use crate::scope::{Frame, ScopeChain};
use crate::value::{NativeFn, Value};
use defer_ir::SharedInterner;
use std::sync::Arc;

/// Builder for `Interpreter`.
///
/// The root scope always binds every `Builtin` under its name; globals and
/// natives registered here are added to the same frame and shadow a builtin
/// of the same name.
pub struct InterpreterBuilder {
    interner: Option<SharedInterner>,
    host: Option<Arc<dyn Host>>,
    config: EvalConfig,
    globals: Vec<(String, Value)>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder {
            interner: None,
            host: None,
            config: EvalConfig::default(),
            globals: Vec::new(),
        }
    }

    /// Share an existing interner, so trees parsed elsewhere resolve here.
    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    /// Replace the standard host.
    #[must_use]
    pub fn host(mut self, host: impl Host + 'static) -> Self {
        self.host = Some(Arc::new(host));
        self
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Bind `name` to `value` in the root scope.
    #[must_use]
    pub fn global(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.globals.push((name.to_string(), value.into()));
        self
    }

    /// Bind a native function in the root scope.
    #[must_use]
    pub fn native<F>(self, name: &str, arity: Option<usize>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ApplyError> + Send + Sync + 'static,
    {
        let native = NativeFn::new(name, arity, body);
        self.global(name, Value::Native(native))
    }

    pub fn build(self) -> Interpreter {
        let interner = self.interner.unwrap_or_default();
        let mut frame = Frame::new();
        for &builtin in Builtin::ALL {
            frame.define(interner.intern(builtin.name()), Value::Builtin(builtin));
        }
        for (name, value) in self.globals {
            frame.define(interner.intern(&name), value);
        }
        tracing::debug!(bindings = frame.len(), max_depth = self.config.max_depth, "built interpreter");
        Interpreter {
            root: ScopeChain::empty().child(frame),
            interner,
            host: self.host.unwrap_or_else(|| Arc::new(StdHost)),
            config: self.config,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        InterpreterBuilder::new()
    }
}
