//! Tree-walking evaluation of lazy values.

use super::Interpreter;
use crate::dots::LazyDots;
use crate::errors::{EvalError, EvalResult};
use crate::lazy::{Embedded, LazyValue};
use crate::scope::Frame;
use crate::value::Value;
use defer_ir::{deparse_with, ExprId, ExprKind, Name};
use defer_stack::ensure_sufficient_stack;

impl Interpreter {
    /// Evaluate `lazy` in its own scope.
    ///
    /// Every free name is looked up in `overrides` first and then along the
    /// lazy value's scope chain. Embedded lazy values are evaluated in their
    /// own scopes, with the same overrides. Calls evaluate the callee, then
    /// the arguments left to right, then hand both to the host.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate(&self, lazy: &LazyValue, overrides: Option<&Frame>) -> EvalResult {
        let mut walker = Walker {
            interp: self,
            overrides,
            depth: 0,
        };
        walker.eval_lazy(lazy)
    }

    /// Evaluate each entry of `dots`, keeping names.
    pub fn evaluate_dots(&self, dots: &LazyDots, overrides: Option<&Frame>) -> Result<Vec<(Option<Name>, Value)>, EvalError> {
        dots.iter()
            .map(|(name, lazy)| Ok((name, self.evaluate(lazy, overrides)?)))
            .collect()
    }
}

struct Walker<'a> {
    interp: &'a Interpreter,
    overrides: Option<&'a Frame>,
    depth: usize,
}

impl Walker<'_> {
    fn eval_lazy(&mut self, lazy: &LazyValue) -> EvalResult {
        self.eval_node(lazy, lazy.expr().root())
    }

    fn eval_node(&mut self, lazy: &LazyValue, id: ExprId) -> EvalResult {
        if self.depth >= self.interp.config.max_depth {
            return Err(EvalError::DepthExceeded {
                limit: self.interp.config.max_depth,
            });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.eval_kind(lazy, id));
        self.depth -= 1;
        result
    }

    fn eval_kind(&mut self, lazy: &LazyValue, id: ExprId) -> EvalResult {
        match lazy.expr().get(id).kind {
            ExprKind::Literal(literal) => Ok(Value::from_literal(literal, self.interp.interner())),
            ExprKind::Symbol(name) => self.resolve(lazy, name),
            ExprKind::Embed(idx) => match lazy.embed(idx) {
                Some(Embedded::Lazy(inner)) => self.eval_lazy(inner),
                Some(Embedded::Value(value)) => Ok(value.clone()),
                None => Err(EvalError::DanglingEmbed { index: idx.index() }),
            },
            ExprKind::Call { func, args } => {
                let callee = self.eval_node(lazy, func)?;
                let arg_ids = lazy.expr().args(args);
                let mut values = Vec::with_capacity(arg_ids.len());
                for &arg in arg_ids {
                    values.push(self.eval_node(lazy, arg)?);
                }
                self.interp
                    .host
                    .apply(&callee, &values)
                    .map_err(|source| EvalError::Apply {
                        callee: deparse_with(&lazy.expr().subtree(func), self.interp.interner(), lazy),
                        source,
                    })
            }
        }
    }

    fn resolve(&self, lazy: &LazyValue, name: Name) -> EvalResult {
        self.overrides
            .and_then(|overrides| overrides.get(name))
            .or_else(|| lazy.scope().lookup(name))
            .cloned()
            .ok_or_else(|| EvalError::UnboundName {
                name: self.interp.interner().lookup(name).to_string(),
            })
    }
}
