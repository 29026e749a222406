//! Building new lazy values by substitution (quasiquotation).

use super::Interpreter;
use crate::coerce::{value_node, LazyInput};
use crate::dots::LazyDots;
use crate::errors::InterpError;
use crate::lazy::{Embedded, LazyValue};
use crate::scope::ScopeChain;
use crate::value::Value;
use defer_ir::{BuildError, EmbedIdx, Expr, ExprBuilder, ExprId, ExprKind, Name, Span};

/// Replacement for one placeholder name.
#[derive(Clone, Debug, PartialEq)]
pub enum Substitution {
    /// Spliced as a subtree that keeps its own scope.
    Lazy(LazyValue),
    /// Spliced as a literal (lists as a `list(...)` call).
    Value(Value),
}

/// Placeholder names and their replacements. A later entry for the same
/// name wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Substitutions {
    entries: Vec<(Name, Substitution)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Substitutions::default()
    }

    #[must_use]
    pub fn lazy(mut self, name: Name, lazy: LazyValue) -> Self {
        self.entries.push((name, Substitution::Lazy(lazy)));
        self
    }

    #[must_use]
    pub fn value(mut self, name: Name, value: impl Into<Value>) -> Self {
        self.entries.push((name, Substitution::Value(value.into())));
        self
    }

    /// Add every named entry of `dots` as a lazy substitution.
    #[must_use]
    pub fn extend(mut self, dots: &LazyDots) -> Self {
        for (name, lazy) in dots.iter() {
            if let Some(name) = name {
                self.entries.push((name, Substitution::Lazy(lazy.clone())));
            }
        }
        self
    }

    pub fn get(&self, name: Name) -> Option<&Substitution> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| *n == name)
            .map(|(_, sub)| sub)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates the tree and embed table of the lazy value being built.
struct Splicer<'a> {
    interp: &'a Interpreter,
    scope: &'a ScopeChain,
    embeds: Vec<Embedded>,
}

impl Splicer<'_> {
    /// Place `lazy` into `b`. A lazy value that already lives in the target
    /// scope and carries no embeds of its own is copied in as plain nodes;
    /// anything else becomes an embed node so it keeps its own scope.
    fn splice(&mut self, b: &mut ExprBuilder, lazy: &LazyValue) -> Result<ExprId, BuildError> {
        if lazy.scope() == self.scope && lazy.embeds().is_empty() {
            return b.copy(lazy.expr(), lazy.expr().root());
        }
        let idx = u32::try_from(self.embeds.len()).map_err(|_| BuildError::TooManyEmbeds)?;
        self.embeds.push(Embedded::Lazy(lazy.clone()));
        Ok(b.embed(EmbedIdx::new(idx)))
    }

    fn finish(self, b: ExprBuilder, root: ExprId) -> LazyValue {
        LazyValue::from_parts(b.finish(root), self.scope.clone(), self.embeds.into())
    }
}

impl Interpreter {
    /// Copy `template`, replacing every symbol named in `subs`.
    ///
    /// The result lives in the template's scope. Replacements apply in any
    /// position, callee included; names not in `subs` are left alone, and
    /// the template itself is never modified.
    pub fn interp(&self, template: impl Into<LazyInput>, subs: &Substitutions) -> Result<LazyValue, InterpError> {
        let template = self.as_lazy(template)?;
        tracing::debug!(substitutions = subs.len(), "interpolating");

        let mut splicer = Splicer {
            interp: self,
            scope: template.scope(),
            embeds: template.embeds().to_vec(),
        };
        let mut b = ExprBuilder::with_capacity(template.expr().node_count());
        let tree = template.expr();
        let root = b.copy_with(tree, tree.root(), &mut |b: &mut ExprBuilder, expr: Expr| -> Result<_, InterpError> {
            let ExprKind::Symbol(name) = expr.kind else {
                return Ok(None);
            };
            match subs.get(name) {
                None => Ok(None),
                Some(Substitution::Lazy(lazy)) => Ok(Some(splicer.splice(b, lazy)?)),
                Some(Substitution::Value(value)) => match value_node(b, value, splicer.interp.interner())? {
                    Some(id) => Ok(Some(id)),
                    None => Err(InterpError::Unconvertible {
                        name: splicer.interp.interner().lookup(name).to_string(),
                        kind: value.type_name(),
                    }),
                },
            }
        })?;
        Ok(splicer.finish(b, root))
    }

    /// Build the call `func(args...)`.
    ///
    /// The call lives in the scope all arguments share, or in the root scope
    /// when they differ or there are none; pieces from any other scope are
    /// embedded so each keeps its own.
    pub fn make_call(&self, func: impl Into<LazyInput>, args: &LazyDots) -> Result<LazyValue, InterpError> {
        let func = self.as_lazy(func)?;
        let scope = args.common_scope(&self.root);
        let mut splicer = Splicer {
            interp: self,
            scope: &scope,
            embeds: Vec::new(),
        };
        let mut b = ExprBuilder::new();
        let callee = splicer.splice(&mut b, &func)?;
        let arg_ids = args
            .values()
            .map(|arg| splicer.splice(&mut b, arg))
            .collect::<Result<Vec<_>, _>>()?;
        let root = b.call(callee, &arg_ids, Span::DUMMY)?;
        Ok(splicer.finish(b, root))
    }
}
