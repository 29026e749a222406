//! Lazy values: an unevaluated expression paired with the scope it belongs to.

use crate::scope::ScopeChain;
use crate::value::Value;
use defer_ir::deparse::{
    deparse_with, deparse_with_precedence, write_literal, EmbedRenderer, Precedence, PREC_PRIMARY, PREC_UNARY,
};
use defer_ir::visitor::{walk, SymbolRole, Visitor};
use defer_ir::{EmbedIdx, ExprTree, Name, StringInterner};
use defer_stack::ensure_sufficient_stack;
use std::fmt;
use std::sync::Arc;

/// Contents of an embed slot.
#[derive(Clone, Debug, PartialEq)]
pub enum Embedded {
    /// A lazy value that keeps its own scope.
    Lazy(LazyValue),
    /// An already-computed value with no literal form.
    Value(Value),
}

/// An expression tree, the scope its free names resolve in, and the table
/// its embed nodes index into.
///
/// Immutable. Cloning shares the tree, scope and embed table.
#[derive(Clone, PartialEq)]
pub struct LazyValue {
    expr: ExprTree,
    scope: ScopeChain,
    embeds: Arc<[Embedded]>,
}

impl LazyValue {
    pub fn new(expr: ExprTree, scope: ScopeChain) -> Self {
        LazyValue {
            expr,
            scope,
            embeds: Arc::from([]),
        }
    }

    /// Assemble from parts. Every `Embed` node in `expr` must index `embeds`.
    pub fn from_parts(expr: ExprTree, scope: ScopeChain, embeds: Arc<[Embedded]>) -> Self {
        LazyValue { expr, scope, embeds }
    }

    #[inline]
    pub fn expr(&self) -> &ExprTree {
        &self.expr
    }

    #[inline]
    pub fn scope(&self) -> &ScopeChain {
        &self.scope
    }

    #[inline]
    pub fn embeds(&self) -> &[Embedded] {
        &self.embeds
    }

    pub fn embed(&self, idx: EmbedIdx) -> Option<&Embedded> {
        self.embeds.get(idx.index())
    }

    /// Source-like text, with embedded lazy values written inline.
    pub fn deparse(&self, interner: &StringInterner) -> String {
        deparse_with(&self.expr, interner, self)
    }

    /// Names used in value position, including inside embedded lazy values,
    /// deduplicated in first-seen order.
    pub fn all_names(&self) -> Vec<Name> {
        let mut names = Names::default();
        names.collect(self);
        names.0
    }
}

#[derive(Default)]
struct Names(Vec<Name>);

impl Names {
    fn collect(&mut self, lazy: &LazyValue) {
        struct Walker<'a> {
            lazy: &'a LazyValue,
            names: &'a mut Names,
        }

        impl Visitor for Walker<'_> {
            fn visit_symbol(&mut self, name: Name, role: SymbolRole) {
                if role == SymbolRole::Value && !self.names.0.contains(&name) {
                    self.names.0.push(name);
                }
            }

            fn visit_embed(&mut self, idx: EmbedIdx) {
                if let Some(Embedded::Lazy(inner)) = self.lazy.embed(idx) {
                    ensure_sufficient_stack(|| self.names.collect(inner));
                }
            }
        }

        walk(&lazy.expr, &mut Walker { lazy, names: self });
    }
}

impl EmbedRenderer for LazyValue {
    fn render_embed(&self, idx: EmbedIdx, interner: &StringInterner) -> (String, Precedence) {
        match self.embed(idx) {
            Some(Embedded::Lazy(inner)) => {
                ensure_sufficient_stack(|| deparse_with_precedence(&inner.expr, interner, inner))
            }
            Some(Embedded::Value(value)) => render_value(value, interner),
            None => (format!("<embed#{}>", idx.index()), PREC_PRIMARY),
        }
    }
}

fn render_value(value: &Value, interner: &StringInterner) -> (String, Precedence) {
    if let Some(literal) = value.to_literal(interner) {
        let mut out = String::new();
        write_literal(&mut out, literal, interner);
        let prec = if out.starts_with('-') { PREC_UNARY } else { PREC_PRIMARY };
        return (out, prec);
    }
    let text = match value {
        Value::List(items) => {
            let parts: Vec<_> = items
                .iter()
                .map(|item| ensure_sufficient_stack(|| render_value(item, interner)).0)
                .collect();
            format!("list({})", parts.join(", "))
        }
        other => other.to_string(),
    };
    (text, PREC_PRIMARY)
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyValue")
            .field("expr", &self.expr)
            .field("scope", &self.scope)
            .field("embeds", &self.embeds.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Frame;
    use defer_ir::{ExprBuilder, Literal, Span};
    use defer_parse::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deparse_inlines_embeds() {
        let interner = StringInterner::new();
        let inner = LazyValue::new(parse("a + b", &interner).unwrap(), ScopeChain::empty());

        let mut b = ExprBuilder::new();
        let times = b.symbol(interner.intern("*"), Span::DUMMY);
        let e0 = b.embed(EmbedIdx::new(0));
        let e1 = b.embed(EmbedIdx::new(1));
        let root = b.call(times, &[e0, e1], Span::DUMMY).unwrap();
        let outer = LazyValue::from_parts(
            b.finish(root),
            ScopeChain::empty(),
            Arc::from([
                Embedded::Lazy(inner),
                Embedded::Value(Value::list([Value::Int(1), Value::Int(-2)])),
            ]),
        );

        assert_eq!(outer.deparse(&interner), "(a + b) * list(1, -2)");
    }

    #[test]
    fn test_all_names_descends_into_embeds() {
        let interner = StringInterner::new();
        let scope = ScopeChain::empty().child(Frame::new());
        let inner = LazyValue::new(parse("mean(z) + x", &interner).unwrap(), scope.clone());

        let mut b = ExprBuilder::new();
        let f = b.symbol(interner.intern("f"), Span::DUMMY);
        let x = b.symbol(interner.intern("x"), Span::DUMMY);
        let e0 = b.embed(EmbedIdx::new(0));
        let y = b.symbol(interner.intern("y"), Span::DUMMY);
        let root = b.call(f, &[x, e0, y], Span::DUMMY).unwrap();
        let outer = LazyValue::from_parts(b.finish(root), scope, Arc::from([Embedded::Lazy(inner)]));

        let names: Vec<_> = outer.all_names().into_iter().map(|n| interner.lookup(n)).collect();
        assert_eq!(names, vec!["x", "z", "y"]);
    }

    #[test]
    fn test_equality_is_structural_tree_and_identical_scope() {
        let interner = StringInterner::new();
        let scope = ScopeChain::empty().child(Frame::new());
        let a = LazyValue::new(parse("x + 1", &interner).unwrap(), scope.clone());
        let b = LazyValue::new(parse("x+1", &interner).unwrap(), scope);
        assert_eq!(a, b);
        assert_ne!(a, LazyValue::new(a.expr().clone(), ScopeChain::empty().child(Frame::new())));
        assert_ne!(
            a,
            LazyValue::new(ExprTree::literal(Literal::Int(1)), a.scope().clone())
        );
    }
}
