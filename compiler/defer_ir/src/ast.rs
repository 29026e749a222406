//! Expression nodes.
//!
//! The tree has exactly four node shapes. Operators are not special: `a > b`
//! is a call whose callee is the symbol `>`, so substituting into operator
//! position works the same way as substituting into argument position.

use super::{EmbedIdx, ExprId, ExprRange, Name, Span};

/// Literal constant in an expression tree.
///
/// Floats are stored as bits so `Literal` can be `Eq + Hash`; two NaNs with
/// the same payload compare equal here, which is what structural comparison
/// of trees needs.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    /// Interned string contents.
    Str(Name),
}

impl Literal {
    #[inline]
    pub fn float(value: f64) -> Self {
        Literal::Float(value.to_bits())
    }

    /// The float payload, if this is a float literal.
    #[inline]
    pub fn as_float(self) -> Option<f64> {
        match self {
            Literal::Float(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }
}

/// Node kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExprKind {
    /// Free name, resolved at evaluation time.
    Symbol(Name),
    Literal(Literal),
    /// `func(args...)`.
    Call { func: ExprId, args: ExprRange },
    /// Reference into the owning lazy value's embed table.
    Embed(EmbedIdx),
}

/// Expression node: kind plus the source span it came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Node with no source location.
    #[inline]
    pub const fn synthetic(kind: ExprKind) -> Self {
        Expr {
            kind,
            span: Span::DUMMY,
        }
    }
}
