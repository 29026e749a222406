//! Turn expression trees back into source-like text.
//!
//! Calls whose callee is a binary operator symbol print infix, unary `-` and
//! `!` print prefix, everything else prints as `f(a, b)`. Parentheses are
//! inserted from the same precedence table the parser uses, so deparsed text
//! parses back to an equal tree (float special values excepted).

use super::{EmbedIdx, ExprId, ExprKind, ExprTree, Literal, StringInterner};
use defer_stack::ensure_sufficient_stack;
use std::fmt::Write as _;

/// Binding strength of rendered text. Higher binds tighter.
pub type Precedence = u8;

pub const PREC_OR: Precedence = 1;
pub const PREC_AND: Precedence = 2;
pub const PREC_EQUALITY: Precedence = 3;
pub const PREC_COMPARISON: Precedence = 4;
pub const PREC_ADDITIVE: Precedence = 5;
pub const PREC_MULTIPLICATIVE: Precedence = 6;
pub const PREC_UNARY: Precedence = 7;
pub const PREC_PRIMARY: Precedence = 8;

/// Precedence of a binary operator symbol, if it is one.
pub fn binary_precedence(op: &str) -> Option<Precedence> {
    Some(match op {
        "||" => PREC_OR,
        "&&" => PREC_AND,
        "==" | "!=" => PREC_EQUALITY,
        "<" | "<=" | ">" | ">=" => PREC_COMPARISON,
        "+" | "-" => PREC_ADDITIVE,
        "*" | "/" | "%" => PREC_MULTIPLICATIVE,
        _ => return None,
    })
}

/// Whether `op` has a prefix form.
pub fn is_unary_operator(op: &str) -> bool {
    matches!(op, "-" | "!")
}

/// Whether `s` can be written as a bare identifier.
pub fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '.')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
        && !matches!(s, "true" | "false" | "null")
}

/// Supplies text for embed nodes.
pub trait EmbedRenderer {
    /// Text for slot `idx` and the precedence it should be treated with.
    fn render_embed(&self, idx: EmbedIdx, interner: &StringInterner) -> (String, Precedence);
}

/// Renders embeds as opaque `<embed#N>` markers.
pub struct OpaqueEmbeds;

impl EmbedRenderer for OpaqueEmbeds {
    fn render_embed(&self, idx: EmbedIdx, _interner: &StringInterner) -> (String, Precedence) {
        (format!("<embed#{}>", idx.index()), PREC_PRIMARY)
    }
}

/// Deparse with embeds shown as opaque markers.
pub fn deparse(tree: &ExprTree, interner: &StringInterner) -> String {
    deparse_with(tree, interner, &OpaqueEmbeds)
}

/// Deparse, asking `embeds` for the text of embed nodes.
pub fn deparse_with(tree: &ExprTree, interner: &StringInterner, embeds: &dyn EmbedRenderer) -> String {
    deparse_with_precedence(tree, interner, embeds).0
}

/// Deparsed text together with the precedence it binds at, for callers that
/// place it inside larger text.
pub fn deparse_with_precedence(
    tree: &ExprTree,
    interner: &StringInterner,
    embeds: &dyn EmbedRenderer,
) -> (String, Precedence) {
    let deparser = Deparser {
        tree,
        interner,
        embeds,
    };
    let root = tree.root();
    if let ExprKind::Embed(idx) = tree.get(root).kind {
        return embeds.render_embed(idx, interner);
    }
    let mut out = String::new();
    deparser.write(&mut out, root);
    (out, deparser.precedence(root))
}

struct Deparser<'a> {
    tree: &'a ExprTree,
    interner: &'a StringInterner,
    embeds: &'a dyn EmbedRenderer,
}

impl Deparser<'_> {
    fn operator_of(&self, func: ExprId) -> Option<&'static str> {
        match self.tree.get(func).kind {
            ExprKind::Symbol(name) => Some(self.interner.lookup(name)),
            _ => None,
        }
    }

    /// Precedence of a non-embed node, from the node alone.
    fn precedence(&self, id: ExprId) -> Precedence {
        match self.tree.get(id).kind {
            ExprKind::Call { func, args } => match (self.operator_of(func), args.len()) {
                (Some(op), 2) => binary_precedence(op).unwrap_or(PREC_PRIMARY),
                (Some(op), 1) if is_unary_operator(op) => PREC_UNARY,
                _ => PREC_PRIMARY,
            },
            ExprKind::Literal(Literal::Int(n)) if n < 0 => PREC_UNARY,
            ExprKind::Literal(lit @ Literal::Float(_))
                if lit.as_float().is_some_and(|f| f.is_sign_negative()) =>
            {
                PREC_UNARY
            }
            ExprKind::Symbol(_) | ExprKind::Literal(_) | ExprKind::Embed(_) => PREC_PRIMARY,
        }
    }

    fn write(&self, out: &mut String, id: ExprId) {
        match self.tree.get(id).kind {
            ExprKind::Symbol(name) => write_name(out, self.interner.lookup(name)),
            ExprKind::Literal(lit) => write_literal(out, lit, self.interner),
            ExprKind::Embed(idx) => out.push_str(&self.embeds.render_embed(idx, self.interner).0),
            ExprKind::Call { func, args } => ensure_sufficient_stack(|| self.write_call(out, func, self.tree.args(args))),
        }
    }

    fn write_call(&self, out: &mut String, func: ExprId, args: &[ExprId]) {
        match (self.operator_of(func), args) {
            (Some(op), &[lhs, rhs]) if binary_precedence(op).is_some() => {
                let prec = binary_precedence(op).unwrap_or(PREC_PRIMARY);
                // Left-associative: the right operand needs parens at
                // equal precedence, the left one does not.
                self.operand(out, lhs, prec);
                let _ = write!(out, " {op} ");
                self.operand(out, rhs, prec + 1);
            }
            (Some(op), &[operand]) if is_unary_operator(op) => {
                out.push_str(op);
                // `-5` would read back as a negative literal
                let numeric = matches!(
                    self.tree.get(operand).kind,
                    ExprKind::Literal(Literal::Int(_) | Literal::Float(_))
                );
                let min = if op == "-" && numeric { PREC_PRIMARY + 1 } else { PREC_UNARY };
                self.operand(out, operand, min);
            }
            _ => {
                self.operand(out, func, PREC_PRIMARY);
                out.push('(');
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write(out, arg);
                }
                out.push(')');
            }
        }
    }

    /// Write `id`, parenthesised if it binds looser than `min`.
    fn operand(&self, out: &mut String, id: ExprId, min: Precedence) {
        if let ExprKind::Embed(idx) = self.tree.get(id).kind {
            let (text, prec) = self.embeds.render_embed(idx, self.interner);
            push_grouped(out, &text, prec < min);
            return;
        }
        let parens = self.precedence(id) < min;
        if parens {
            out.push('(');
        }
        self.write(out, id);
        if parens {
            out.push(')');
        }
    }
}

fn push_grouped(out: &mut String, text: &str, parens: bool) {
    if parens {
        out.push('(');
        out.push_str(text);
        out.push(')');
    } else {
        out.push_str(text);
    }
}

fn write_name(out: &mut String, name: &str) {
    if is_plain_identifier(name) {
        out.push_str(name);
    } else {
        out.push('`');
        out.push_str(name);
        out.push('`');
    }
}

/// Append the source form of a literal.
pub fn write_literal(out: &mut String, lit: Literal, interner: &StringInterner) {
    match lit {
        Literal::Null => out.push_str("null"),
        Literal::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Literal::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Literal::Float(bits) => {
            // `{:?}` keeps the trailing `.0` that marks a float
            let _ = write!(out, "{:?}", f64::from_bits(bits));
        }
        Literal::Str(name) => {
            out.push('"');
            for c in interner.lookup(name).chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    c => out.push(c),
                }
            }
            out.push('"');
        }
    }
}
