//! Read-only traversal of expression trees.

use super::{EmbedIdx, ExprId, ExprKind, ExprTree, Name};
use defer_stack::ensure_sufficient_stack;

/// Where a symbol sits in its parent.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SymbolRole {
    /// Callee of a call node.
    Callee,
    /// Anywhere else.
    Value,
}

/// Visitor over expression nodes, pre-order, callee before arguments.
pub trait Visitor {
    fn visit_symbol(&mut self, _name: Name, _role: SymbolRole) {}

    fn visit_embed(&mut self, _idx: EmbedIdx) {}
}

/// Walk `tree` in evaluation order.
pub fn walk(tree: &ExprTree, visitor: &mut dyn Visitor) {
    walk_node(tree, tree.root(), SymbolRole::Value, visitor);
}

fn walk_node(tree: &ExprTree, id: ExprId, role: SymbolRole, visitor: &mut dyn Visitor) {
    match tree.get(id).kind {
        ExprKind::Symbol(name) => visitor.visit_symbol(name, role),
        ExprKind::Embed(idx) => visitor.visit_embed(idx),
        ExprKind::Literal(_) => {}
        ExprKind::Call { func, args } => ensure_sufficient_stack(|| {
            walk_node(tree, func, SymbolRole::Callee, visitor);
            for &arg in tree.args(args) {
                walk_node(tree, arg, SymbolRole::Value, visitor);
            }
        }),
    }
}
