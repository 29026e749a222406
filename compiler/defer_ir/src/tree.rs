//! Shared expression trees and the builder that produces them.

use super::{BuildError, EmbedIdx, Expr, ExprArena, ExprId, ExprKind, ExprRange, Literal, Name, SharedArena, Span};
use defer_stack::ensure_sufficient_stack;
use std::fmt;

/// Handle to an immutable expression tree: a frozen arena plus the root node.
///
/// Cloning is one reference-count increment. Equality is structural: two
/// trees are equal when they have the same shape, names and literals, no
/// matter which arena they live in or which spans they carry.
#[derive(Clone)]
pub struct ExprTree {
    arena: SharedArena,
    root: ExprId,
}

impl ExprTree {
    /// Wrap a finished arena. `root` must index into `arena`.
    pub fn new(arena: SharedArena, root: ExprId) -> Self {
        debug_assert!(root.index() < arena.expr_count());
        ExprTree { arena, root }
    }

    /// Single-node tree holding a symbol.
    pub fn symbol(name: Name) -> Self {
        let mut builder = ExprBuilder::new();
        let root = builder.symbol(name, Span::DUMMY);
        builder.finish(root)
    }

    /// Single-node tree holding a literal.
    pub fn literal(literal: Literal) -> Self {
        let mut builder = ExprBuilder::new();
        let root = builder.literal(literal, Span::DUMMY);
        builder.finish(root)
    }

    /// Single-node tree referring to embed slot `idx`.
    pub fn embed(idx: EmbedIdx) -> Self {
        let mut builder = ExprBuilder::new();
        let root = builder.embed(idx);
        builder.finish(root)
    }

    #[inline]
    pub fn root(&self) -> ExprId {
        self.root
    }

    #[inline]
    pub fn arena(&self) -> &SharedArena {
        &self.arena
    }

    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        self.arena.get_expr(id)
    }

    #[inline]
    pub fn args(&self, range: ExprRange) -> &[ExprId] {
        self.arena.get_expr_list(range)
    }

    /// Kind of the root node.
    #[inline]
    pub fn kind(&self) -> ExprKind {
        self.get(self.root).kind
    }

    /// Span of the root node.
    #[inline]
    pub fn span(&self) -> Span {
        self.get(self.root).span
    }

    /// The root symbol, if the whole tree is a bare name.
    pub fn as_symbol(&self) -> Option<Name> {
        match self.kind() {
            ExprKind::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// The root literal, if the whole tree is a constant.
    pub fn as_literal(&self) -> Option<Literal> {
        match self.kind() {
            ExprKind::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Subtree rooted at `id`, sharing this tree's arena.
    pub fn subtree(&self, id: ExprId) -> ExprTree {
        ExprTree {
            arena: self.arena.clone(),
            root: id,
        }
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            count += 1;
            if let ExprKind::Call { func, args } = self.get(id).kind {
                stack.push(func);
                stack.extend_from_slice(self.args(args));
            }
        }
        count
    }

    /// Whether any node of the tree is an embed.
    pub fn has_embeds(&self) -> bool {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.get(id).kind {
                ExprKind::Embed(_) => return true,
                ExprKind::Call { func, args } => {
                    stack.push(func);
                    stack.extend_from_slice(self.args(args));
                }
                ExprKind::Symbol(_) | ExprKind::Literal(_) => {}
            }
        }
        false
    }
}

impl PartialEq for ExprTree {
    fn eq(&self, other: &Self) -> bool {
        if self.arena.ptr_eq(&other.arena) && self.root == other.root {
            return true;
        }
        let mut stack = vec![(self.root, other.root)];
        while let Some((a, b)) = stack.pop() {
            match (self.get(a).kind, other.get(b).kind) {
                (ExprKind::Symbol(x), ExprKind::Symbol(y)) if x == y => {}
                (ExprKind::Literal(x), ExprKind::Literal(y)) if x == y => {}
                (ExprKind::Embed(x), ExprKind::Embed(y)) if x == y => {}
                (
                    ExprKind::Call { func: fa, args: aa },
                    ExprKind::Call { func: fb, args: ab },
                ) if aa.len() == ab.len() => {
                    stack.push((fa, fb));
                    stack.extend(
                        self.args(aa)
                            .iter()
                            .copied()
                            .zip(other.args(ab).iter().copied()),
                    );
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for ExprTree {}

impl fmt::Debug for ExprTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprTree")
            .field("root", &self.root)
            .field("kind", &self.kind())
            .field("nodes", &self.arena.expr_count())
            .finish()
    }
}

/// Mutable arena wrapper for building new trees.
#[derive(Default)]
pub struct ExprBuilder {
    arena: ExprArena,
}

impl ExprBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(source_len: usize) -> Self {
        ExprBuilder {
            arena: ExprArena::with_capacity(source_len),
        }
    }

    #[inline]
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        self.arena.alloc_expr(expr)
    }

    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        self.arena.get_expr(id)
    }

    pub fn symbol(&mut self, name: Name, span: Span) -> ExprId {
        self.alloc(Expr::new(ExprKind::Symbol(name), span))
    }

    pub fn literal(&mut self, literal: Literal, span: Span) -> ExprId {
        self.alloc(Expr::new(ExprKind::Literal(literal), span))
    }

    pub fn embed(&mut self, idx: EmbedIdx) -> ExprId {
        self.alloc(Expr::synthetic(ExprKind::Embed(idx)))
    }

    /// Call node `func(args...)`. Fails only past `MAX_CALL_ARGS` arguments.
    pub fn call(&mut self, func: ExprId, args: &[ExprId], span: Span) -> Result<ExprId, BuildError> {
        let args = self.arena.alloc_expr_list(args)?;
        Ok(self.alloc(Expr::new(ExprKind::Call { func, args }, span)))
    }

    /// Copy the subtree `id` of `src` into this builder unchanged.
    pub fn copy(&mut self, src: &ExprTree, id: ExprId) -> Result<ExprId, BuildError> {
        self.copy_with(src, id, &mut |_, _| Ok(None))
    }

    /// Copy the subtree `id` of `src`, offering every node to `rewrite` first.
    ///
    /// When `rewrite` returns `Some(new_id)` that node (and everything below
    /// it) is replaced by `new_id`; `None` copies the node and recurses into
    /// its children.
    pub fn copy_with<E, F>(&mut self, src: &ExprTree, id: ExprId, rewrite: &mut F) -> Result<ExprId, E>
    where
        E: From<BuildError>,
        F: FnMut(&mut ExprBuilder, Expr) -> Result<Option<ExprId>, E>,
    {
        let expr = *src.get(id);
        if let Some(replaced) = rewrite(self, expr)? {
            return Ok(replaced);
        }
        match expr.kind {
            ExprKind::Call { func, args } => ensure_sufficient_stack(|| {
                let func = self.copy_with(src, func, rewrite)?;
                let mut new_args = Vec::with_capacity(args.len());
                for &arg in src.args(args) {
                    new_args.push(self.copy_with(src, arg, rewrite)?);
                }
                Ok(self.call(func, &new_args, expr.span)?)
            }),
            ExprKind::Symbol(_) | ExprKind::Literal(_) | ExprKind::Embed(_) => Ok(self.alloc(expr)),
        }
    }

    /// Freeze the arena into a tree rooted at `root`.
    pub fn finish(self, root: ExprId) -> ExprTree {
        ExprTree::new(SharedArena::new(self.arena), root)
    }
}

#[cfg(test)]
mod tests;
