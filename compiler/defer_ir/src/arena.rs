//! Arena allocation for flat expression trees.
//!
//! - Contiguous storage for all nodes of one tree
//! - Child references are `ExprId` indices
//! - Argument lists are `ExprRange` slices of `expr_lists`
//!
//! An arena is mutable only while a tree is being built (by the parser, the
//! interpolator or a call builder). Once wrapped in a [`SharedArena`] it is
//! frozen and may be shared by any number of lazy values.

use super::{Expr, ExprId, ExprRange};
use std::fmt;
use std::sync::Arc;

/// Most arguments a single call node can hold.
pub const MAX_CALL_ARGS: usize = u16::MAX as usize;

/// A tree that cannot be represented in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("call has {count} arguments; at most {max} are supported", max = MAX_CALL_ARGS)]
    TooManyArguments { count: usize },
    #[error("expression has more embedded pieces than an embed table can index")]
    TooManyEmbeds,
    #[error("expression arena is full")]
    ArenaFull,
}

/// Contiguous storage for the nodes of an expression tree.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ExprArena {
    /// All expressions (indexed by `ExprId`).
    exprs: Vec<Expr>,
    /// Flattened call argument lists.
    expr_lists: Vec<ExprId>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with estimated capacity based on source size.
    /// Heuristic: ~1 expression per 4 bytes of source.
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated = source_len / 4;
        ExprArena {
            exprs: Vec::with_capacity(estimated),
            expr_lists: Vec::with_capacity(estimated / 2),
        }
    }

    /// Allocate expression, return ID.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` nodes.
    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let index = u32::try_from(self.exprs.len()).unwrap_or_else(|_| panic!("expression arena overflow"));
        self.exprs.push(expr);
        ExprId::new(index)
    }

    /// Get expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Allocate an argument list, return its range.
    pub fn alloc_expr_list(&mut self, exprs: &[ExprId]) -> Result<ExprRange, BuildError> {
        let len = u16::try_from(exprs.len()).map_err(|_| BuildError::TooManyArguments { count: exprs.len() })?;
        let start = u32::try_from(self.expr_lists.len())
            .ok()
            .filter(|start| start.checked_add(u32::from(len)).is_some())
            .ok_or(BuildError::ArenaFull)?;
        self.expr_lists.extend_from_slice(exprs);
        Ok(ExprRange::new(start, len))
    }

    /// Get argument list by range.
    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        let end = start + range.len();
        &self.expr_lists[start..end]
    }
}

impl fmt::Debug for ExprArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprArena")
            .field("exprs", &self.exprs.len())
            .field("expr_lists", &self.expr_lists.len())
            .finish()
    }
}

/// Frozen, reference-counted arena.
#[derive(Clone, Debug, Default)]
pub struct SharedArena(Arc<ExprArena>);

impl SharedArena {
    pub fn new(arena: ExprArena) -> Self {
        SharedArena(Arc::new(arena))
    }

    /// Whether both handles point at the same arena allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &SharedArena) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for SharedArena {
    type Target = ExprArena;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
