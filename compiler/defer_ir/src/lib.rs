//! Defer IR - expression trees for deferred evaluation.
//!
//! This crate contains the tree representation the rest of the workspace
//! captures, rewrites and evaluates:
//! - `Name` / `StringInterner` for interned identifiers
//! - `Span` for source locations
//! - `ExprArena` + `ExprId` flat node storage, frozen into `SharedArena`
//! - `ExprTree`, the cheap-to-clone handle to an immutable tree
//! - `ExprBuilder` for constructing new trees (parser, interpolation)
//! - `deparse` for turning trees back into text
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and string literals are `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId` indices
//! - **Freeze, then share**: a tree is never mutated once built; rewriting
//!   always builds a new arena

mod arena;
mod ast;
pub mod deparse;
mod expr_id;
mod interner;
mod name;
mod span;
mod tree;
pub mod visitor;

pub use arena::{BuildError, ExprArena, SharedArena, MAX_CALL_ARGS};
pub use ast::{Expr, ExprKind, Literal};
pub use deparse::{deparse, deparse_with, EmbedRenderer, Precedence};
pub use expr_id::{EmbedIdx, ExprId, ExprRange};
pub use interner::{SharedInterner, StringInterner, OPERATOR_SYMBOLS};
pub use name::Name;
pub use span::{Span, SpanError};
pub use tree::{ExprBuilder, ExprTree};
