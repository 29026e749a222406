//! Error types for capture, coercion, evaluation and interpolation.
//!
//! Every failure is returned to the immediate caller. Nothing here is retried
//! or recovered internally: all operations are deterministic, so retrying
//! would fail the same way.

use crate::value::Value;
use defer_ir::BuildError;
use defer_parse::ParseError;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Failure to normalize an input into a lazy value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    #[error("cannot parse `{source_text}`: {error}")]
    Parse {
        source_text: String,
        #[source]
        error: ParseError,
    },
    #[error("cannot convert {kind} to a lazy value")]
    Unsupported { kind: String },
    #[error(transparent)]
    TooLarge(#[from] BuildError),
}

/// Rejection of a call by the host evaluator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplyError {
    #[error("attempt to apply non-function ({type_name})")]
    NotCallable { type_name: &'static str },
    #[error("`{name}`: wrong number of arguments (expected {expected}, got {got})")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },
    #[error("invalid argument to `{op}`: {detail}")]
    Type { op: &'static str, detail: String },
    #[error("`{op}` on lists of different lengths ({left} and {right})")]
    LengthMismatch {
        op: &'static str,
        left: usize,
        right: usize,
    },
    #[error("integer overflow in `{op}`")]
    Overflow { op: &'static str },
    #[error("division by zero")]
    DivisionByZero,
    #[error("{0}")]
    Custom(String),
}

impl ApplyError {
    pub(crate) fn type_error(op: &'static str, detail: impl Into<String>) -> Self {
        ApplyError::Type {
            op,
            detail: detail.into(),
        }
    }
}

/// Failure while evaluating a lazy value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// The name resolves in neither the overrides nor the scope chain.
    #[error("object `{name}` not found")]
    UnboundName { name: String },
    /// The host evaluator rejected a call.
    #[error("in `{callee}`: {source}")]
    Apply {
        callee: String,
        #[source]
        source: ApplyError,
    },
    #[error("evaluation nested deeper than {limit} levels")]
    DepthExceeded { limit: usize },
    #[error("embed slot {index} is missing from the lazy value")]
    DanglingEmbed { index: usize },
}

/// Failure while building a new expression by substitution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpError {
    #[error("cannot interpolate `{name}`: {kind} values have no expression form")]
    Unconvertible { name: String, kind: &'static str },
    #[error("invalid template: {0}")]
    Template(#[from] CoercionError),
    #[error(transparent)]
    TooLarge(#[from] BuildError),
}
