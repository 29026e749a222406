//! Defer Parse - source text to expression trees.
//!
//! A deliberately small infix grammar: literals (`42`, `1.5`, `"text"`,
//! `true`, `false`, `null`), identifiers (plain or `` `quoted` ``), calls
//! `f(a, b)`, prefix `-`/`!` and the binary operators
//! `|| && == != < <= > >= + - * / %` (loosest to tightest, all
//! left-associative). Every operator parses to a call whose callee is the
//! operator symbol.

mod lexer;
mod parser;

pub use lexer::{lex, Token, TokenKind};
pub use parser::{Parser, MAX_NESTING};

use defer_ir::{ExprTree, Span, StringInterner};

/// Errors produced while turning text into a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected}, found `{found}`")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        span: Span,
    },
    #[error("expected {expected}, found end of input")]
    UnexpectedEof { expected: &'static str },
    #[error("unrecognized character sequence")]
    InvalidToken { span: Span },
    #[error("number `{text}` is out of range")]
    InvalidNumber { text: String, span: Span },
    #[error("unsupported escape sequence in string literal")]
    InvalidEscape { span: Span },
    #[error("unexpected input after complete expression")]
    TrailingInput { span: Span },
    #[error("call has {count} arguments; at most {max} are supported", max = defer_ir::MAX_CALL_ARGS)]
    TooManyArguments { count: usize, span: Span },
    #[error("expression nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
    #[error("source text is too large")]
    SourceTooLarge,
    #[error("empty expression")]
    Empty,
}

impl ParseError {
    /// Source location the error points at, when there is one.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::InvalidToken { span }
            | ParseError::InvalidNumber { span, .. }
            | ParseError::InvalidEscape { span }
            | ParseError::TooManyArguments { span, .. }
            | ParseError::TrailingInput { span } => Some(*span),
            ParseError::UnexpectedEof { .. }
            | ParseError::NestingTooDeep { .. }
            | ParseError::SourceTooLarge
            | ParseError::Empty => None,
        }
    }
}

/// Parse `source` into a frozen expression tree.
#[tracing::instrument(level = "trace", skip(interner))]
pub fn parse(source: &str, interner: &StringInterner) -> Result<ExprTree, ParseError> {
    let tokens = lex(source)?;
    Parser::new(source, tokens, interner).parse()
}

#[cfg(test)]
mod tests;
