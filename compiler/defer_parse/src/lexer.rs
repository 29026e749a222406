//! Tokenizer built on `logos`.

use crate::ParseError;
use defer_ir::Span;
use logos::Logos;

/// Token kinds. Payloads (identifier text, number digits, string contents)
/// are recovered from the source through the token's span.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TokenKind {
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    #[regex(r"[A-Za-z_.][A-Za-z0-9_.]*")]
    Ident,
    /// `` `any text` ``: lets operators and odd names appear in callee or
    /// value position.
    #[regex(r"`[^`]*`")]
    QuotedIdent,

    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,
    #[regex(r#""([^"\\]|\\.)*""#)]
    Str,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
}

impl TokenKind {
    /// Operator symbol for tokens that are binary or unary operators.
    pub fn operator_symbol(self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Bang => "!",
            _ => return None,
        })
    }
}

/// A token with its span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Tokenize `source`. Fails on the first byte sequence no token matches.
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = Span::try_from_range(lexer.span()).map_err(|_| ParseError::SourceTooLarge)?;
        match result {
            Ok(kind) => tokens.push(Token { kind, span }),
            Err(()) => return Err(ParseError::InvalidToken { span }),
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_comparison() {
        assert_eq!(
            kinds("mpg > 31"),
            vec![TokenKind::Ident, TokenKind::Gt, TokenKind::Int]
        );
    }

    #[test]
    fn test_lex_longest_match() {
        assert_eq!(
            kinds("a<=b truely 1.5e3 >="),
            vec![
                TokenKind::Ident,
                TokenKind::LtEq,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Float,
                TokenKind::GtEq,
            ]
        );
    }

    #[test]
    fn test_lex_keywords_and_strings() {
        assert_eq!(
            kinds(r#"true false null "a \"q\"" `+`"#),
            vec![
                TokenKind::True,
                TokenKind::False,
                TokenKind::Null,
                TokenKind::Str,
                TokenKind::QuotedIdent,
            ]
        );
    }

    #[test]
    fn test_lex_spans() {
        let tokens = lex("x  >= 10").unwrap();
        assert_eq!(tokens[1].span, Span::new(3, 5));
        assert_eq!(tokens[2].span, Span::new(6, 8));
    }

    #[test]
    fn test_lex_rejects_unknown_character() {
        assert_eq!(
            lex("x # y"),
            Err(ParseError::InvalidToken {
                span: Span::new(2, 3)
            })
        );
    }
}
