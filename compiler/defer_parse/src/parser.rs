//! Precedence-climbing parser from tokens to an `ExprTree`.
//!
//! Binary operators share the precedence table `defer_ir::deparse` prints
//! with, which keeps `parse(deparse(t)) == t`.

use crate::lexer::{Token, TokenKind};
use crate::ParseError;
use defer_ir::deparse::{binary_precedence, Precedence, PREC_OR};
use defer_ir::{BuildError, ExprBuilder, ExprId, ExprTree, Literal, Span, StringInterner};
use defer_stack::ensure_sufficient_stack;

/// Deepest nesting of parentheses, unary operators and calls accepted.
pub const MAX_NESTING: usize = 512;

pub struct Parser<'src, 'i> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    interner: &'i StringInterner,
    builder: ExprBuilder,
    depth: usize,
}

impl<'src, 'i> Parser<'src, 'i> {
    pub fn new(source: &'src str, tokens: Vec<Token>, interner: &'i StringInterner) -> Self {
        Parser {
            source,
            tokens,
            pos: 0,
            interner,
            builder: ExprBuilder::with_capacity(source.len()),
            depth: 0,
        }
    }

    /// Parse the whole token stream as one expression.
    pub fn parse(mut self) -> Result<ExprTree, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        let root = self.expression(PREC_OR)?;
        if let Some(token) = self.peek() {
            return Err(ParseError::TrailingInput { span: token.span });
        }
        Ok(self.builder.finish(root))
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        match self.advance() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(self.unexpected(token, expected)),
            None => Err(ParseError::UnexpectedEof { expected }),
        }
    }

    fn unexpected(&self, token: Token, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            found: self.text(token.span).to_owned(),
            expected,
            span: token.span,
        }
    }

    fn text(&self, span: Span) -> &'src str {
        &self.source[span.to_range()]
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ParseError::NestingTooDeep { limit: MAX_NESTING });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn span_of(&self, id: ExprId) -> Span {
        self.builder.get(id).span
    }

    fn operator(&mut self, symbol: &str, span: Span) -> ExprId {
        let name = self.interner.intern(symbol);
        self.builder.symbol(name, span)
    }

    fn call(&mut self, func: ExprId, args: &[ExprId], span: Span) -> Result<ExprId, ParseError> {
        self.builder.call(func, args, span).map_err(|error| match error {
            BuildError::TooManyArguments { count } => ParseError::TooManyArguments { count, span },
            BuildError::TooManyEmbeds | BuildError::ArenaFull => ParseError::SourceTooLarge,
        })
    }

    fn binary_op(&self) -> Option<(&'static str, Precedence)> {
        let symbol = self.peek_kind()?.operator_symbol()?;
        binary_precedence(symbol).map(|prec| (symbol, prec))
    }

    fn expression(&mut self, min: Precedence) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.binary(min))
    }

    fn binary(&mut self, min: Precedence) -> Result<ExprId, ParseError> {
        self.enter()?;
        let mut lhs = self.unary()?;
        while let Some((symbol, prec)) = self.binary_op() {
            if prec < min {
                break;
            }
            let Some(op_token) = self.advance() else {
                break;
            };
            // Left-associative: the right side only takes tighter operators.
            let rhs = self.expression(prec + 1)?;
            let func = self.operator(symbol, op_token.span);
            let span = self.span_of(lhs).merge(self.span_of(rhs));
            lhs = self.call(func, &[lhs, rhs], span)?;
        }
        self.leave();
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<ExprId, ParseError> {
        let Some(token) = self.peek() else {
            return Err(ParseError::UnexpectedEof {
                expected: "expression",
            });
        };
        match token.kind {
            TokenKind::Minus | TokenKind::Bang => {
                self.advance();
                // `-` directly followed by a number is a negative literal, so
                // deparsed negative constants read back as constants.
                if token.kind == TokenKind::Minus {
                    if let Some(number) = self.peek().filter(|t| matches!(t.kind, TokenKind::Int | TokenKind::Float)) {
                        self.advance();
                        let span = token.span.merge(number.span);
                        let literal = self.number(number, true)?;
                        return Ok(self.builder.literal(literal, span));
                    }
                }
                self.enter()?;
                let operand = self.unary()?;
                self.leave();
                let symbol = if token.kind == TokenKind::Minus { "-" } else { "!" };
                let func = self.operator(symbol, token.span);
                let span = token.span.merge(self.span_of(operand));
                self.call(func, &[operand], span)
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.primary()?;
        while self.peek_kind() == Some(TokenKind::LParen) {
            self.enter()?;
            self.advance();
            let mut args = Vec::new();
            if self.peek_kind() != Some(TokenKind::RParen) {
                loop {
                    args.push(self.expression(PREC_OR)?);
                    if self.peek_kind() == Some(TokenKind::Comma) {
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
            let close = self.expect(TokenKind::RParen, "`,` or `)`")?;
            self.leave();
            let span = self.span_of(expr).merge(close.span);
            expr = self.call(expr, &args, span)?;
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<ExprId, ParseError> {
        let Some(token) = self.advance() else {
            return Err(ParseError::UnexpectedEof {
                expected: "expression",
            });
        };
        let span = token.span;
        match token.kind {
            TokenKind::True => Ok(self.builder.literal(Literal::Bool(true), span)),
            TokenKind::False => Ok(self.builder.literal(Literal::Bool(false), span)),
            TokenKind::Null => Ok(self.builder.literal(Literal::Null, span)),
            TokenKind::Int | TokenKind::Float => {
                let literal = self.number(token, false)?;
                Ok(self.builder.literal(literal, span))
            }
            TokenKind::Str => {
                let contents = unescape(self.text(span), span)?;
                let name = self.interner.intern(&contents);
                Ok(self.builder.literal(Literal::Str(name), span))
            }
            TokenKind::Ident => {
                let name = self.interner.intern(self.text(span));
                Ok(self.builder.symbol(name, span))
            }
            TokenKind::QuotedIdent => {
                let text = self.text(span);
                let name = self.interner.intern(&text[1..text.len() - 1]);
                Ok(self.builder.symbol(name, span))
            }
            TokenKind::LParen => {
                self.enter()?;
                let inner = self.expression(PREC_OR)?;
                self.expect(TokenKind::RParen, "`)`")?;
                self.leave();
                Ok(inner)
            }
            _ => Err(self.unexpected(token, "expression")),
        }
    }

    fn number(&self, token: Token, negative: bool) -> Result<Literal, ParseError> {
        let digits = self.text(token.span);
        let text = if negative {
            format!("-{digits}")
        } else {
            digits.to_owned()
        };
        let parsed = if token.kind == TokenKind::Int {
            text.parse::<i64>().ok().map(Literal::Int)
        } else {
            text.parse::<f64>().ok().map(Literal::float)
        };
        parsed.ok_or(ParseError::InvalidNumber {
            text,
            span: token.span,
        })
    }
}

/// Strip the quotes from a string token and resolve its escapes.
fn unescape(quoted: &str, span: Span) -> Result<String, ParseError> {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            _ => return Err(ParseError::InvalidEscape { span }),
        }
    }
    Ok(out)
}
