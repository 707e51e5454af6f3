//! Recursive-descent parser.
//!
//! # Grammar
//!
//! Precedence from loosest to tightest binding: `OR`, `AND`, `NOT`, primary.
//!
//! ```text
//! expression := term (OR term)*
//! term       := factor (AND factor)*
//! factor     := NOT factor | primary
//! primary    := FIELD | '(' expression ')'
//! ```
//!
//! Adjacent terms without an operator are not joined implicitly; they are
//! reported as trailing input.
//!
//! # Errors
//!
//! Errors are values ([`ParseError`]) carrying a message and the character
//! position of the offending token. The parser never panics on user input.

use serde::Serialize;

use crate::ast::{Expr, FieldPredicate};
use crate::lexer::{Token, TokenKind, tokenize};

/// Deepest accepted nesting of parentheses and `NOT` chains.
pub const MAX_NESTING: usize = 128;

/// A parse failure and where it happened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (at position {position})")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Flat result shape handed to UI code that wants `success`/`error` fields
/// instead of a `Result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast: Option<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_position: Option<usize>,
}

impl From<Result<Option<Expr>, ParseError>> for ParseOutcome {
    fn from(result: Result<Option<Expr>, ParseError>) -> Self {
        match result {
            Ok(ast) => Self {
                success: true,
                ast,
                error: None,
                error_position: None,
            },
            Err(err) => Self {
                success: false,
                ast: None,
                error: Some(err.message),
                error_position: Some(err.position),
            },
        }
    }
}

/// Tokenize and parse `input`.
///
/// # Errors
///
/// Returns a [`ParseError`] for unbalanced parentheses, dangling operators,
/// or input left over after a complete expression.
pub fn parse_query(input: &str) -> Result<Option<Expr>, ParseError> {
    parse(&tokenize(input))
}

/// Parse a token stream.
///
/// `Ok(None)` means the stream held no terms (empty query), which callers
/// treat as "match everything".
///
/// # Errors
///
/// See [`parse_query`].
pub fn parse(tokens: &[Token]) -> Result<Option<Expr>, ParseError> {
    let mut parser = Parser::new(tokens);
    if parser.at_eof() {
        return Ok(None);
    }

    let expr = parser.expression(0)?;

    if !parser.at_eof() {
        let (kind, position) = parser.peek();
        return Err(ParseError::new(
            format!("Unexpected {} after end of expression", kind.describe()),
            position,
        ));
    }

    Ok(Some(expr))
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    const fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Current token kind and position; past the end reads as EOF.
    fn peek(&self) -> (&'t TokenKind, usize) {
        const EOF: &TokenKind = &TokenKind::Eof;
        match self.tokens.get(self.pos) {
            Some(token) => (&token.kind, token.position),
            None => (EOF, self.tokens.last().map_or(0, |t| t.position)),
        }
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().0, TokenKind::Eof)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), ParseError> {
        if depth > MAX_NESTING {
            return Err(ParseError::new(
                format!("Query nests deeper than {MAX_NESTING} levels"),
                self.peek().1,
            ));
        }
        Ok(())
    }

    fn expression(&mut self, depth: usize) -> Result<Expr, ParseError> {
        let mut left = self.term(depth)?;
        while matches!(self.peek().0, TokenKind::Or) {
            self.advance();
            let right = self.term(depth)?;
            left = Expr::or(left, right);
        }
        Ok(left)
    }

    fn term(&mut self, depth: usize) -> Result<Expr, ParseError> {
        let mut left = self.factor(depth)?;
        while matches!(self.peek().0, TokenKind::And) {
            self.advance();
            let right = self.factor(depth)?;
            left = Expr::and(left, right);
        }
        Ok(left)
    }

    fn factor(&mut self, depth: usize) -> Result<Expr, ParseError> {
        if matches!(self.peek().0, TokenKind::Not) {
            self.check_depth(depth + 1)?;
            self.advance();
            let operand = self.factor(depth + 1)?;
            return Ok(Expr::not(operand));
        }
        self.primary(depth)
    }

    fn primary(&mut self, depth: usize) -> Result<Expr, ParseError> {
        let (kind, position) = self.peek();
        match kind {
            TokenKind::Field { field, value } => {
                self.advance();
                Ok(Expr::Field(FieldPredicate::parse(field, value)))
            }
            TokenKind::LParen => {
                self.check_depth(depth + 1)?;
                self.advance();
                let inner = self.expression(depth + 1)?;
                let (next, next_position) = self.peek();
                if matches!(next, TokenKind::RParen) {
                    self.advance();
                    Ok(inner)
                } else {
                    Err(ParseError::new(
                        format!(
                            "Expected closing parenthesis ')' for '(' at position {position}, found {}",
                            next.describe()
                        ),
                        next_position,
                    ))
                }
            }
            TokenKind::RParen => Err(ParseError::new("Unexpected ')'", position)),
            TokenKind::And | TokenKind::Or => Err(ParseError::new(
                format!("Unexpected {}, expected a term", kind.describe()),
                position,
            )),
            TokenKind::Not => Err(ParseError::new("Unexpected operator 'NOT'", position)),
            TokenKind::Eof => Err(ParseError::new(
                "Unexpected end of query, expected a term",
                position,
            )),
        }
    }
}
