//! TPQL lexer and parsers
//!
//! Two cooperating recursive-descent parsers over a token slice produced by
//! the table-driven [`Lexer`].
//!
//! # Grammar
//!
//! ```text
//! TokenConstraint       ::= '[' [ DisjunctiveConstraint ] ']'
//! DisjunctiveConstraint ::= ConjunctiveConstraint ( '|' ConjunctiveConstraint )*
//! ConjunctiveConstraint ::= NegatedConstraint ( '&' NegatedConstraint )*
//! NegatedConstraint     ::= [ '!' ] AtomicConstraint
//! AtomicConstraint      ::= FieldConstraint | '(' DisjunctiveConstraint ')'
//! FieldConstraint       ::= FieldName '=' StringMatcher
//! StringMatcher         ::= String | Number | Regex
//!
//! DisjunctiveTokenPattern  ::= ConcatenatedTokenPattern ( '|' ConcatenatedTokenPattern )*
//! ConcatenatedTokenPattern ::= QuantifiedTokenPattern+
//! QuantifiedTokenPattern   ::= AtomicTokenPattern [ '*' | '+' | '?' ]
//! AtomicTokenPattern       ::= FieldConstraint | TokenConstraint
//!                            | '(' DisjunctiveTokenPattern ')'
//!                            | '@' [ [ Label ':' ] StringMatcher ]
//!                            | '(?<' Identifier '>' DisjunctiveTokenPattern ')'
//!                            | '^' | '$'
//!                            | ( '(?=' | '(?!' ) DisjunctiveTokenPattern ')'
//! ```
//!
//! # Example
//!
//! ```rust
//! use tpql_core::parser::{tokenize, Node, PatternParser};
//!
//! let tokens = tokenize("[tag=NN]+").unwrap();
//! let node = PatternParser::default().parse(&tokens).unwrap();
//! assert!(matches!(node, Node::Quantified { .. }));
//! ```

mod ast;
mod constraint;
mod lexer;
mod pattern;
mod rules;
mod token;

pub use ast::{FieldName, Node, Quantifier, StringMatcher};
pub use constraint::ConstraintParser;
pub use lexer::{tokenize, tokenize_with, LexError, Lexer};
pub use pattern::PatternParser;
pub use rules::{Rule, RuleSpec, RuleTable};
pub use token::{Token, TokenKind};

use thiserror::Error;

/// Default limit on bracket, paren, capture and lookahead nesting plus
/// operator chain length
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parser errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected {expected} at position {position}, found {found}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        position: usize,
    },

    #[error("expected {production} at position {position}, found {found}")]
    NoAlternative {
        production: &'static str,
        found: String,
        position: usize,
    },

    #[error("invalid capture name {name} at position {position}: expected an identifier")]
    InvalidCaptureName { name: String, position: usize },

    #[error("invalid regex /{pattern}/ at position {position}: {message}")]
    InvalidRegex {
        pattern: String,
        message: String,
        position: usize,
    },

    #[error("nesting deeper than {limit} levels at position {position}")]
    NestingTooDeep { limit: usize, position: usize },
}

/// Result of a production: the value and the cursor after it
pub type Step<'t, T> = Result<(T, Cursor<'t>), ParseError>;

/// Read position in an immutable token slice
///
/// Productions take a cursor by value and hand back the advanced one with
/// their result; a cursor never moves backwards.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'t> {
    tokens: &'t [Token<'t>],
    index: usize,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token<'t>]) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn peek(&self) -> Option<&'t Token<'t>> {
        self.tokens.get(self.index)
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// Byte offset of the current token, or of the end of input
    pub fn position(&self) -> usize {
        match self.peek() {
            Some(token) => token.offset,
            None => self
                .tokens
                .last()
                .map(|t| t.offset + t.text.len())
                .unwrap_or(0),
        }
    }

    pub fn advance(self) -> Self {
        Self {
            index: (self.index + 1).min(self.tokens.len()),
            ..self
        }
    }

    /// Consume the current token if it has the expected kind
    pub fn eat(self, expected: TokenKind) -> Step<'t, &'t Token<'t>> {
        match self.peek() {
            Some(token) if token.kind == expected => Ok((token, self.advance())),
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Succeed only when every token has been consumed
    pub fn expect_end(self) -> Result<(), ParseError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected(TokenKind::Eof))
        }
    }

    pub fn unexpected(&self, expected: TokenKind) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.peek_kind().unwrap_or(TokenKind::Eof),
            position: self.position(),
        }
    }

    pub fn no_alternative(&self, production: &'static str) -> ParseError {
        let found = match self.peek() {
            Some(token) => format!("'{}'", token.text),
            None => TokenKind::Eof.to_string(),
        };
        ParseError::NoAlternative {
            production,
            found,
            position: self.position(),
        }
    }
}
