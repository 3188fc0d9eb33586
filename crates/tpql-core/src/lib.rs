//! TPQL Core
//!
//! Compiler for the token pattern query language: a query describes a run of
//! annotated tokens (word, lemma, tag, entity, chunk, incoming, outgoing,
//! mention) much like a regular expression describes a run of characters.
//! Compiling produces a [`Node`] tree; matching it against a document is left
//! to the caller.
//!
//! # Example
//!
//! ```rust
//! use tpql_core::{parse_pattern, FieldName, Node, StringMatcher};
//!
//! let node = parse_pattern(r#"[word="hello" & lemma="greet"] | @Person"#).unwrap();
//! assert!(matches!(node, Node::Or { .. }));
//!
//! let node = parse_pattern("[tag=NN]").unwrap();
//! assert_eq!(node, Node::field(FieldName::Tag, StringMatcher::exact("NN")));
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod parser;

// Re-export main types at crate root
pub use compiler::Compiler;
pub use config::CompileOptions;
pub use error::{Error, Result};
pub use parser::{
    tokenize, ConstraintParser, FieldName, LexError, Lexer, Node, ParseError, PatternParser,
    Quantifier, RuleSpec, RuleTable, StringMatcher, Token, TokenKind,
};

/// Compile a token pattern with default options
pub fn parse_pattern(source: &str) -> Result<Node> {
    Compiler::default().compile_pattern(source)
}

/// Compile a bracketed token constraint with default options
pub fn parse_constraint(source: &str) -> Result<Node> {
    Compiler::default().compile_constraint(source)
}
