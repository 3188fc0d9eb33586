//! Common error types for TPQL compilation.

use crate::parser::{LexError, ParseError};
use thiserror::Error;

/// Error returned by the compile entry points.
#[derive(Error, Debug)]
pub enum Error {
    /// No lexical rule matched, or a rule failed to compile
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    /// Token stream does not fit the grammar
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Options could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias using TPQL Error.
pub type Result<T> = std::result::Result<T, Error>;
