//! Token types for the TPQL lexer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token kinds in the token pattern query language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    // Delimiters
    LBracket,
    RBracket,
    LParen,
    RParen,

    // Boolean operators
    And,
    Or,
    Not,
    Equals,

    // Quantifiers
    Star,
    Plus,
    Question,

    // Field keywords and literals
    Field,
    String,
    Number,
    Regex,

    // Mentions
    At,
    Colon,

    // Groups and assertions
    CaptureStart,
    CaptureNameEnd,
    StartAnchor,
    EndAnchor,
    LookaheadStart,
    NegativeLookaheadStart,

    // Special
    Whitespace, // Matched and discarded, never emitted
    Eof,        // Only used to report end of input in errors
}

impl TokenKind {
    /// Check if this is a repetition operator
    pub fn is_quantifier(&self) -> bool {
        matches!(self, TokenKind::Star | TokenKind::Plus | TokenKind::Question)
    }

    /// Check if this token can begin an atomic token pattern
    pub fn starts_atomic_pattern(&self) -> bool {
        matches!(
            self,
            TokenKind::Field
                | TokenKind::LParen
                | TokenKind::At
                | TokenKind::CaptureStart
                | TokenKind::LBracket
                | TokenKind::StartAnchor
                | TokenKind::EndAnchor
                | TokenKind::LookaheadStart
                | TokenKind::NegativeLookaheadStart
        )
    }

    /// Check if this token can serve as a string matcher
    pub fn is_literal(&self) -> bool {
        matches!(self, TokenKind::String | TokenKind::Number | TokenKind::Regex)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::And => write!(f, "'&'"),
            TokenKind::Or => write!(f, "'|'"),
            TokenKind::Not => write!(f, "'!'"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Question => write!(f, "'?'"),
            TokenKind::Field => write!(f, "field name"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::Regex => write!(f, "regex"),
            TokenKind::At => write!(f, "'@'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::CaptureStart => write!(f, "'(?<'"),
            TokenKind::CaptureNameEnd => write!(f, "'>'"),
            TokenKind::StartAnchor => write!(f, "'^'"),
            TokenKind::EndAnchor => write!(f, "'$'"),
            TokenKind::LookaheadStart => write!(f, "'(?='"),
            TokenKind::NegativeLookaheadStart => write!(f, "'(?!'"),
            TokenKind::Whitespace => write!(f, "whitespace"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with position information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, offset: usize) -> Self {
        Self { kind, text, offset }
    }

    /// Literal text with surrounding quotes or regex slashes removed
    pub fn unquoted(&self) -> &'a str {
        let text = self.text;
        let bytes = text.as_bytes();
        if text.len() >= 2 {
            let (first, last) = (bytes[0], bytes[text.len() - 1]);
            if first == last && matches!(first, b'"' | b'\'' | b'/') {
                return &text[1..text.len() - 1];
            }
        }
        text
    }

    /// Whether the lexeme was written with quotes
    pub fn is_quoted(&self) -> bool {
        self.text.starts_with('"') || self.text.starts_with('\'')
    }
}
