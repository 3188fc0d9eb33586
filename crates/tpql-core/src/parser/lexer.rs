//! Zero-copy, table-driven lexer for TPQL

use super::rules::RuleTable;
use super::token::{Token, TokenKind};
use thiserror::Error;
use tracing::{debug, trace};

/// Lexer errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("invalid pattern for {kind} rule: /{pattern}/")]
    InvalidRule {
        kind: TokenKind,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Lexer for TPQL queries, driven by an ordered rule table
pub struct Lexer<'a, 'r> {
    input: &'a str,
    rules: &'r RuleTable,
    position: usize,
    done: bool,
}

impl<'a> Lexer<'a, 'static> {
    /// Lexer using the standard rule table
    pub fn new(input: &'a str) -> Self {
        Self::with_rules(input, RuleTable::standard())
    }
}

impl<'a, 'r> Lexer<'a, 'r> {
    pub fn with_rules(input: &'a str, rules: &'r RuleTable) -> Self {
        Self {
            input,
            rules,
            position: 0,
            done: false,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn next_token(&mut self) -> Option<Result<Token<'a>, LexError>> {
        loop {
            let rest = self.remaining();
            let ch = rest.chars().next()?;

            let Some((kind, len)) = self.rules.first_match(rest) else {
                return Some(Err(LexError::UnexpectedChar {
                    ch,
                    position: self.position,
                }));
            };

            let start = self.position;
            self.position += len;
            if kind == TokenKind::Whitespace {
                continue;
            }

            let token = Token::new(kind, &self.input[start..self.position], start);
            trace!(kind = %token.kind, text = token.text, offset = start, "token");
            return Some(Ok(token));
        }
    }
}

impl<'a, 'r> Iterator for Lexer<'a, 'r> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = self.next_token();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

/// Tokenize with the standard rule table
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, LexError> {
    tokenize_with(input, RuleTable::standard())
}

/// Tokenize with an explicit rule table
pub fn tokenize_with<'a>(input: &'a str, rules: &RuleTable) -> Result<Vec<Token<'a>>, LexError> {
    let tokens = Lexer::with_rules(input, rules)
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| debug!(error = %e, "lexing failed"))?;
    debug!(tokens = tokens.len(), bytes = input.len(), "tokenized query");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \t\n").unwrap().is_empty());
    }

    #[test]
    fn test_bracketed_constraint() {
        let tokens = tokenize(r#"[word="hello" & lemma='greet']"#).unwrap();
        let pairs: Vec<_> = tokens.iter().map(|t| (t.kind, t.text)).collect();
        assert_eq!(
            pairs,
            vec![
                (TokenKind::LBracket, "["),
                (TokenKind::Field, "word"),
                (TokenKind::Equals, "="),
                (TokenKind::String, "\"hello\""),
                (TokenKind::And, "&"),
                (TokenKind::Field, "lemma"),
                (TokenKind::Equals, "="),
                (TokenKind::String, "'greet'"),
                (TokenKind::RBracket, "]"),
            ]
        );
    }

    #[test]
    fn test_offsets_skip_whitespace() {
        let tokens = tokenize("  @ Person").unwrap();
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[1].offset, 4);
        assert_eq!(tokens[1].text, "Person");
    }

    #[test]
    fn test_all_field_keywords() {
        assert_eq!(
            kinds("word lemma tag entity chunk incoming outgoing mention"),
            vec![TokenKind::Field; 8]
        );
    }

    #[test]
    fn test_group_openers() {
        assert_eq!(
            kinds("(?<x> (?= (?! ( ) ^ $"),
            vec![
                TokenKind::CaptureStart,
                TokenKind::String,
                TokenKind::CaptureNameEnd,
                TokenKind::LookaheadStart,
                TokenKind::NegativeLookaheadStart,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::StartAnchor,
                TokenKind::EndAnchor,
            ]
        );
    }

    #[test]
    fn test_quantifiers_and_operators() {
        assert_eq!(
            kinds("* + ? & | ! = @ :"),
            vec![
                TokenKind::Star,
                TokenKind::Plus,
                TokenKind::Question,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Equals,
                TokenKind::At,
                TokenKind::Colon,
            ]
        );
    }

    #[test]
    fn test_numbers_and_regex_literals() {
        let tokens = tokenize(r"42 /N\/N.*/").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[1].kind, TokenKind::Regex);
        assert_eq!(tokens[1].text, r"/N\/N.*/");
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("[word=x] %").unwrap_err();
        assert_eq!(err, LexError::UnexpectedChar { ch: '%', position: 9 });
    }

    #[test]
    fn test_unterminated_quote() {
        let err = tokenize("[word=\"open]").unwrap_err();
        assert_eq!(err, LexError::UnexpectedChar { ch: '"', position: 6 });
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut lexer = Lexer::new("a % b");
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_deterministic() {
        let input = "(?<who> @Person) [lemma=say & !tag=/V.*/]+ word=that?";
        assert_eq!(tokenize(input).unwrap(), tokenize(input).unwrap());
    }
}
