//! Ordered lexical rule table
//!
//! The lexer tries rules strictly in table order and takes the first one that
//! matches a non-empty prefix. Order is part of the language: any rule whose
//! lexeme starts with another rule's lexeme has to come first, or it can never
//! match. The standard table therefore lists `(?<`, `(?=` and `(?!` before
//! `(`, field keywords before bare words, and numbers before bare words.

use super::lexer::LexError;
use super::token::TokenKind;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Rules of the standard grammar, in match order
const STANDARD_RULES: &[(TokenKind, &str)] = &[
    (TokenKind::Whitespace, r"\s+"),
    (TokenKind::LBracket, r"\["),
    (TokenKind::RBracket, r"\]"),
    (TokenKind::CaptureStart, r"\(\?<"),
    (TokenKind::LookaheadStart, r"\(\?="),
    (TokenKind::NegativeLookaheadStart, r"\(\?!"),
    (TokenKind::LParen, r"\("),
    (TokenKind::RParen, r"\)"),
    (TokenKind::And, r"&"),
    (TokenKind::Or, r"\|"),
    (TokenKind::Not, r"!"),
    (TokenKind::Equals, r"="),
    (TokenKind::Star, r"\*"),
    (TokenKind::Plus, r"\+"),
    (TokenKind::Question, r"\?"),
    (TokenKind::CaptureNameEnd, r">"),
    (
        TokenKind::Field,
        r"(?:word|lemma|tag|entity|chunk|incoming|outgoing|mention)\b",
    ),
    (TokenKind::Number, r"\d+\b"),
    (TokenKind::String, r#""[^"\n]*"|'[^'\n]*'|\w+"#),
    (TokenKind::Regex, r"/(?:[^/\\\n]|\\.)*/"),
    (TokenKind::At, r"@"),
    (TokenKind::Colon, r":"),
    (TokenKind::StartAnchor, r"\^"),
    (TokenKind::EndAnchor, r"\$"),
];

lazy_static! {
    static ref STANDARD: RuleTable = RuleTable::new(RuleTable::standard_specs())
        .expect("standard rule patterns compile");
}

/// Serializable form of a rule: the token kind and its pattern source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub kind: TokenKind,
    pub pattern: String,
}

impl RuleSpec {
    pub fn new(kind: TokenKind, pattern: impl Into<String>) -> Self {
        Self {
            kind,
            pattern: pattern.into(),
        }
    }
}

/// A compiled lexical rule
#[derive(Debug, Clone)]
pub struct Rule {
    kind: TokenKind,
    pattern: String,
    regex: Regex,
}

impl Rule {
    /// Compile a rule, anchoring the pattern at the scan position
    pub fn new(kind: TokenKind, pattern: impl Into<String>) -> Result<Self, LexError> {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
            LexError::InvalidRule {
                kind,
                pattern: pattern.clone(),
                source,
            }
        })?;
        Ok(Self {
            kind,
            pattern,
            regex,
        })
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Length of the non-empty prefix of `input` this rule matches
    pub fn match_len(&self, input: &str) -> Option<usize> {
        self.regex
            .find(input)
            .map(|m| m.end())
            .filter(|&len| len > 0)
    }
}

/// An ordered list of lexical rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<RuleSpec>", into = "Vec<RuleSpec>")]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Compile a table from rule specs, keeping their order
    pub fn new(specs: Vec<RuleSpec>) -> Result<Self, LexError> {
        let rules = specs
            .into_iter()
            .map(|spec| Rule::new(spec.kind, spec.pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// The compiled standard table, built once per process
    pub fn standard() -> &'static RuleTable {
        &*STANDARD
    }

    /// Specs of the standard table, for building variants of it
    pub fn standard_specs() -> Vec<RuleSpec> {
        STANDARD_RULES
            .iter()
            .map(|&(kind, pattern)| RuleSpec::new(kind, pattern))
            .collect()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule in table order matching at the start of `input`
    pub fn first_match(&self, input: &str) -> Option<(TokenKind, usize)> {
        self.rules
            .iter()
            .find_map(|rule| rule.match_len(input).map(|len| (rule.kind, len)))
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        STANDARD.clone()
    }
}

impl TryFrom<Vec<RuleSpec>> for RuleTable {
    type Error = LexError;

    fn try_from(specs: Vec<RuleSpec>) -> Result<Self, Self::Error> {
        RuleTable::new(specs)
    }
}

impl From<RuleTable> for Vec<RuleSpec> {
    fn from(table: RuleTable) -> Self {
        table
            .rules
            .into_iter()
            .map(|rule| RuleSpec::new(rule.kind, rule.pattern))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_table_compiles() {
        let table = RuleTable::standard();
        assert_eq!(table.len(), STANDARD_RULES.len());
        assert_eq!(table.rules()[0].kind(), TokenKind::Whitespace);
        assert_eq!(table.rules()[0].pattern(), r"\s+");
    }

    #[test]
    fn test_capture_opener_wins_over_paren() {
        let table = RuleTable::standard();
        assert_eq!(table.first_match("(?<name>"), Some((TokenKind::CaptureStart, 3)));
        assert_eq!(table.first_match("(?=x"), Some((TokenKind::LookaheadStart, 3)));
        assert_eq!(
            table.first_match("(?!x"),
            Some((TokenKind::NegativeLookaheadStart, 3))
        );
        assert_eq!(table.first_match("(word"), Some((TokenKind::LParen, 1)));
    }

    #[test]
    fn test_first_match_not_longest_match() {
        // `(` listed first shadows the longer capture opener
        let mut specs = RuleTable::standard_specs();
        let paren = specs
            .iter()
            .position(|s| s.kind == TokenKind::LParen)
            .unwrap();
        let rule = specs.remove(paren);
        specs.insert(0, rule);
        let table = RuleTable::new(specs).unwrap();
        assert_eq!(table.first_match("(?<name>"), Some((TokenKind::LParen, 1)));
    }

    #[test]
    fn test_keyword_needs_word_boundary() {
        let table = RuleTable::standard();
        assert_eq!(table.first_match("word="), Some((TokenKind::Field, 4)));
        assert_eq!(table.first_match("wordy"), Some((TokenKind::String, 5)));
        assert_eq!(table.first_match("123 "), Some((TokenKind::Number, 3)));
        assert_eq!(table.first_match("123abc"), Some((TokenKind::String, 6)));
    }

    #[test]
    fn test_empty_matches_are_ignored() {
        let table = RuleTable::new(vec![
            RuleSpec::new(TokenKind::Whitespace, r"\s*"),
            RuleSpec::new(TokenKind::String, r"\w+"),
        ])
        .unwrap();
        assert_eq!(table.first_match("abc"), Some((TokenKind::String, 3)));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = RuleTable::new(vec![RuleSpec::new(TokenKind::String, "(")]).unwrap_err();
        assert!(matches!(err, LexError::InvalidRule { kind: TokenKind::String, .. }));
    }

    #[test]
    fn test_table_json_roundtrip_keeps_order() {
        let json = serde_json::to_string(RuleTable::standard()).unwrap();
        let table: RuleTable = serde_json::from_str(&json).unwrap();
        let kinds: Vec<_> = table.rules().iter().map(Rule::kind).collect();
        let expected: Vec<_> = STANDARD_RULES.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, expected);
    }
}
