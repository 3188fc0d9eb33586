//! Parser for bracketed token constraints

use super::ast::{FieldName, Node, StringMatcher};
use super::token::{Token, TokenKind};
use super::{Cursor, ParseError, Step, DEFAULT_MAX_DEPTH};

/// Recursive-descent parser for `[ ... ]` boolean field expressions
///
/// The pattern parser reuses [`token_constraint`](Self::token_constraint),
/// [`field_constraint`](Self::field_constraint) and
/// [`string_matcher`](Self::string_matcher).
#[derive(Debug, Clone, Copy)]
pub struct ConstraintParser {
    max_depth: usize,
}

impl Default for ConstraintParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl ConstraintParser {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse a single token constraint spanning all of `tokens`
    pub fn parse(&self, tokens: &[Token<'_>]) -> Result<Node, ParseError> {
        let (node, rest) = self.token_constraint(Cursor::new(tokens), 0)?;
        rest.expect_end()?;
        Ok(node)
    }

    /// Enter one nesting level, failing past the configured limit
    ///
    /// Groups and each `|` or `&` of a chain count as a level.
    pub(crate) fn enter(&self, cursor: Cursor<'_>, depth: usize) -> Result<usize, ParseError> {
        if depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
                position: cursor.position(),
            });
        }
        Ok(depth + 1)
    }

    /// `'[' [ DisjunctiveConstraint ] ']'`
    pub fn token_constraint<'t>(&self, cursor: Cursor<'t>, depth: usize) -> Step<'t, Node> {
        let depth = self.enter(cursor, depth)?;
        let (_, cursor) = cursor.eat(TokenKind::LBracket)?;

        if cursor.is_at_end() || cursor.check(TokenKind::RBracket) {
            let (_, cursor) = cursor.eat(TokenKind::RBracket)?;
            return Ok((Node::NoConstraint, cursor));
        }

        let (node, cursor) = self.disjunctive(cursor, depth)?;
        let (_, cursor) = cursor.eat(TokenKind::RBracket)?;
        Ok((node, cursor))
    }

    // Each operator of a chain spends one nesting level
    fn disjunctive<'t>(&self, cursor: Cursor<'t>, depth: usize) -> Step<'t, Node> {
        let (mut left, mut cursor) = self.conjunctive(cursor, depth)?;
        let mut depth = depth;
        while cursor.check(TokenKind::Or) {
            depth = self.enter(cursor, depth)?;
            let (right, next) = self.conjunctive(cursor.advance(), depth)?;
            left = Node::or(left, right);
            cursor = next;
        }
        Ok((left, cursor))
    }

    fn conjunctive<'t>(&self, cursor: Cursor<'t>, depth: usize) -> Step<'t, Node> {
        let (mut left, mut cursor) = self.negated(cursor, depth)?;
        let mut depth = depth;
        while cursor.check(TokenKind::And) {
            depth = self.enter(cursor, depth)?;
            let (right, next) = self.negated(cursor.advance(), depth)?;
            left = Node::and(left, right);
            cursor = next;
        }
        Ok((left, cursor))
    }

    // `!` takes a single atomic operand
    fn negated<'t>(&self, cursor: Cursor<'t>, depth: usize) -> Step<'t, Node> {
        if cursor.check(TokenKind::Not) {
            let (operand, cursor) = self.atomic(cursor.advance(), depth)?;
            return Ok((Node::not(operand), cursor));
        }
        self.atomic(cursor, depth)
    }

    fn atomic<'t>(&self, cursor: Cursor<'t>, depth: usize) -> Step<'t, Node> {
        match cursor.peek_kind() {
            Some(TokenKind::Field) => self.field_constraint(cursor),
            Some(TokenKind::LParen) => {
                let depth = self.enter(cursor, depth)?;
                let (node, cursor) = self.disjunctive(cursor.advance(), depth)?;
                let (_, cursor) = cursor.eat(TokenKind::RParen)?;
                Ok((node, cursor))
            }
            _ => Err(cursor.no_alternative("field constraint or '('")),
        }
    }

    /// `FieldName '=' StringMatcher`
    pub fn field_constraint<'t>(&self, cursor: Cursor<'t>) -> Step<'t, Node> {
        let start = cursor;
        let (field, cursor) = cursor.eat(TokenKind::Field)?;
        let name: FieldName = field
            .text
            .parse()
            .map_err(|_| start.no_alternative("field name"))?;
        let (_, cursor) = cursor.eat(TokenKind::Equals)?;
        let (matcher, cursor) = self.string_matcher(cursor)?;
        Ok((Node::field(name, matcher), cursor))
    }

    /// Quoted or bare string, number, or `/regex/`
    pub fn string_matcher<'t>(&self, cursor: Cursor<'t>) -> Step<'t, StringMatcher> {
        match cursor.peek() {
            Some(token) if matches!(token.kind, TokenKind::String | TokenKind::Number) => Ok((
                StringMatcher::exact(token.unquoted()),
                cursor.advance(),
            )),
            Some(token) if token.kind == TokenKind::Regex => {
                let pattern = token.unquoted().replace("\\/", "/");
                if let Err(e) = regex::Regex::new(&pattern) {
                    return Err(ParseError::InvalidRegex {
                        pattern,
                        message: e.to_string(),
                        position: token.offset,
                    });
                }
                Ok((StringMatcher::Regex(pattern), cursor.advance()))
            }
            _ => Err(cursor.unexpected(TokenKind::String)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenize;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Result<Node, ParseError> {
        let tokens = tokenize(input).unwrap();
        ConstraintParser::default().parse(&tokens)
    }

    fn field(name: FieldName, value: &str) -> Node {
        Node::field(name, StringMatcher::exact(value))
    }

    #[test]
    fn test_empty_brackets() {
        assert_eq!(parse("[]").unwrap(), Node::NoConstraint);
        assert_eq!(parse("[ ]").unwrap(), Node::NoConstraint);
    }

    #[test]
    fn test_single_field() {
        assert_eq!(
            parse("[word=\"hello\"]").unwrap(),
            field(FieldName::Word, "hello")
        );
        assert_eq!(parse("[tag=NN]").unwrap(), field(FieldName::Tag, "NN"));
        assert_eq!(parse("[chunk=42]").unwrap(), field(FieldName::Chunk, "42"));
    }

    #[test]
    fn test_conjunction() {
        assert_eq!(
            parse(r#"[word="hello" & lemma="greet"]"#).unwrap(),
            Node::and(
                field(FieldName::Word, "hello"),
                field(FieldName::Lemma, "greet")
            )
        );
    }

    #[test]
    fn test_operators_are_left_associative() {
        let a = || field(FieldName::Tag, "a");
        let b = || field(FieldName::Tag, "b");
        let c = || field(FieldName::Tag, "c");
        assert_eq!(
            parse("[tag=a & tag=b & tag=c]").unwrap(),
            Node::and(Node::and(a(), b()), c())
        );
        assert_eq!(
            parse("[tag=a | tag=b | tag=c]").unwrap(),
            Node::or(Node::or(a(), b()), c())
        );
    }

    #[test]
    fn test_conjunction_binds_tighter_than_disjunction() {
        assert_eq!(
            parse("[tag=a | tag=b & tag=c]").unwrap(),
            Node::or(
                field(FieldName::Tag, "a"),
                Node::and(field(FieldName::Tag, "b"), field(FieldName::Tag, "c"))
            )
        );
    }

    #[test]
    fn test_negation_binds_tightest() {
        assert_eq!(
            parse("[!tag=a & tag=b]").unwrap(),
            Node::and(
                Node::not(field(FieldName::Tag, "a")),
                field(FieldName::Tag, "b")
            )
        );
        assert_eq!(
            parse("[!(tag=a & tag=b)]").unwrap(),
            Node::not(Node::and(
                field(FieldName::Tag, "a"),
                field(FieldName::Tag, "b")
            ))
        );
    }

    #[test]
    fn test_double_negation_is_rejected() {
        let err = parse("[!!tag=a]").unwrap_err();
        assert!(matches!(
            err,
            ParseError::NoAlternative { found, .. } if found == "'!'"
        ));
    }

    #[test]
    fn test_regex_matcher() {
        assert_eq!(
            parse(r"[tag=/N\/N.*/]").unwrap(),
            Node::field(FieldName::Tag, StringMatcher::regex("N/N.*"))
        );
        assert!(matches!(
            parse("[tag=/N(/]").unwrap_err(),
            ParseError::InvalidRegex { position: 5, .. }
        ));
    }

    #[test]
    fn test_missing_closing_bracket() {
        assert_eq!(
            parse("[word=\"x\"").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: TokenKind::RBracket,
                found: TokenKind::Eof,
                position: 9,
            }
        );
        assert_eq!(
            parse("[").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: TokenKind::RBracket,
                found: TokenKind::Eof,
                position: 1,
            }
        );
    }

    #[test]
    fn test_missing_equals() {
        assert_eq!(
            parse("[word \"x\"]").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: TokenKind::Equals,
                found: TokenKind::String,
                position: 6,
            }
        );
    }

    #[test]
    fn test_missing_value() {
        assert_eq!(
            parse("[word=]").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: TokenKind::String,
                found: TokenKind::RBracket,
                position: 6,
            }
        );
    }

    #[test]
    fn test_unbalanced_parens() {
        assert!(parse("[(tag=a | tag=b]").is_err());
        assert!(parse("[tag=a)]").is_err());
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        assert_eq!(
            parse("[tag=a] [tag=b]").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: TokenKind::Eof,
                found: TokenKind::LBracket,
                position: 8,
            }
        );
    }

    #[test]
    fn test_nesting_limit() {
        let tokens = tokenize("[((tag=a))]").unwrap();
        assert!(ConstraintParser::new(3).parse(&tokens).is_ok());
        assert_eq!(
            ConstraintParser::new(2).parse(&tokens).unwrap_err(),
            ParseError::NestingTooDeep {
                limit: 2,
                position: 2,
            }
        );
    }

    #[test]
    fn test_operator_chains_spend_nesting_budget() {
        let parser = ConstraintParser::new(3);
        assert_eq!(parser.max_depth(), 3);

        let tokens = tokenize("[tag=a | tag=b & tag=c]").unwrap();
        assert!(parser.parse(&tokens).is_ok());

        let tokens = tokenize("[tag=a | tag=b | tag=c | tag=d]").unwrap();
        assert_eq!(
            parser.parse(&tokens).unwrap_err(),
            ParseError::NestingTooDeep {
                limit: 3,
                position: 23,
            }
        );
    }
}
