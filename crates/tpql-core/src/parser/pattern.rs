//! Parser for token patterns
//!
//! Extends the constraint grammar with concatenation, alternation,
//! quantifiers, mentions, named captures and zero-width assertions. Bracketed
//! constraints and bare field constraints are delegated to the
//! [`ConstraintParser`].

use super::ast::{Node, Quantifier, StringMatcher};
use super::constraint::ConstraintParser;
use super::token::{Token, TokenKind};
use super::{Cursor, ParseError, Step};

/// Recursive-descent parser for full token patterns
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternParser {
    constraints: ConstraintParser,
}

impl PatternParser {
    pub fn new(max_depth: usize) -> Self {
        Self {
            constraints: ConstraintParser::new(max_depth),
        }
    }

    pub fn constraints(&self) -> &ConstraintParser {
        &self.constraints
    }

    /// Parse a pattern spanning all of `tokens`
    pub fn parse(&self, tokens: &[Token<'_>]) -> Result<Node, ParseError> {
        let (node, rest) = self.disjunctive(Cursor::new(tokens), 0)?;
        rest.expect_end()?;
        Ok(node)
    }

    /// `ConcatenatedTokenPattern ( '|' ConcatenatedTokenPattern )*`
    pub fn disjunctive<'t>(&self, cursor: Cursor<'t>, depth: usize) -> Step<'t, Node> {
        let (mut left, mut cursor) = self.concatenated(cursor, depth)?;
        let mut depth = depth;
        while cursor.check(TokenKind::Or) {
            depth = self.constraints.enter(cursor, depth)?;
            let (right, next) = self.concatenated(cursor.advance(), depth)?;
            left = Node::or(left, right);
            cursor = next;
        }
        Ok((left, cursor))
    }

    // Keeps taking elements while the next token can open one
    fn concatenated<'t>(&self, cursor: Cursor<'t>, depth: usize) -> Step<'t, Node> {
        let (first, mut cursor) = self.quantified(cursor, depth)?;
        let mut elements = vec![first];
        while cursor
            .peek_kind()
            .is_some_and(|kind| kind.starts_atomic_pattern())
        {
            let (element, next) = self.quantified(cursor, depth)?;
            elements.push(element);
            cursor = next;
        }
        Ok((Node::sequence(elements), cursor))
    }

    fn quantified<'t>(&self, cursor: Cursor<'t>, depth: usize) -> Step<'t, Node> {
        let (atom, cursor) = self.atomic(cursor, depth)?;
        let quantifier = match cursor.peek_kind() {
            Some(TokenKind::Star) => Quantifier::ZeroOrMore,
            Some(TokenKind::Plus) => Quantifier::OneOrMore,
            Some(TokenKind::Question) => Quantifier::ZeroOrOne,
            _ => return Ok((atom, cursor)),
        };
        Ok((Node::quantified(atom, quantifier), cursor.advance()))
    }

    fn atomic<'t>(&self, cursor: Cursor<'t>, depth: usize) -> Step<'t, Node> {
        match cursor.peek_kind() {
            Some(TokenKind::Field) => self.constraints.field_constraint(cursor),
            Some(TokenKind::LBracket) => self.constraints.token_constraint(cursor, depth),
            Some(TokenKind::LParen) => {
                let depth = self.constraints.enter(cursor, depth)?;
                let (node, cursor) = self.disjunctive(cursor.advance(), depth)?;
                let (_, cursor) = cursor.eat(TokenKind::RParen)?;
                Ok((node, cursor))
            }
            Some(TokenKind::At) => self.mention(cursor),
            Some(TokenKind::CaptureStart) => self.capture(cursor, depth),
            Some(TokenKind::StartAnchor) => Ok((Node::StartAnchor, cursor.advance())),
            Some(TokenKind::EndAnchor) => Ok((Node::EndAnchor, cursor.advance())),
            Some(TokenKind::LookaheadStart) => self.lookahead(cursor, depth, false),
            Some(TokenKind::NegativeLookaheadStart) => self.lookahead(cursor, depth, true),
            _ => Err(cursor.no_alternative("token pattern")),
        }
    }

    /// `'@' [ [ Label ':' ] StringMatcher ]`
    fn mention<'t>(&self, cursor: Cursor<'t>) -> Step<'t, Node> {
        let (_, cursor) = cursor.eat(TokenKind::At)?;
        if !cursor.peek_kind().is_some_and(|kind| kind.is_literal()) {
            return Ok((Node::mention(None, None), cursor));
        }

        let label_cursor = cursor;
        let (first, cursor) = self.constraints.string_matcher(cursor)?;
        if !cursor.check(TokenKind::Colon) {
            return Ok((Node::mention(None, Some(first)), cursor));
        }

        let label = match first {
            StringMatcher::Exact(label) => label,
            StringMatcher::Regex(_) => return Err(label_cursor.no_alternative("mention label")),
        };
        let (matcher, cursor) = self.constraints.string_matcher(cursor.advance())?;
        Ok((Node::mention(Some(label), Some(matcher)), cursor))
    }

    /// `'(?<' Identifier '>' DisjunctiveTokenPattern ')'`
    fn capture<'t>(&self, cursor: Cursor<'t>, depth: usize) -> Step<'t, Node> {
        let depth = self.constraints.enter(cursor, depth)?;
        let (_, cursor) = cursor.eat(TokenKind::CaptureStart)?;

        let name = match cursor.peek() {
            Some(token) if token.kind == TokenKind::Field => token.text,
            Some(token) if token.kind == TokenKind::String && !token.is_quoted() => token.text,
            Some(token) if token.kind.is_literal() => {
                return Err(ParseError::InvalidCaptureName {
                    name: token.text.to_string(),
                    position: token.offset,
                })
            }
            _ => return Err(cursor.unexpected(TokenKind::String)),
        };

        let (_, cursor) = cursor.advance().eat(TokenKind::CaptureNameEnd)?;
        let (inner, cursor) = self.disjunctive(cursor, depth)?;
        let (_, cursor) = cursor.eat(TokenKind::RParen)?;
        Ok((Node::capture(name, inner), cursor))
    }

    /// `'(?=' DisjunctiveTokenPattern ')'` or `'(?!' DisjunctiveTokenPattern ')'`
    fn lookahead<'t>(&self, cursor: Cursor<'t>, depth: usize, negated: bool) -> Step<'t, Node> {
        let depth = self.constraints.enter(cursor, depth)?;
        let (inner, cursor) = self.disjunctive(cursor.advance(), depth)?;
        let (_, cursor) = cursor.eat(TokenKind::RParen)?;
        Ok((Node::lookahead(negated, inner), cursor))
    }
}
