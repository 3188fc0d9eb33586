//! AST types for parsed TPQL queries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token attribute a field constraint tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    Word,
    Lemma,
    Tag,
    Entity,
    Chunk,
    Incoming,
    Outgoing,
    Mention,
}

impl FieldName {
    pub const ALL: [FieldName; 8] = [
        FieldName::Word,
        FieldName::Lemma,
        FieldName::Tag,
        FieldName::Entity,
        FieldName::Chunk,
        FieldName::Incoming,
        FieldName::Outgoing,
        FieldName::Mention,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Word => "word",
            FieldName::Lemma => "lemma",
            FieldName::Tag => "tag",
            FieldName::Entity => "entity",
            FieldName::Chunk => "chunk",
            FieldName::Incoming => "incoming",
            FieldName::Outgoing => "outgoing",
            FieldName::Mention => "mention",
        }
    }
}

impl FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a field value is compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringMatcher {
    /// Value must equal the literal
    Exact(String),
    /// Value must match the regular expression
    Regex(String),
}

impl StringMatcher {
    pub fn exact(literal: impl Into<String>) -> Self {
        StringMatcher::Exact(literal.into())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        StringMatcher::Regex(pattern.into())
    }
}

/// Repetition applied to an atomic pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantifier {
    #[serde(rename = "*")]
    ZeroOrMore,
    #[serde(rename = "+")]
    OneOrMore,
    #[serde(rename = "?")]
    ZeroOrOne,
}

impl Quantifier {
    pub fn symbol(&self) -> &'static str {
        match self {
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
            Quantifier::ZeroOrOne => "?",
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A node of the query AST
///
/// Nodes are built bottom-up and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Single attribute test
    Field {
        name: FieldName,
        matcher: StringMatcher,
    },
    And {
        left: Box<Node>,
        right: Box<Node>,
    },
    Or {
        left: Box<Node>,
        right: Box<Node>,
    },
    Not {
        operand: Box<Node>,
    },
    /// Two or more patterns matched at consecutive positions
    Sequence {
        elements: Vec<Node>,
    },
    Quantified {
        inner: Box<Node>,
        quantifier: Quantifier,
    },
    /// Pre-resolved entity mention, optionally filtered by label and name
    Mention {
        label: Option<String>,
        matcher: Option<StringMatcher>,
    },
    Capture {
        name: String,
        inner: Box<Node>,
    },
    /// `[]`: any single token
    NoConstraint,
    StartAnchor,
    EndAnchor,
    /// Zero-width check that `inner` does (or does not) match next
    Lookahead {
        negated: bool,
        inner: Box<Node>,
    },
}

impl Node {
    pub fn field(name: FieldName, matcher: StringMatcher) -> Self {
        Node::Field { name, matcher }
    }

    pub fn and(left: Node, right: Node) -> Self {
        Node::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Node, right: Node) -> Self {
        Node::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Node) -> Self {
        Node::Not {
            operand: Box::new(operand),
        }
    }

    /// Sequence of `elements`, or the element itself when there is only one
    pub fn sequence(mut elements: Vec<Node>) -> Self {
        if elements.len() == 1 {
            return elements.remove(0);
        }
        Node::Sequence { elements }
    }

    pub fn quantified(inner: Node, quantifier: Quantifier) -> Self {
        Node::Quantified {
            inner: Box::new(inner),
            quantifier,
        }
    }

    pub fn mention(label: Option<String>, matcher: Option<StringMatcher>) -> Self {
        Node::Mention { label, matcher }
    }

    pub fn capture(name: impl Into<String>, inner: Node) -> Self {
        Node::Capture {
            name: name.into(),
            inner: Box::new(inner),
        }
    }

    pub fn lookahead(negated: bool, inner: Node) -> Self {
        Node::Lookahead {
            negated,
            inner: Box::new(inner),
        }
    }

    /// Push direct children so that popping yields them left to right
    fn push_children<'n>(&'n self, stack: &mut Vec<&'n Node>) {
        match self {
            Node::And { left, right } | Node::Or { left, right } => {
                stack.push(right);
                stack.push(left);
            }
            Node::Sequence { elements } => stack.extend(elements.iter().rev()),
            Node::Not { operand: inner }
            | Node::Quantified { inner, .. }
            | Node::Capture { inner, .. }
            | Node::Lookahead { inner, .. } => stack.push(inner),
            Node::Field { .. }
            | Node::Mention { .. }
            | Node::NoConstraint
            | Node::StartAnchor
            | Node::EndAnchor => {}
        }
    }

    /// Height of the tree rooted here; a leaf has depth 1
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        let mut children = Vec::new();
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            node.push_children(&mut children);
            stack.extend(children.drain(..).map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Capture names in the order they appear
    pub fn capture_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Node::Capture { name, .. } = node {
                names.push(name.as_str());
            }
            node.push_children(&mut stack);
        }
        names
    }

    /// Move the direct children out, leaving leaves in their place
    fn take_children(&mut self, out: &mut Vec<Node>) {
        match self {
            Node::And { left, right } | Node::Or { left, right } => {
                out.push(std::mem::replace(left.as_mut(), Node::NoConstraint));
                out.push(std::mem::replace(right.as_mut(), Node::NoConstraint));
            }
            Node::Sequence { elements } => out.append(elements),
            Node::Not { operand: inner }
            | Node::Quantified { inner, .. }
            | Node::Capture { inner, .. }
            | Node::Lookahead { inner, .. } => {
                out.push(std::mem::replace(inner.as_mut(), Node::NoConstraint))
            }
            Node::Field { .. }
            | Node::Mention { .. }
            | Node::NoConstraint
            | Node::StartAnchor
            | Node::EndAnchor => {}
        }
    }
}

// Long `|` and `&` chains are as deep as they are long; tearing them down
// recursively would overflow the stack.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.take_children(&mut pending);
        }
    }
}
