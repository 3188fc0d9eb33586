//! Compiler options

use crate::parser::{RuleTable, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};

/// Options for a [`Compiler`](crate::Compiler)
///
/// Every field has a default, so an empty JSON object is a valid config:
///
/// ```json
/// { "max_depth": 32, "rules": [{ "kind": "whitespace", "pattern": "\\s+" }] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Maximum nesting of brackets, groups, captures and lookaheads, where
    /// each `|` or `&` of a chain also counts as a level
    pub max_depth: usize,
    /// Lexical rules to use instead of the standard table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleTable>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            rules: None,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Load options from JSON; rule patterns are compiled while loading
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The configured rule table, or the standard one
    pub fn rule_table(&self) -> &RuleTable {
        self.rules.as_ref().unwrap_or_else(|| RuleTable::standard())
    }
}
