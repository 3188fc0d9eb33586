//! Compiler - lexes and parses TPQL source with a fixed set of options

use crate::config::CompileOptions;
use crate::parser::{
    tokenize_with, ConstraintParser, Node, ParseError, PatternParser, RuleTable, Token,
};
use tracing::debug;

/// Entry point wiring the lexer to the pattern and constraint parsers
///
/// A compiler holds no per-parse state and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn rules(&self) -> &RuleTable {
        self.options.rule_table()
    }

    /// Tokenize with the configured rule table
    pub fn tokenize<'a>(&self, source: &'a str) -> crate::Result<Vec<Token<'a>>> {
        Ok(tokenize_with(source, self.rules())?)
    }

    /// Compile a full token pattern
    pub fn compile_pattern(&self, source: &str) -> crate::Result<Node> {
        let parser = PatternParser::new(self.options.max_depth);
        self.compile(source, "pattern", |tokens| parser.parse(tokens))
    }

    /// Compile a single bracketed token constraint
    pub fn compile_constraint(&self, source: &str) -> crate::Result<Node> {
        let parser = ConstraintParser::new(self.options.max_depth);
        self.compile(source, "constraint", |tokens| parser.parse(tokens))
    }

    fn compile<F>(&self, source: &str, what: &'static str, parse: F) -> crate::Result<Node>
    where
        F: FnOnce(&[Token<'_>]) -> Result<Node, ParseError>,
    {
        debug!(kind = what, bytes = source.len(), "compiling query");
        let tokens = self.tokenize(source)?;
        let node = parse(&tokens)
            .inspect_err(|e| debug!(kind = what, error = %e, "parse failed"))?;
        debug!(kind = what, depth = node.depth(), "compiled query");
        Ok(node)
    }
}
