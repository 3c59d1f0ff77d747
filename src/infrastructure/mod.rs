// Infrastructure implementations for pysift.

pub mod concurrency;
pub mod config;
pub mod lowering;
pub mod source_loader;
pub mod targets;

use crate::domain::syntax::{LineIndex, SyntaxNode};
use crate::domain::verdict::SyntaxError;
use crate::ports::GrammarParser;
use lowering::Lowering;
use rustpython_parser::ast::{self, Ranged};
use rustpython_parser::{Parse, ParseError};
use targets::InvalidTarget;

/// Source path reported to the parser; it only shows up in parser-internal messages.
const SOURCE_PATH: &str = "<unknown>";

/// Grammar parser backed by `rustpython-parser`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustPythonParser;

impl RustPythonParser {
    /// Grammar parse followed by the target checks the grammar skips.
    fn parse_suite(source: &str) -> Result<ast::Suite, SyntaxError> {
        let suite =
            ast::Suite::parse(source, SOURCE_PATH).map_err(|err| syntax_error(source, err))?;
        targets::check(&suite).map_err(|invalid| target_error(source, invalid))?;
        Ok(suite)
    }
}

impl GrammarParser for RustPythonParser {
    fn parse(&self, source: &str) -> Result<SyntaxNode, SyntaxError> {
        let suite = Self::parse_suite(source)?;
        let tree = Lowering::new(source).module(&suite);
        tracing::debug!(statements = suite.len(), nodes = tree.node_count(), "parsed source");
        Ok(tree)
    }

    fn check(&self, source: &str) -> Result<(), SyntaxError> {
        Self::parse_suite(source).map(|_| ())
    }
}

fn syntax_error(source: &str, err: ParseError) -> SyntaxError {
    located(source, usize::from(err.offset), err.error.to_string())
}

fn target_error(source: &str, invalid: InvalidTarget<'_>) -> SyntaxError {
    located(source, usize::from(invalid.target.start()), invalid.message)
}

fn located(source: &str, offset: usize, message: String) -> SyntaxError {
    let position = LineIndex::new(source).position(source, offset);
    tracing::debug!(line = position.line, column = position.column, "syntax error: {}", message);
    SyntaxError::new(message, Some(position))
}
