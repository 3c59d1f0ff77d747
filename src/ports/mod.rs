use crate::domain::syntax::SyntaxNode;
use crate::domain::verdict::SyntaxError;

/// Boundary to a conformant grammar parser. Implementations report the first
/// unrecoverable error only and perform no semantic checks.
pub trait GrammarParser: Send + Sync {
    /// Parse `source` into a syntax tree rooted at a `Module` node.
    fn parse(&self, source: &str) -> Result<SyntaxNode, SyntaxError>;

    /// Syntax check only; no tree is handed back.
    fn check(&self, source: &str) -> Result<(), SyntaxError>;
}
