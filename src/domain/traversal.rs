//! Traversal Engine
//!
//! Depth-first, pre-order walk over a [`SyntaxNode`] tree using an explicit
//! work-stack, so deeply nested input cannot exhaust the call stack.

use crate::domain::classifier;
use crate::domain::report::{ExtractionReport, ReportBuilder};
use crate::domain::syntax::SyntaxNode;

/// Visit every node exactly once: parent before children, siblings left to right.
pub fn walk<'a, F>(root: &'a SyntaxNode, mut visit: F)
where
    F: FnMut(&'a SyntaxNode),
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        visit(node);
        // Reversed so the leftmost child is popped first.
        stack.extend(node.children.iter().rev());
    }
}

/// Walk `root`, classify each node and return the frozen report.
/// Categorization never stops descent into a node's children.
pub fn extract(root: &SyntaxNode) -> ExtractionReport {
    let mut builder = ReportBuilder::new();
    walk(root, |node| {
        for (category, entry) in classifier::classify(node) {
            builder.push(category, entry);
        }
    });
    builder.finish()
}
