// Domain model for pysift: syntax tree, classification, traversal and results.

pub mod classifier;
pub mod report;
pub mod syntax;
pub mod traversal;
pub mod verdict;
