use crate::domain::report::ExtractionReport;
use crate::domain::traversal;
use crate::domain::verdict::{SyntaxError, ValidationVerdict};
use crate::infrastructure::source_loader::SourceFile;
use crate::ports::GrammarParser;
use rayon::prelude::*;
use rayon::ThreadPool;

/// Extraction result for one file of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAnalysis {
    pub path: String,
    pub outcome: Result<ExtractionReport, SyntaxError>,
}

/// The two entry points: extraction and syntax-only validation.
pub struct AnalyzeUsecase<'a> {
    pub parser: &'a dyn GrammarParser,
}

impl<'a> AnalyzeUsecase<'a> {
    pub fn new(parser: &'a dyn GrammarParser) -> Self {
        Self { parser }
    }

    /// Parse and extract. On a syntax error nothing is traversed and no
    /// partial report exists.
    pub fn analyze(&self, source: &str) -> Result<ExtractionReport, SyntaxError> {
        let tree = self.parser.parse(source)?;
        let report = traversal::extract(&tree);
        tracing::debug!(
            functions = report.functions.len(),
            classes = report.classes.len(),
            imports = report.imports.len(),
            "extraction finished"
        );
        Ok(report)
    }

    /// Parse only; never builds or walks a tree.
    pub fn validate(&self, source: &str) -> ValidationVerdict {
        ValidationVerdict::from(self.parser.check(source))
    }

    /// Analyze independent files on `pool`. Output order matches `files`.
    pub fn analyze_batch(&self, files: &[SourceFile], pool: &ThreadPool) -> Vec<FileAnalysis> {
        pool.install(|| {
            files
                .par_iter()
                .map(|file| FileAnalysis {
                    path: file.path.clone(),
                    outcome: self.analyze(&file.source),
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::syntax::{NodeKind, SourcePosition, SyntaxNode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Parser double: `!` in the source is a syntax error at line 1, column 1.
    #[derive(Default)]
    struct FakeParser {
        trees_built: AtomicUsize,
    }

    impl GrammarParser for FakeParser {
        fn parse(&self, source: &str) -> Result<SyntaxNode, SyntaxError> {
            self.check(source)?;
            self.trees_built.fetch_add(1, Ordering::SeqCst);
            let children = source
                .lines()
                .enumerate()
                .filter(|(_, l)| l.starts_with("while"))
                .map(|(i, _)| SyntaxNode::new(NodeKind::While, SourcePosition::new(i + 1, 1)))
                .collect();
            Ok(SyntaxNode::new(NodeKind::Module, SourcePosition::default()).with_children(children))
        }

        fn check(&self, source: &str) -> Result<(), SyntaxError> {
            if source.contains('!') {
                return Err(SyntaxError::new("bang", Some(SourcePosition::new(1, 1))));
            }
            Ok(())
        }
    }

    #[test]
    fn test_validate_never_builds_a_tree() {
        let parser = FakeParser::default();
        let usecase = AnalyzeUsecase::new(&parser);
        assert!(usecase.validate("while x").is_valid());
        assert!(!usecase.validate("!").is_valid());
        assert_eq!(parser.trees_built.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_analyze_propagates_syntax_error() {
        let parser = FakeParser::default();
        let usecase = AnalyzeUsecase::new(&parser);
        let err = usecase.analyze("!").unwrap_err();
        assert_eq!(err.message, "bang");
        let report = usecase.analyze("x\nwhile y").unwrap();
        assert_eq!(report.loops.len(), 1);
        assert_eq!(report.loops[0].line, 2);
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let parser = FakeParser::default();
        let usecase = AnalyzeUsecase::new(&parser);
        let files: Vec<SourceFile> = (0..20)
            .map(|i| SourceFile {
                path: format!("f{i}.py"),
                source: if i % 3 == 0 { "!".into() } else { "while 1".into() },
            })
            .collect();
        let pool = crate::infrastructure::concurrency::build_pool(4).unwrap();
        let results = usecase.analyze_batch(&files, &pool);
        assert_eq!(results.len(), 20);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.path, format!("f{i}.py"));
            assert_eq!(result.outcome.is_err(), i % 3 == 0);
        }
    }
}
