// Main library entry point for pysift.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use api::dto::{AnalysisResponse, ValidationResponse};
pub use application::AnalyzeUsecase;
pub use domain::report::ExtractionReport;
pub use domain::verdict::{SyntaxError, ValidationVerdict};
pub use infrastructure::RustPythonParser;

/// Extraction entry point: parse `source` and report its constructs or the syntax error.
pub fn analyze(source: &str) -> AnalysisResponse {
    AnalysisResponse::from(AnalyzeUsecase::new(&RustPythonParser).analyze(source))
}

/// Validation entry point: syntax check only.
pub fn validate(source: &str) -> ValidationResponse {
    ValidationResponse::from(AnalyzeUsecase::new(&RustPythonParser).validate(source))
}
