use serde::{Deserialize, Serialize};
use crate::application::FileAnalysis;
use crate::domain::report::ExtractionReport;
use crate::domain::verdict::{SyntaxError, ValidationVerdict};

/// Extraction entry point result, in the shape editor integrations expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Success {
        success: bool,
        ast: ExtractionReport,
    },
    Failure {
        success: bool,
        error: String,
        lineno: Option<usize>,
        col_offset: Option<usize>,
    },
}

impl AnalysisResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResponse::Success { .. })
    }
}

impl From<Result<ExtractionReport, SyntaxError>> for AnalysisResponse {
    fn from(result: Result<ExtractionReport, SyntaxError>) -> Self {
        match result {
            Ok(ast) => AnalysisResponse::Success { success: true, ast },
            Err(err) => AnalysisResponse::Failure {
                success: false,
                lineno: err.line(),
                col_offset: err.offset(),
                error: err.message,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDto {
    pub message: String,
    pub line: Option<usize>,
    pub offset: Option<usize>,
}

/// Validation entry point result. `error` is `null` when valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub error: Option<ValidationErrorDto>,
}

impl From<ValidationVerdict> for ValidationResponse {
    fn from(verdict: ValidationVerdict) -> Self {
        match verdict {
            ValidationVerdict::Valid => ValidationResponse { valid: true, error: None },
            ValidationVerdict::Invalid { message, line, offset } => ValidationResponse {
                valid: false,
                error: Some(ValidationErrorDto { message, line, offset }),
            },
        }
    }
}

/// One entry of a batch run: the file path next to its analysis fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResponse {
    pub path: String,
    #[serde(flatten)]
    pub result: AnalysisResponse,
}

impl From<FileAnalysis> for FileResponse {
    fn from(analysis: FileAnalysis) -> Self {
        FileResponse {
            path: analysis.path,
            result: AnalysisResponse::from(analysis.outcome),
        }
    }
}

/// Validation result for one file of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileValidationResponse {
    pub path: String,
    #[serde(flatten)]
    pub result: ValidationResponse,
}

/// Serialize `value` as JSON, pretty-printed with `indent` spaces when `pretty`.
pub fn to_json<T: Serialize>(value: &T, pretty: bool, indent: usize) -> serde_json::Result<String> {
    if !pretty {
        return serde_json::to_string(value);
    }
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::syntax::SourcePosition;
    use serde_json::json;

    #[test]
    fn test_failure_shape() {
        let err = SyntaxError::new("invalid syntax", Some(SourcePosition::new(1, 7)));
        let value = serde_json::to_value(AnalysisResponse::from(Err(err))).unwrap();
        assert_eq!(
            value,
            json!({"success": false, "error": "invalid syntax", "lineno": 1, "col_offset": 7})
        );
    }

    #[test]
    fn test_failure_without_location_uses_nulls() {
        let err = SyntaxError::new("eof", None);
        let value = serde_json::to_value(AnalysisResponse::from(Err(err))).unwrap();
        assert_eq!(value["lineno"], serde_json::Value::Null);
        assert_eq!(value["col_offset"], serde_json::Value::Null);
    }

    #[test]
    fn test_success_shape_round_trips() {
        let response = AnalysisResponse::from(Ok(ExtractionReport::default()));
        let text = serde_json::to_string(&response).unwrap();
        assert!(text.starts_with(r#"{"success":true,"ast":{"functions":[]"#));
        let back: AnalysisResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn test_validation_shapes() {
        let ok = serde_json::to_value(ValidationResponse::from(ValidationVerdict::Valid)).unwrap();
        assert_eq!(ok, json!({"valid": true, "error": null}));

        let bad = ValidationResponse::from(ValidationVerdict::Invalid {
            message: "bad".into(),
            line: Some(2),
            offset: None,
        });
        assert_eq!(
            serde_json::to_value(bad).unwrap(),
            json!({"valid": false, "error": {"message": "bad", "line": 2, "offset": null}})
        );
    }

    #[test]
    fn test_pretty_output_uses_requested_indent() {
        let text = to_json(&json!({"a": [1]}), true, 4).unwrap();
        assert_eq!(text, "{\n    \"a\": [\n        1\n    ]\n}");
        assert_eq!(to_json(&json!({"a": 1}), false, 4).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_file_response_flattens_result() {
        let response = FileResponse::from(FileAnalysis {
            path: "a.py".into(),
            outcome: Ok(ExtractionReport::default()),
        });
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["path"], "a.py");
        assert_eq!(value["success"], true);
        assert!(value["ast"]["imports"].as_array().unwrap().is_empty());
    }
}
