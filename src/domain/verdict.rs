//! Syntax errors and validation verdicts.

use crate::domain::syntax::SourcePosition;
use thiserror::Error;

/// The only failure the parse boundary reports. Message is the parser's own text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub location: Option<SourcePosition>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, location: Option<SourcePosition>) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }

    pub fn line(&self) -> Option<usize> {
        self.location.map(|p| p.line)
    }

    pub fn offset(&self) -> Option<usize> {
        self.location.map(|p| p.column)
    }
}

/// Outcome of a syntax-only check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    Valid,
    Invalid {
        message: String,
        line: Option<usize>,
        offset: Option<usize>,
    },
}

impl ValidationVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationVerdict::Valid)
    }
}

impl From<Result<(), SyntaxError>> for ValidationVerdict {
    fn from(result: Result<(), SyntaxError>) -> Self {
        match result {
            Ok(()) => ValidationVerdict::Valid,
            Err(err) => ValidationVerdict::Invalid {
                line: err.line(),
                offset: err.offset(),
                message: err.message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_keeps_location_verbatim() {
        let err = SyntaxError::new("unexpected token", Some(SourcePosition::new(3, 9)));
        assert_eq!(err.to_string(), "unexpected token");
        assert_eq!(
            ValidationVerdict::from(Err(err)),
            ValidationVerdict::Invalid {
                message: "unexpected token".into(),
                line: Some(3),
                offset: Some(9),
            }
        );
    }

    #[test]
    fn test_verdict_without_location() {
        let verdict = ValidationVerdict::from(Err(SyntaxError::new("eof", None)));
        assert!(!verdict.is_valid());
        assert!(matches!(verdict, ValidationVerdict::Invalid { line: None, offset: None, .. }));
        assert!(ValidationVerdict::from(Ok(())).is_valid());
    }
}
