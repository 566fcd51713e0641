//! Единый тип ошибок публичного API.

use crate::validation::{FieldIssue, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("unknown record type {0:?}")]
    UnknownRecord(String),

    #[error("{record}.{field}: {message}")]
    Field {
        record: &'static str,
        field: &'static str,
        message: String,
    },

    #[error("{record}: expected line length {expected}, got {actual}")]
    Length {
        record: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("record tag mismatch: expected {expected}, got {actual}")]
    Tag { expected: &'static str, actual: String },

    #[error("{record}: schema violation: {}", join_issues(.issues))]
    Schema {
        record: &'static str,
        issues: Vec<FieldIssue>,
    },

    #[error("validation failed with {} issue(s): {}", .0.len(), join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("{field} must contain digits only, got {value:?}")]
    Normalization { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ShaamError>;

impl ShaamError {
    pub(crate) fn field(record: &'static str, field: &'static str, message: impl Into<String>) -> Self {
        ShaamError::Field {
            record,
            field,
            message: message.into(),
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
