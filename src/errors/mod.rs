use std::path::Path;

use thiserror::Error;

/// A source row that cannot become a typed record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing {field}")]
    Missing { field: &'static str },
    #[error("invalid {field}: {value:?}")]
    Invalid { field: &'static str, value: String },
    #[error("duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },
}

impl RecordError {
    pub fn missing(field: &'static str) -> Self {
        RecordError::Missing { field }
    }

    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        RecordError::Invalid {
            field,
            value: value.into(),
        }
    }

    pub fn duplicate(field: &'static str, value: impl Into<String>) -> Self {
        RecordError::Duplicate {
            field,
            value: value.into(),
        }
    }
}

/// Inconsistent input that makes the whole run unreliable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("FATAL: multiple submissions for {name} ({count} rows)")]
    DuplicateSubmission { name: String, count: usize },
}

/// Add context to read errors
pub fn read_context(path: &Path) -> String {
    format!("Failed to read records from: {}", path.display())
}

/// Add context to write errors
pub fn write_context(path: &Path) -> String {
    format!("Failed to write records to: {}", path.display())
}

/// Add context to parse errors
pub fn parse_context(data_type: &str, line: usize) -> String {
    format!("Failed to parse {} (line {})", data_type, line)
}
