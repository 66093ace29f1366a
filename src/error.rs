//! Error types for the analysis pipeline.

use thiserror::Error;

/// Every failure aborts the run; variants only classify what went wrong.
#[derive(Debug, Error)]
pub enum EdaError {
    #[error("Resource unavailable: {url} returned status {status}")]
    ResourceUnavailable { url: String, status: u16 },

    #[error("Invalid source '{0}'")]
    InvalidSource(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Parse failure in column '{column}' at row {row}: '{value}' is not a valid {expected}")]
    ParseFailure {
        column: String,
        row: usize,
        value: String,
        expected: &'static str,
    },

    #[error("Dataframe error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl EdaError {
    pub fn missing_column(name: &str) -> Self {
        Self::SchemaMismatch(format!("column '{name}' not found"))
    }

    pub fn render(err: impl std::fmt::Display) -> Self {
        Self::Render(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EdaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_message_names_location() {
        let err = EdaError::ParseFailure {
            column: "total_cases".into(),
            row: 7,
            value: "abc".into(),
            expected: "number",
        };
        let msg = err.to_string();
        assert!(msg.contains("total_cases"));
        assert!(msg.contains("row 7"));
        assert!(msg.contains("'abc'"));
    }

    #[test]
    fn test_missing_column_is_schema_mismatch() {
        assert!(matches!(
            EdaError::missing_column("continent"),
            EdaError::SchemaMismatch(_)
        ));
    }

    #[test]
    fn test_polars_error_converts() {
        let err: EdaError = polars::prelude::PolarsError::ColumnNotFound("month".into()).into();
        assert!(matches!(err, EdaError::Polars(_)));
        assert!(err.to_string().contains("month"));
    }
}
