//! Error types for bibliocat

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot connect to database {}: {message}", .path.display())]
    Connection { path: PathBuf, message: String },

    #[error("Invalid {field} '{input}': {reason}")]
    Validation {
        field: &'static str,
        input: String,
        reason: String,
    },

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Import failed at statement {index}: {source}")]
    Import {
        index: usize,
        /// Text of the failing statement, when it could be prepared.
        statement: Option<String>,
        #[source]
        source: rusqlite::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn validation(
        field: &'static str,
        input: &str,
        reason: impl Into<String>,
    ) -> Self {
        Error::Validation {
            field,
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors that end the session rather than a single operation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }
}
