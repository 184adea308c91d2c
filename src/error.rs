//! Error types for FlatDB
//!
//! This module defines all error types used throughout the data manager.

use thiserror::Error;

use crate::sql::Operator;

/// The main error type for FlatDB
#[derive(Error, Debug)]
pub enum Error {
    // ========== Parse Errors ==========
    #[error("Parse error: empty query")]
    EmptyQuery,

    #[error("Parse error: unterminated string literal starting at position {0}")]
    UnterminatedString(usize),

    #[error("Parse error: unexpected quote at position {0}")]
    UnexpectedQuote(usize),

    #[error("Parse error: unexpected operator '{0}' at position {1}")]
    UnexpectedOperator(char, usize),

    #[error("Parse error: invalid operator '{0}' at position {1}")]
    InvalidOperatorToken(char, usize),

    #[error("Parse error: keyword '{0}' has no value")]
    MissingValue(String),

    // ========== Schema Errors ==========
    #[error("Schema error: table '{0}' not found")]
    TableNotFound(String),

    #[error("Schema error: there is a table with the same name, cannot create table '{0}'")]
    TableAlreadyExists(String),

    #[error("Schema error: no column '{0}' in table '{1}'")]
    ColumnNotFound(String, String),

    #[error("Schema error: column '{0}' already exists in table '{1}'")]
    ColumnAlreadyExists(String, String),

    #[error("Schema error: unknown type '{0}' for column '{1}'")]
    UnknownType(String, String),

    #[error("Schema error: table '{0}' has more than {1} columns")]
    TooManyColumns(String, usize),

    #[error("Schema error: you specified more values than available columns in '{0}'")]
    TooManyFields(String),

    #[error("Schema error: table '{table}' expects {expected} values, got {found}")]
    MissingValues {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("Schema error: name '{0}' is longer than {1} bytes")]
    NameTooLong(String, usize),

    #[error("Schema error: invalid name '{0}'")]
    InvalidName(String),

    #[error("Schema error: invalid operator '{0}' for column '{1}'")]
    InvalidOperator(Operator, String),

    #[error("Schema error: invalid literal '{value}' for column '{column}': {reason}")]
    InvalidLiteral {
        column: String,
        value: String,
        reason: String,
    },

    // ========== Format Errors ==========
    #[error("Format error: malformed row at line {line} of '{table}': {reason}")]
    MalformedRow {
        table: String,
        line: usize,
        reason: String,
    },

    #[error("Format error: corrupted catalog: {0}")]
    CorruptCatalog(String),

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ========== Config Errors ==========
    #[error("Config error: {0}")]
    Config(String),

    // ========== Internal Errors ==========
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Broad failure classes reported alongside a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Schema,
    Format,
    Io,
    Config,
    Internal,
}

impl Error {
    /// Get the failure class of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::EmptyQuery
            | Error::UnterminatedString(_)
            | Error::UnexpectedQuote(_)
            | Error::UnexpectedOperator(_, _)
            | Error::InvalidOperatorToken(_, _)
            | Error::MissingValue(_) => ErrorCategory::Parse,

            Error::TableNotFound(_)
            | Error::TableAlreadyExists(_)
            | Error::ColumnNotFound(_, _)
            | Error::ColumnAlreadyExists(_, _)
            | Error::UnknownType(_, _)
            | Error::TooManyColumns(_, _)
            | Error::TooManyFields(_)
            | Error::MissingValues { .. }
            | Error::NameTooLong(_, _)
            | Error::InvalidName(_)
            | Error::InvalidOperator(_, _)
            | Error::InvalidLiteral { .. } => ErrorCategory::Schema,

            Error::MalformedRow { .. } | Error::CorruptCatalog(_) => ErrorCategory::Format,

            Error::IoError(_) => ErrorCategory::Io,
            Error::Config(_) => ErrorCategory::Config,
            Error::Internal(_) => ErrorCategory::Internal,
        }
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::IoError(err.error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias for FlatDB operations
pub type Result<T> = std::result::Result<T, Error>;
