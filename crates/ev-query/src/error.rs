use ev_core::CoreError;
use thiserror::Error;

pub type QueryResult<T> = Result<T, QueryError>;

/// Precondition failures caught before any backend call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Database path must not be empty")]
    EmptyDbPath,

    #[error("Query text must not be empty")]
    EmptyQuery,

    #[error("Table name must not be empty")]
    EmptyTable,

    #[error("Expected a .{expected} file, got: {path}")]
    WrongExtension { path: String, expected: String },

    #[error("No {what} selected")]
    MissingSelection { what: &'static str },

    #[error("Unsupported chart type: {kind}")]
    UnsupportedChart { kind: String },

    #[error("Options do not fit a {kind} chart")]
    OptionsMismatch { kind: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{operation} failed: {message}")]
    Backend { operation: String, message: String },

    #[error("Column '{column}' missing from result row")]
    MissingColumn { column: String },

    #[error("Column '{column}' holds {found}, expected {expected}")]
    Decode {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("File selection failed: {message}")]
    Picker { message: String },
}

impl From<CoreError> for QueryError {
    fn from(err: CoreError) -> Self {
        QueryError::Validation(ValidationError::Core(err))
    }
}

impl QueryError {
    pub fn backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError::Backend {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, QueryError::Validation(_))
    }
}
