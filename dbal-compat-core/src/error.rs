//! Error types for dbal-compat

use thiserror::Error;

/// The main error type for dbal-compat operations
#[derive(Error, Debug)]
pub enum Error {
    /// Builder or statement contract violation
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Database connection or execution error, passed through from the driver
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid connection configuration
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Convenience Result type for dbal-compat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Input validation failures raised by the builders and the prepared statement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Table name is empty or numeric
    #[error("No table name found in {statement} statement.")]
    MissingTable { statement: &'static str },

    /// INSERT or UPDATE without any column/value pair
    #[error("No columns or values found in {statement} statement.")]
    MissingValues { statement: &'static str },

    /// Parallel column and value lists of different length
    #[error("The amount of columns ({columns}) and values ({values}) must be equal in {statement} statement.")]
    ArityMismatch {
        statement: &'static str,
        columns: usize,
        values: usize,
    },

    /// Explicit placeholder that is not of the form `:name`
    #[error("Parameter names must start with \":\" followed by alphanumerical characters, got '{name}'.")]
    InvalidPlaceholderName { name: String },

    /// Declared parameter type disagrees with the value
    #[error("Value for '{placeholder}' is not of type {expected} as declared, found {found}.")]
    TypeMismatch {
        placeholder: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Any other small contract violation
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Discriminant of a [`QueryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryErrorKind {
    MissingTable,
    MissingValues,
    ArityMismatch,
    InvalidPlaceholderName,
    TypeMismatch,
    InvalidArgument,
}

impl QueryError {
    /// The kind of this error
    pub fn kind(&self) -> QueryErrorKind {
        match self {
            QueryError::MissingTable { .. } => QueryErrorKind::MissingTable,
            QueryError::MissingValues { .. } => QueryErrorKind::MissingValues,
            QueryError::ArityMismatch { .. } => QueryErrorKind::ArityMismatch,
            QueryError::InvalidPlaceholderName { .. } => QueryErrorKind::InvalidPlaceholderName,
            QueryError::TypeMismatch { .. } => QueryErrorKind::TypeMismatch,
            QueryError::InvalidArgument { .. } => QueryErrorKind::InvalidArgument,
        }
    }
}

impl Error {
    /// Create a new missing table error
    pub fn missing_table(statement: &'static str) -> Self {
        QueryError::MissingTable { statement }.into()
    }

    /// Create a new missing values error
    pub fn missing_values(statement: &'static str) -> Self {
        QueryError::MissingValues { statement }.into()
    }

    /// Create a new arity mismatch error
    pub fn arity_mismatch(statement: &'static str, columns: usize, values: usize) -> Self {
        QueryError::ArityMismatch {
            statement,
            columns,
            values,
        }
        .into()
    }

    /// Create a new invalid placeholder name error
    pub fn invalid_placeholder(name: impl Into<String>) -> Self {
        QueryError::InvalidPlaceholderName { name: name.into() }.into()
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        QueryError::InvalidArgument {
            message: message.into(),
        }
        .into()
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The builder-level error kind, if this is a [`QueryError`]
    pub fn query_kind(&self) -> Option<QueryErrorKind> {
        match self {
            Error::Query(err) => Some(err.kind()),
            _ => None,
        }
    }
}
