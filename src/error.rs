//! Error types for gradebook.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Schema setup failed: {0}")]
    Schema(String),
}

/// Primary result code shared by every `SQLITE_CONSTRAINT_*` extended code.
const SQLITE_CONSTRAINT: i32 = 19;

impl DatabaseError {
    /// Classify a libSQL error raised by the statement named `op`.
    pub(crate) fn from_libsql(op: &str, e: libsql::Error) -> Self {
        match e {
            libsql::Error::SqliteFailure(code, _) if code & 0xff == SQLITE_CONSTRAINT => {
                DatabaseError::Constraint(format!("{op}: {e}"))
            }
            _ => DatabaseError::Query(format!("{op}: {e}")),
        }
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
