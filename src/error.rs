//! Error types for the GoodGeeks site backend.

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

    #[error("Migration failed: {0}")]
    Migration(String),
}

impl DatabaseError {
    /// Whether this error is a unique-constraint violation (duplicate row).
    pub fn is_constraint(&self) -> bool {
        matches!(self, DatabaseError::Constraint(_))
    }
}

/// Chat proxy errors.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response from chat provider: {0}")]
    InvalidResponse(String),
}
