use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListError {
    /// Enumerated filter option rejected at declaration time
    #[error("Invalid filter option on column {column}: {reason}")]
    InvalidFilterOption { column: String, reason: String },

    /// Join dependency graph contains a cycle
    #[error("Join dependency cycle: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    /// A join dependency names a join that was never registered
    #[error("Unknown join {name} (required by {required_by})")]
    UnknownJoin { name: String, required_by: String },

    /// Datetime cell did not match `YYYY-MM-DD HH:MM:SS[.ffffff]`
    #[error("Couldn't parse datetime value ({0})")]
    InvalidDateTime(String),

    /// Error executing a query
    #[error("Execution error: {0}")]
    Execution(String),

    /// PostgreSQL driver errors
    #[cfg(feature = "postgres-sync")]
    #[error("Postgres error: {0}")]
    Postgres(#[from] postgres::Error),
}

/// Result type for list operations
pub type Result<T> = std::result::Result<T, ListError>;
