use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The underlying transaction or query failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Could not create the directory holding the database file
    #[error("Failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store connection lock poisoned")]
    Poisoned,
}
