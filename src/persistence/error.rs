/// Errors raised by the task store and the running-task pointer
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The SQLite engine rejected a query or write
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Reading or writing a side-channel file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The pointer file did not contain valid JSON
    #[error("malformed pointer file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
