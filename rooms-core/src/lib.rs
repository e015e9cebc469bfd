pub mod reservation;
pub mod repository;
pub mod ingestion;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Ingestion error: {0}")]
    IngestionError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Treats an empty query parameter the same as a missing one.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
