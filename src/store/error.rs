use thiserror::Error;
use uuid::Uuid;

use crate::outcome::{DomainError, Failure};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {0} already exists")]
    AlreadyExists(Uuid),
    #[error("document {0} not found")]
    NotFound(Uuid),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("document encoding failed: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(id) => {
                DomainError::Conflict(format!("{id} already exists"))
            }
            StoreError::NotFound(id) => DomainError::NotFound(format!("{id} not found")),
            StoreError::Io(_) | StoreError::Serde(_) => {
                tracing::error!(error = %err, "store failure");
                DomainError::Internal(err.to_string())
            }
        }
    }
}

impl From<StoreError> for Failure {
    fn from(err: StoreError) -> Self {
        Failure::new(DomainError::from(err))
    }
}
