//! Error types for the mediator.

use thiserror::Error;

use crate::outcome::ValidationErrors;

/// Error raised by a dispatch, outside the handler's own response type.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Validation failed and the response type has no typed failure channel.
    #[error("{0}")]
    Validation(ValidationErrors),
    /// The caller cancelled the dispatch before it completed.
    #[error("dispatch of {0} was cancelled")]
    Cancelled(&'static str),
    /// No handler is registered for this request type.
    #[error("no handler registered for {0}")]
    NoHandler(&'static str),
}

impl DispatchError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::Validation(_) => 422,
            DispatchError::Cancelled(_) => 499,
            DispatchError::NoHandler(_) => 500,
        }
    }
}

/// Error raised while building a [`Mediator`](super::Mediator).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// More than one handler was registered for the same request type.
    #[error("more than one handler registered for {0}")]
    DuplicateHandler(&'static str),
    /// A required request type has no handler.
    #[error("no handler registered for required request {0}")]
    MissingHandler(&'static str),
    /// Validators were registered for a request type nothing handles.
    #[error("validators registered for {0}, which has no handler")]
    OrphanValidators(&'static str),
}
