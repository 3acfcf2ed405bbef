//! Outcome: the success/failure model handlers return.
//!
//! `Outcome<T>` is an ordinary `Result` whose error side is a [`Failure`]:
//! a non-empty, ordered list of [`DomainError`]s. Success never carries
//! errors and a failure always carries at least one, because `Failure` has
//! no way to be built empty.
//!
//! ## Example
//!
//! ```
//! use mediator_rust::outcome::{fail, DomainError, Outcome, ValidationErrors};
//!
//! fn check(name: &str) -> Outcome<String> {
//!     if name.is_empty() {
//!         return fail(ValidationErrors::single("name", "must not be empty"));
//!     }
//!     Ok(name.to_uppercase())
//! }
//!
//! assert!(check("ada").is_ok());
//! let failure = check("").unwrap_err();
//! assert!(matches!(failure.first(), DomainError::Validation(_)));
//! ```

mod error;

use std::fmt;

pub use error::{DomainError, ErrorKind, ValidationErrors, ValidationFailure};

/// Result of a handler: a value, or one or more domain errors.
pub type Outcome<T> = Result<T, Failure>;

/// Build a failed [`Outcome`] for any success type.
///
/// `T` is resolved from the caller's declared type, so no per-type
/// registration is needed.
pub fn fail<T>(error: impl Into<DomainError>) -> Outcome<T> {
    Err(Failure::new(error))
}

/// The error side of an [`Outcome`]. Always holds at least one error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    errors: Vec<DomainError>,
}

impl Failure {
    pub fn new(error: impl Into<DomainError>) -> Self {
        Self {
            errors: vec![error.into()],
        }
    }

    /// Build a failure from a list of errors. Returns `None` when the list is empty.
    pub fn from_errors(errors: Vec<DomainError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    /// The first error, the one reported to callers.
    pub fn first(&self) -> &DomainError {
        &self.errors[0]
    }

    pub fn errors(&self) -> &[DomainError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<DomainError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Append another error, keeping order.
    pub fn push(&mut self, error: impl Into<DomainError>) {
        self.errors.push(error.into());
    }

    pub fn with(mut self, error: impl Into<DomainError>) -> Self {
        self.push(error);
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first())?;
        if self.errors.len() > 1 {
            write!(f, " (+{} more)", self.errors.len() - 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.first())
    }
}

impl From<DomainError> for Failure {
    fn from(error: DomainError) -> Self {
        Failure::new(error)
    }
}

impl From<ValidationErrors> for Failure {
    fn from(errors: ValidationErrors) -> Self {
        Failure::new(DomainError::Validation(errors))
    }
}
