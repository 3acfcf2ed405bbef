//! Error taxonomy carried by a failed [`Outcome`](super::Outcome).

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Forbidden,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for handler outcomes.
///
/// Only [`DomainError::Validation`] and the internal fallback have a fixed
/// wire mapping. The other kinds are reported as internal errors unless the
/// transport mapper opts into extended mappings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// One or more validation rules failed.
    #[error("{0}")]
    Validation(ValidationErrors),
    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The request conflicts with the current state of the resource.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The caller may not perform this request.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Anything else. Detail is logged, never sent to the caller.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Conflict(_) => ErrorKind::Conflict,
            DomainError::Forbidden(_) => ErrorKind::Forbidden,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn message(&self) -> String {
        match self {
            DomainError::Validation(errors) => errors.to_string(),
            DomainError::NotFound(msg)
            | DomainError::Conflict(msg)
            | DomainError::Forbidden(msg)
            | DomainError::Internal(msg) => msg.clone(),
        }
    }

    pub fn as_validation(&self) -> Option<&ValidationErrors> {
        match self {
            DomainError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::Validation(errors)
    }
}

/// A single failed validation rule, addressed to a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Dotted path of the offending field (e.g. `dates[0].startTime`).
    pub field: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Flat, ordered list of validation failures.
///
/// Grouping by field happens at mapping time (see [`ValidationErrors::grouped`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    failures: Vec<ValidationFailure>,
}

impl ValidationErrors {
    pub fn new(failures: Vec<ValidationFailure>) -> Self {
        Self { failures }
    }

    /// Build a list holding one failure.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![ValidationFailure::new(field, message)])
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<ValidationFailure> {
        self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Drop failures equal by value to an earlier one, keeping first occurrence order.
    pub fn dedup(mut self) -> Self {
        let mut seen = HashSet::with_capacity(self.failures.len());
        self.failures.retain(|f| seen.insert(f.clone()));
        self
    }

    /// Group messages by field path. Keys are sorted so bodies are stable.
    pub fn grouped(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for failure in &self.failures {
            grouped
                .entry(failure.field.clone())
                .or_default()
                .push(failure.message.clone());
        }
        grouped
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (i, failure) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{failure}")?;
        }
        Ok(())
    }
}

impl FromIterator<ValidationFailure> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationFailure>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
