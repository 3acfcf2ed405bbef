//! Request and response contracts.

use std::any::TypeId;

use crate::outcome::{Failure, Outcome, ValidationErrors};

/// A typed unit of work. Each request type is bound to one response type
/// and, through the mediator, to exactly one handler.
pub trait Request: Send + Sync + 'static {
    type Response: Response;

    /// Name used in logs and errors. Defaults to the unqualified type name.
    fn name() -> &'static str
    where
        Self: Sized,
    {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }
}

/// A handler's return type.
///
/// `from_validation` decides how a validation short-circuit is expressed.
/// Types with a typed failure channel (every [`Outcome<T>`]) build their
/// failure value; all others hand the errors back and the dispatch fails
/// with [`DispatchError::Validation`](super::DispatchError::Validation).
pub trait Response: Send + 'static {
    fn from_validation(errors: ValidationErrors) -> Result<Self, ValidationErrors>
    where
        Self: Sized,
    {
        Err(errors)
    }

    /// Whether this value represents a failed outcome. Used only for logging.
    fn is_failure(&self) -> bool {
        false
    }
}

impl<T: Send + 'static> Response for Outcome<T> {
    fn from_validation(errors: ValidationErrors) -> Result<Self, ValidationErrors> {
        Ok(Err(Failure::from(errors)))
    }

    fn is_failure(&self) -> bool {
        self.is_err()
    }
}

impl Response for () {}

impl Response for String {}

impl Response for serde_json::Value {}

/// Type identity plus a readable name, used for registry bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RequestKey {
    pub id: TypeId,
    pub name: &'static str,
}

impl RequestKey {
    pub fn of<Q: Request>() -> Self {
        Self {
            id: TypeId::of::<Q>(),
            name: Q::name(),
        }
    }
}
