//! Validation behavior: runs every validator for a request and
//! short-circuits the dispatch when any of them reports a failure.
//!
//! Validators are registered per request type in a [`Validators`] registry
//! that is built once at startup and only read afterwards. A request type
//! with no validators costs one map lookup.
//!
//! When failures are found the handler is never invoked:
//! - if the response type is an [`Outcome<T>`], the dispatch returns
//!   `Ok(Err(Failure(Validation(..))))`;
//! - otherwise it returns [`DispatchError::Validation`].
//!
//! [`Outcome<T>`]: crate::outcome::Outcome

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use super::behavior::{Behavior, DispatchResult, Next};
use super::context::Context;
use super::error::DispatchError;
use super::request::{Request, RequestKey, Response};
use crate::outcome::{ValidationErrors, ValidationFailure};

/// Checks one request type. Must not touch shared state.
#[async_trait]
pub trait Validator<Q: Request>: Send + Sync + 'static {
    async fn validate(
        &self,
        request: &Q,
        cancellation: &CancellationToken,
    ) -> Vec<ValidationFailure>;
}

struct Entry {
    key: RequestKey,
    /// `Vec<Arc<dyn Validator<Q>>>` for the request type in `key`.
    validators: Box<dyn Any + Send + Sync>,
}

/// Validators keyed by the request type they apply to.
#[derive(Default)]
pub struct Validators {
    entries: HashMap<TypeId, Entry>,
}

impl Validators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator for `Q`.
    ///
    /// Builder form of [`add`](Self::add).
    pub fn with<Q, V>(mut self, validator: V) -> Self
    where
        Q: Request,
        V: Validator<Q>,
    {
        self.add::<Q, V>(validator);
        self
    }

    pub fn add<Q, V>(&mut self, validator: V)
    where
        Q: Request,
        V: Validator<Q>,
    {
        let key = RequestKey::of::<Q>();
        let entry = self.entries.entry(key.id).or_insert_with(|| Entry {
            key,
            validators: Box::new(Vec::<Arc<dyn Validator<Q>>>::new()),
        });
        if let Some(list) = entry
            .validators
            .downcast_mut::<Vec<Arc<dyn Validator<Q>>>>()
        {
            list.push(Arc::new(validator));
        }
    }

    /// Validators registered for `Q`, in registration order.
    pub fn for_request<Q: Request>(&self) -> &[Arc<dyn Validator<Q>>] {
        self.entries
            .get(&TypeId::of::<Q>())
            .and_then(|entry| {
                entry
                    .validators
                    .downcast_ref::<Vec<Arc<dyn Validator<Q>>>>()
            })
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of validators registered for `Q`.
    pub fn count<Q: Request>(&self) -> usize {
        self.for_request::<Q>().len()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = RequestKey> + '_ {
        self.entries.values().map(|entry| entry.key)
    }
}

/// Behavior that validates requests before they reach the handler.
pub struct ValidationBehavior {
    validators: Validators,
}

impl ValidationBehavior {
    pub fn new(validators: Validators) -> Self {
        Self { validators }
    }

    pub fn validators(&self) -> &Validators {
        &self.validators
    }
}

#[async_trait]
impl Behavior for ValidationBehavior {
    async fn handle<Q: Request>(
        &self,
        request: Q,
        ctx: &Context,
        next: Next<'_, Q>,
    ) -> DispatchResult<Q::Response> {
        let validators = self.validators.for_request::<Q>();
        if validators.is_empty() {
            return next.run(request).await;
        }

        let cancellation = ctx.cancellation();
        let reports = join_all(
            validators
                .iter()
                .map(|validator| validator.validate(&request, cancellation)),
        )
        .await;

        let errors: ValidationErrors = reports.into_iter().flatten().collect();
        let errors = errors.dedup();
        if errors.is_empty() {
            return next.run(request).await;
        }

        tracing::info!(
            dispatch_id = %ctx.dispatch_id(),
            failures = errors.len(),
            "Validation failed for {}",
            Q::name()
        );

        match Q::Response::from_validation(errors) {
            Ok(response) => Ok(response),
            Err(errors) => Err(DispatchError::Validation(errors)),
        }
    }
}

/// Small rule helpers for writing validators.
///
/// Each returns `Some(failure)` when the rule is broken.
pub mod rules {
    use crate::outcome::ValidationFailure;

    pub fn not_blank(field: &str, value: &str) -> Option<ValidationFailure> {
        value
            .trim()
            .is_empty()
            .then(|| ValidationFailure::new(field, "must not be empty"))
    }

    pub fn max_len(field: &str, value: &str, max: usize) -> Option<ValidationFailure> {
        (value.chars().count() > max).then(|| {
            ValidationFailure::new(field, format!("must be at most {max} characters"))
        })
    }

    pub fn in_range<T>(field: &str, value: T, min: T, max: T) -> Option<ValidationFailure>
    where
        T: PartialOrd + std::fmt::Display,
    {
        (value < min || value > max).then(|| {
            ValidationFailure::new(field, format!("must be between {min} and {max}"))
        })
    }

    pub fn positive<T>(field: &str, value: T) -> Option<ValidationFailure>
    where
        T: PartialOrd + Default,
    {
        (value <= T::default()).then(|| ValidationFailure::new(field, "must be greater than 0"))
    }
}
