//! Transport mapping: turns dispatch results into wire responses.
//!
//! [`ResultMapper`] is the only place that knows status codes. Handlers
//! return [`Outcome`]s; the mapper picks the status from the first domain
//! error and builds a problem-details body for it.
//!
//! | first error              | status | `type` suffix            |
//! |--------------------------|--------|--------------------------|
//! | `Validation`             | 422    | `validation-error`       |
//! | anything else            | 500    | `internal-server-error`  |
//!
//! With [`MapperConfig::map_extended_kinds`] on, `NotFound`, `Conflict` and
//! `Forbidden` map to 404, 409 and 403 instead of 500.
//!
//! The HTTP binding lives in [`http`] (feature `http`).

#[cfg(feature = "http")]
pub mod http;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::mediator::DispatchError;
use crate::outcome::{DomainError, Failure, Outcome, ValidationErrors};

/// Content type of successful responses.
pub const JSON: &str = "application/json";
/// Content type of failure responses.
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Default prefix for problem `type` URIs.
pub const DEFAULT_PROBLEM_TYPE_PREFIX: &str = "https://example.com/errors";

pub const VALIDATION_TITLE: &str = "One or more validation errors occurred";
pub const INTERNAL_TITLE: &str = "An error occurred processing your request";

/// A fully decided response: status and body are fixed together.
#[derive(Debug, Clone, PartialEq)]
pub struct WireResponse {
    status: u16,
    body: Value,
    content_type: &'static str,
}

impl WireResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body,
            content_type: JSON,
        }
    }

    pub fn problem(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            content_type: PROBLEM_JSON,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn into_parts(self) -> (u16, &'static str, Value) {
        (self.status, self.content_type, self.body)
    }
}

/// Mapper settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Prefix for the problem `type` URI, without a trailing slash.
    pub problem_type_prefix: String,
    /// Map not-found, conflict and forbidden errors to their own status codes.
    pub map_extended_kinds: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            problem_type_prefix: DEFAULT_PROBLEM_TYPE_PREFIX.to_string(),
            map_extended_kinds: false,
        }
    }
}

/// Converts outcomes and dispatch errors into [`WireResponse`]s.
///
/// Pure: the same input always yields the same response.
#[derive(Debug, Clone, Default)]
pub struct ResultMapper {
    config: MapperConfig,
}

impl ResultMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Map a handler outcome. `instance` is the request path.
    pub fn map<T: Serialize>(&self, outcome: &Outcome<T>, instance: &str) -> WireResponse {
        match outcome {
            Ok(value) => match serde_json::to_value(value) {
                Ok(body) => WireResponse::ok(body),
                Err(err) => {
                    tracing::error!(error = %err, instance, "failed to encode response");
                    self.internal()
                }
            },
            Err(failure) => self.map_failure(failure, instance),
        }
    }

    /// Map a failure. Only the first error decides the response.
    pub fn map_failure(&self, failure: &Failure, instance: &str) -> WireResponse {
        if failure.len() > 1 {
            let errors: Vec<String> = failure.errors().iter().map(ToString::to_string).collect();
            tracing::warn!(?errors, instance, "multiple errors in failure; mapping the first");
        }

        match failure.first() {
            DomainError::Validation(errors) => self.validation(errors, instance),
            other if self.config.map_extended_kinds => self.extended(other, instance),
            _ => self.internal(),
        }
    }

    /// Map an error raised by the dispatch itself rather than returned by a handler.
    pub fn map_dispatch_error(&self, err: &DispatchError, instance: &str) -> WireResponse {
        match err {
            DispatchError::Validation(errors) => self.validation(errors, instance),
            DispatchError::Cancelled(_) => WireResponse::problem(
                err.status_code(),
                json!({
                    "type": self.type_uri("request-cancelled"),
                    "title": "The request was cancelled",
                    "status": err.status_code(),
                    "instance": instance,
                }),
            ),
            DispatchError::NoHandler(name) => {
                tracing::error!(request = name, instance, "no handler registered");
                self.internal()
            }
        }
    }

    fn validation(&self, errors: &ValidationErrors, instance: &str) -> WireResponse {
        WireResponse::problem(
            422,
            json!({
                "type": self.type_uri("validation-error"),
                "title": VALIDATION_TITLE,
                "status": 422,
                "instance": instance,
                "errors": errors.grouped(),
            }),
        )
    }

    fn extended(&self, error: &DomainError, instance: &str) -> WireResponse {
        let (status, suffix, title) = match error {
            DomainError::NotFound(_) => (404, "not-found", "The requested resource was not found"),
            DomainError::Conflict(_) => (
                409,
                "conflict",
                "The request conflicts with the current state of the resource",
            ),
            DomainError::Forbidden(_) => (403, "forbidden", "Access to the resource is forbidden"),
            _ => return self.internal(),
        };
        WireResponse::problem(
            status,
            json!({
                "type": self.type_uri(suffix),
                "title": title,
                "status": status,
                "detail": error.message(),
                "instance": instance,
            }),
        )
    }

    fn internal(&self) -> WireResponse {
        WireResponse::problem(
            500,
            json!({
                "type": self.type_uri("internal-server-error"),
                "title": INTERNAL_TITLE,
                "status": 500,
            }),
        )
    }

    fn type_uri(&self, suffix: &str) -> String {
        format!(
            "{}/{}",
            self.config.problem_type_prefix.trim_end_matches('/'),
            suffix
        )
    }
}
