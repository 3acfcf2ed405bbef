//! Logging behavior: times and records every dispatch.

use std::time::Instant;

use async_trait::async_trait;

use super::behavior::{Behavior, DispatchResult, Next};
use super::context::Context;
use super::request::{Request, Response};

/// Logs the start and completion of each dispatch with its elapsed time.
///
/// The inner result is returned untouched, errors included.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBehavior;

#[async_trait]
impl Behavior for LoggingBehavior {
    async fn handle<Q: Request>(
        &self,
        request: Q,
        ctx: &Context,
        next: Next<'_, Q>,
    ) -> DispatchResult<Q::Response> {
        let started = Instant::now();
        tracing::info!(
            dispatch_id = %ctx.dispatch_id(),
            "Handling {}",
            Q::name()
        );

        let result = next.run(request).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(response) if response.is_failure() => {
                tracing::debug!(dispatch_id = %ctx.dispatch_id(), "{} returned a failed outcome", Q::name());
            }
            Err(err) => {
                tracing::debug!(dispatch_id = %ctx.dispatch_id(), error = %err, "{} did not complete", Q::name());
            }
            Ok(_) => {}
        }
        tracing::info!(
            dispatch_id = %ctx.dispatch_id(),
            elapsed_ms,
            "Handled {} in {}ms",
            Q::name(),
            elapsed_ms
        );

        result
    }
}
