//! Handler contract.

use async_trait::async_trait;

use super::context::Context;
use super::request::Request;

/// Domain logic for one request type.
///
/// Handlers are only ever invoked by the mediator, behind its behavior
/// chain. A handler that may fail should declare an [`Outcome`] response
/// so failures travel as values.
///
/// [`Outcome`]: crate::outcome::Outcome
#[async_trait]
pub trait RequestHandler<Q: Request>: Send + Sync + 'static {
    async fn handle(&self, request: Q, ctx: &Context) -> Q::Response;
}
