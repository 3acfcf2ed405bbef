//! Behaviors: middleware wrapped around every handler invocation.
//!
//! A chain is a nested tuple of behaviors ending in `()`:
//! `(Logging, (Validation, ()))` runs as `Logging(Validation(handler))`.
//! The chain is a static value built once by the [`MediatorBuilder`], so
//! order is fixed at startup and identical for every request type.
//!
//! Each behavior gets the request, the [`Context`], and a [`Next`] for the
//! rest of the chain. It may:
//! - call `next.run(request)` and return its result, unchanged or transformed;
//! - not call `next` at all and return its own result (short-circuit);
//! - call `next` and post-process the result.
//!
//! `Next::run` consumes the `Next`, so the rest of the chain runs at most once.
//!
//! [`MediatorBuilder`]: super::MediatorBuilder

use async_trait::async_trait;
use futures::future::BoxFuture;

use super::context::Context;
use super::error::DispatchError;
use super::handler::RequestHandler;
use super::request::Request;

/// Result of running (part of) the chain.
pub type DispatchResult<T> = Result<T, DispatchError>;

type Continuation<'a, Q> = Box<
    dyn FnOnce(Q) -> BoxFuture<'a, DispatchResult<<Q as Request>::Response>> + Send + 'a,
>;

/// The remainder of the chain, ending in the handler.
pub struct Next<'a, Q: Request> {
    continuation: Continuation<'a, Q>,
}

impl<'a, Q: Request> Next<'a, Q> {
    pub fn new<F>(continuation: F) -> Self
    where
        F: FnOnce(Q) -> BoxFuture<'a, DispatchResult<Q::Response>> + Send + 'a,
    {
        Self {
            continuation: Box::new(continuation),
        }
    }

    /// Run the rest of the chain with `request`.
    pub async fn run(self, request: Q) -> DispatchResult<Q::Response> {
        (self.continuation)(request).await
    }
}

/// A wrapper around dispatch, applied to every request type.
#[async_trait]
pub trait Behavior: Send + Sync + 'static {
    async fn handle<Q: Request>(
        &self,
        request: Q,
        ctx: &Context,
        next: Next<'_, Q>,
    ) -> DispatchResult<Q::Response>;
}

/// An ordered, statically composed list of behaviors.
///
/// Implemented for `()` (no behaviors) and for `(B, Rest)` where `B` wraps `Rest`.
#[async_trait]
pub trait Chain: Send + Sync + 'static {
    async fn run<Q: Request>(
        &self,
        request: Q,
        ctx: &Context,
        handler: &dyn RequestHandler<Q>,
    ) -> DispatchResult<Q::Response>;
}

#[async_trait]
impl Chain for () {
    async fn run<Q: Request>(
        &self,
        request: Q,
        ctx: &Context,
        handler: &dyn RequestHandler<Q>,
    ) -> DispatchResult<Q::Response> {
        Ok(handler.handle(request, ctx).await)
    }
}

#[async_trait]
impl<B: Behavior, Rest: Chain> Chain for (B, Rest) {
    async fn run<Q: Request>(
        &self,
        request: Q,
        ctx: &Context,
        handler: &dyn RequestHandler<Q>,
    ) -> DispatchResult<Q::Response> {
        let rest = &self.1;
        let next = Next::new(move |request| rest.run(request, ctx, handler));
        self.0.handle(request, ctx, next).await
    }
}

/// Appends a behavior at the innermost position of a chain.
pub trait Append<B> {
    type Output: Chain;

    fn append(self, behavior: B) -> Self::Output;
}

impl<B: Behavior> Append<B> for () {
    type Output = (B, ());

    fn append(self, behavior: B) -> Self::Output {
        (behavior, ())
    }
}

impl<H, T, B> Append<B> for (H, T)
where
    H: Behavior,
    T: Chain + Append<B>,
{
    type Output = (H, T::Output);

    fn append(self, behavior: B) -> Self::Output {
        (self.0, self.1.append(behavior))
    }
}
