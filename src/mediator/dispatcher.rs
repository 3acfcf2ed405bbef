//! Mediator: handler registry and the single dispatch entry point.
//!
//! `Mediator<C>` holds one handler per request type and a static behavior
//! chain `C`. Every dispatch goes through the chain; there is no other way
//! to reach a handler.
//!
//! ## Example
//!
//! ```ignore
//! use mediator_rust::mediator::{LoggingBehavior, Mediator, Validators};
//!
//! let mediator = Mediator::builder()
//!     .behavior(LoggingBehavior)
//!     .validation(Validators::new().with::<CreateCampaign, _>(CreateCampaignValidator))
//!     .handler::<CreateCampaign, _>(CreateCampaignHandler::new(store.clone()))
//!     .require::<CreateCampaign>()
//!     .build()?;
//!
//! let outcome = mediator.send(CreateCampaign::new(input)).await?;
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::behavior::{Append, Chain, DispatchResult};
use super::context::Context;
use super::error::{ConfigError, DispatchError};
use super::handler::RequestHandler;
use super::request::{Request, RequestKey};
use super::validation::{ValidationBehavior, Validators};
use crate::bus::{Notification, Notifications};

/// A registered handler. `handler` is an `Arc<dyn RequestHandler<Q>>` for `key`'s type.
struct HandlerEntry {
    key: RequestKey,
    handler: Box<dyn Any + Send + Sync>,
}

/// Builds a [`Mediator`]. Behaviors are applied in declaration order,
/// first declared outermost.
pub struct MediatorBuilder<C = ()> {
    chain: C,
    handlers: HashMap<TypeId, HandlerEntry>,
    duplicates: Vec<&'static str>,
    required: Vec<RequestKey>,
    validated: Vec<RequestKey>,
    notifications: Notifications,
}

impl Default for MediatorBuilder<()> {
    fn default() -> Self {
        Self {
            chain: (),
            handlers: HashMap::new(),
            duplicates: Vec::new(),
            required: Vec::new(),
            validated: Vec::new(),
            notifications: Notifications::new(),
        }
    }
}

impl MediatorBuilder<()> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Chain> MediatorBuilder<C> {
    /// Wrap all handlers in `behavior`, inside every behavior declared so far.
    pub fn behavior<B>(self, behavior: B) -> MediatorBuilder<<C as Append<B>>::Output>
    where
        C: Append<B>,
    {
        MediatorBuilder {
            chain: self.chain.append(behavior),
            handlers: self.handlers,
            duplicates: self.duplicates,
            required: self.required,
            validated: self.validated,
            notifications: self.notifications,
        }
    }

    /// Add a [`ValidationBehavior`] over `validators` at this position in the chain.
    pub fn validation(
        mut self,
        validators: Validators,
    ) -> MediatorBuilder<<C as Append<ValidationBehavior>>::Output>
    where
        C: Append<ValidationBehavior>,
    {
        self.validated.extend(validators.keys());
        self.behavior(ValidationBehavior::new(validators))
    }

    /// Register the handler for `Q`. Registering two handlers for the same
    /// request type makes [`build`](Self::build) fail.
    pub fn handler<Q, H>(mut self, handler: H) -> Self
    where
        Q: Request,
        H: RequestHandler<Q>,
    {
        let key = RequestKey::of::<Q>();
        let handler: Arc<dyn RequestHandler<Q>> = Arc::new(handler);
        if self.handlers.contains_key(&key.id) {
            self.duplicates.push(key.name);
        } else {
            self.handlers.insert(
                key.id,
                HandlerEntry {
                    key,
                    handler: Box::new(handler),
                },
            );
        }
        self
    }

    /// Declare that `Q` must have a handler by the time [`build`](Self::build) runs.
    pub fn require<Q: Request>(mut self) -> Self {
        self.required.push(RequestKey::of::<Q>());
        self
    }

    /// Use an existing notifications hub instead of a fresh one.
    pub fn notifications(mut self, notifications: Notifications) -> Self {
        self.notifications = notifications;
        self
    }

    /// Check the registrations and build the mediator.
    pub fn build(self) -> Result<Mediator<C>, ConfigError> {
        if let Some(name) = self.duplicates.first() {
            return Err(ConfigError::DuplicateHandler(name));
        }
        if let Some(key) = self
            .required
            .iter()
            .find(|key| !self.handlers.contains_key(&key.id))
        {
            return Err(ConfigError::MissingHandler(key.name));
        }
        if let Some(key) = self
            .validated
            .iter()
            .find(|key| !self.handlers.contains_key(&key.id))
        {
            return Err(ConfigError::OrphanValidators(key.name));
        }

        let mut requests: Vec<&'static str> =
            self.handlers.values().map(|entry| entry.key.name).collect();
        requests.sort_unstable();
        tracing::debug!(?requests, "mediator built");

        Ok(Mediator {
            chain: self.chain,
            handlers: self
                .handlers
                .into_iter()
                .map(|(id, entry)| (id, entry.handler))
                .collect(),
            requests,
            notifications: self.notifications,
        })
    }
}

/// Dispatches requests to their handler through the behavior chain.
pub struct Mediator<C = ()> {
    chain: C,
    handlers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    requests: Vec<&'static str>,
    notifications: Notifications,
}

impl Mediator<()> {
    pub fn builder() -> MediatorBuilder<()> {
        MediatorBuilder::new()
    }
}

impl<C: Chain> Mediator<C> {
    /// Dispatch `request` with a fresh cancellation token.
    pub async fn send<Q: Request>(&self, request: Q) -> DispatchResult<Q::Response> {
        self.send_with(request, CancellationToken::new()).await
    }

    /// Dispatch `request`, aborting as soon as `cancellation` fires.
    ///
    /// On cancellation the in-flight chain (validators and handler
    /// included) is dropped and [`DispatchError::Cancelled`] is returned.
    pub async fn send_with<Q: Request>(
        &self,
        request: Q,
        cancellation: CancellationToken,
    ) -> DispatchResult<Q::Response> {
        let handler = self
            .handler::<Q>()
            .ok_or(DispatchError::NoHandler(Q::name()))?;
        let ctx = Context::new(Q::name(), cancellation.clone(), self.notifications.clone());

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                tracing::info!(dispatch_id = %ctx.dispatch_id(), "Dispatch of {} cancelled", Q::name());
                Err(DispatchError::Cancelled(Q::name()))
            }
            result = self.chain.run(request, &ctx, handler.as_ref()) => result,
        }
    }

    /// Publish `event` to the notifications hub. Fire-and-forget: returns
    /// the number of subscribers reached, possibly zero.
    pub fn publish<E: Notification>(&self, event: E) -> usize {
        self.notifications.publish(event)
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Whether a handler is registered for `Q`.
    pub fn handles<Q: Request>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<Q>())
    }

    /// Names of the request types with a registered handler, sorted.
    pub fn requests(&self) -> &[&'static str] {
        &self.requests
    }

    fn handler<Q: Request>(&self) -> Option<Arc<dyn RequestHandler<Q>>> {
        self.handlers
            .get(&TypeId::of::<Q>())
            .and_then(|handler| handler.downcast_ref::<Arc<dyn RequestHandler<Q>>>())
            .cloned()
    }
}
