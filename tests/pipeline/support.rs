#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mediator_rust::mediator::{
    Behavior, Context, DispatchResult, Next, Request, RequestHandler, Validator,
};
use mediator_rust::outcome::{Outcome, ValidationFailure};
use mediator_rust::CancellationToken;
use parking_lot::Mutex;

pub type Log = Arc<Mutex<Vec<String>>>;

/// Request with a typed failure channel.
#[derive(Debug, Clone)]
pub struct Echo {
    pub text: String,
}

impl Echo {
    pub fn new(text: &str) -> Self {
        Self { text: text.into() }
    }
}

impl Request for Echo {
    type Response = Outcome<String>;
}

/// Request whose response has no failure channel.
#[derive(Debug, Clone)]
pub struct Shout {
    pub text: String,
}

impl Request for Shout {
    type Response = String;
}

#[derive(Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct EchoHandler {
    pub calls: Calls,
    pub log: Log,
    pub delay: Option<Duration>,
}

impl EchoHandler {
    pub fn new(calls: Calls, log: Log) -> Self {
        Self {
            calls,
            log,
            delay: None,
        }
    }
}

#[async_trait]
impl RequestHandler<Echo> for EchoHandler {
    async fn handle(&self, request: Echo, _ctx: &Context) -> Outcome<String> {
        self.calls.hit();
        self.log.lock().push("handler".into());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(request.text)
    }
}

pub struct ShoutHandler {
    pub calls: Calls,
    pub log: Log,
}

#[async_trait]
impl RequestHandler<Shout> for ShoutHandler {
    async fn handle(&self, request: Shout, _ctx: &Context) -> String {
        self.calls.hit();
        self.log.lock().push("handler".into());
        request.text.to_uppercase()
    }
}

/// Behavior that records when it is entered and left.
pub struct Recorder {
    pub label: &'static str,
    pub log: Log,
}

impl Recorder {
    pub fn new(label: &'static str, log: &Log) -> Self {
        Self {
            label,
            log: log.clone(),
        }
    }
}

#[async_trait]
impl Behavior for Recorder {
    async fn handle<Q: Request>(
        &self,
        request: Q,
        _ctx: &Context,
        next: Next<'_, Q>,
    ) -> DispatchResult<Q::Response> {
        self.log.lock().push(format!("{} enter", self.label));
        let result = next.run(request).await;
        self.log.lock().push(format!("{} leave", self.label));
        result
    }
}

/// Validator returning a fixed list of failures.
pub struct Fixed(pub Vec<ValidationFailure>);

impl Fixed {
    pub fn passing() -> Self {
        Self(Vec::new())
    }

    pub fn failing(field: &str, message: &str) -> Self {
        Self(vec![ValidationFailure::new(field, message)])
    }
}

#[async_trait]
impl Validator<Echo> for Fixed {
    async fn validate(&self, _: &Echo, _: &CancellationToken) -> Vec<ValidationFailure> {
        self.0.clone()
    }
}

#[async_trait]
impl Validator<Shout> for Fixed {
    async fn validate(&self, _: &Shout, _: &CancellationToken) -> Vec<ValidationFailure> {
        self.0.clone()
    }
}

/// Validator that only finishes once `parties` validators are waiting together.
pub struct Rendezvous(pub Arc<tokio::sync::Barrier>);

#[async_trait]
impl Validator<Echo> for Rendezvous {
    async fn validate(&self, _: &Echo, _: &CancellationToken) -> Vec<ValidationFailure> {
        self.0.wait().await;
        Vec::new()
    }
}

/// Validator that signals it has started and then never finishes.
pub struct Stalled(pub Arc<tokio::sync::Notify>);

#[async_trait]
impl Validator<Echo> for Stalled {
    async fn validate(&self, _: &Echo, _: &CancellationToken) -> Vec<ValidationFailure> {
        self.0.notify_one();
        std::future::pending().await
    }
}
