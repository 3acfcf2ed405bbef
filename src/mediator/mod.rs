//! Mediator: request dispatch through an ordered behavior chain.
//!
//! ## Architecture
//!
//! ```text
//! caller ──send(request)──► Mediator
//!                              │  looks up the one handler for the request type
//!                              ▼
//!                       ┌─────────────────┐
//!                       │ LoggingBehavior │   declared first, outermost
//!                       └────────┬────────┘
//!                                ▼
//!                       ┌────────────────────┐
//!                       │ ValidationBehavior │   may short-circuit
//!                       └────────┬───────────┘
//!                                ▼
//!                         RequestHandler<Q>
//! ```
//!
//! Handlers return their own response type. For [`Outcome<T>`] responses
//! failures travel in the value; the dispatch itself only fails for
//! cancellation, a missing handler, or validation of a request whose
//! response has no failure channel.
//!
//! [`Outcome<T>`]: crate::outcome::Outcome

mod behavior;
mod context;
mod dispatcher;
mod error;
mod handler;
mod logging;
mod request;
mod validation;

pub use behavior::{Append, Behavior, Chain, DispatchResult, Next};
pub use context::Context;
pub use dispatcher::{Mediator, MediatorBuilder};
pub use error::{ConfigError, DispatchError};
pub use handler::RequestHandler;
pub use logging::LoggingBehavior;
pub use request::{Request, Response};
pub use validation::{rules, ValidationBehavior, Validator, Validators};
