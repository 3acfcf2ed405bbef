pub mod bus;
pub mod campaigns;
pub mod config;
pub mod mediator;
pub mod outcome;
pub mod store;
pub mod telemetry;
pub mod transport;

pub use bus::{Notification, NotificationBus, Notifications, Subscription};
pub use mediator::{
    Behavior, ConfigError, Context, DispatchError, LoggingBehavior, Mediator, MediatorBuilder,
    Request, RequestHandler, Response, ValidationBehavior, Validator, Validators,
};
pub use outcome::{fail, DomainError, ErrorKind, Failure, Outcome, ValidationErrors, ValidationFailure};
pub use store::{InMemoryStore, JsonFileStore, Store, StoreError};
pub use transport::{MapperConfig, ResultMapper, WireResponse};

// Token type accepted by `Mediator::send_with`
pub use tokio_util::sync::CancellationToken;
