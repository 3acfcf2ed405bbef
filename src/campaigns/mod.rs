//! Campaign registration domain.
//!
//! Requests, handlers and validators for creating, updating, activating and
//! reading campaigns. Every mutating handler publishes one
//! [`CampaignChanged`] after the store accepted the change.
//!
//! ## Example
//!
//! ```ignore
//! let store: Arc<dyn Store<Campaign>> = Arc::new(InMemoryStore::new());
//! let mediator = campaigns::mediator(store, Notifications::new())?;
//!
//! let created = mediator.send(CreateCampaign::new(input)).await??;
//! ```

mod activate;
mod create;
mod get;
mod model;
mod update;
pub mod validators;

use std::sync::Arc;

pub use activate::{ActivateCampaign, ActivateCampaignHandler};
pub use create::{CampaignCreated, CreateCampaign, CreateCampaignHandler};
pub use get::{GetCampaign, GetCampaignHandler};
pub use model::{
    Campaign, CampaignChanged, CampaignDate, CampaignDateStatus, CampaignInput, CampaignStatus,
    DateInput, DepartmentAssignment, DepartmentAssignmentInput,
};
pub use update::{UpdateCampaign, UpdateCampaignHandler};
pub use validators::{CampaignFieldsValidator, CampaignScheduleValidator};

use crate::bus::Notifications;
use crate::mediator::{
    Chain, ConfigError, LoggingBehavior, Mediator, MediatorBuilder, ValidationBehavior, Validators,
};
use crate::store::Store;

/// The mediator the registration API runs: logging outermost, then validation.
pub type CampaignMediator = Mediator<(LoggingBehavior, (ValidationBehavior, ()))>;

/// Validators for every campaign request.
pub fn validators() -> Validators {
    Validators::new()
        .with::<CreateCampaign, _>(CampaignFieldsValidator)
        .with::<CreateCampaign, _>(CampaignScheduleValidator)
        .with::<UpdateCampaign, _>(CampaignFieldsValidator)
        .with::<UpdateCampaign, _>(CampaignScheduleValidator)
}

/// Register the campaign handlers on `builder` and require each of them.
pub fn register<C: Chain>(
    builder: MediatorBuilder<C>,
    store: Arc<dyn Store<Campaign>>,
) -> MediatorBuilder<C> {
    builder
        .handler::<CreateCampaign, _>(CreateCampaignHandler::new(store.clone()))
        .handler::<UpdateCampaign, _>(UpdateCampaignHandler::new(store.clone()))
        .handler::<ActivateCampaign, _>(ActivateCampaignHandler::new(store.clone()))
        .handler::<GetCampaign, _>(GetCampaignHandler::new(store))
        .require::<CreateCampaign>()
        .require::<UpdateCampaign>()
        .require::<ActivateCampaign>()
        .require::<GetCampaign>()
}

/// Build the standard campaign mediator over `store`.
pub fn mediator(
    store: Arc<dyn Store<Campaign>>,
    notifications: Notifications,
) -> Result<CampaignMediator, ConfigError> {
    let builder = Mediator::builder()
        .notifications(notifications)
        .behavior(LoggingBehavior)
        .validation(validators());
    register(builder, store).build()
}
