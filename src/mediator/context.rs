//! Context passed to behaviors and handlers.
//!
//! Carries the per-dispatch cancellation token, a dispatch id for log
//! correlation, and the notifications hub so handlers can publish events
//! without holding a reference of their own.

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::bus::{Notification, Notifications};

/// The context for one dispatch. Lives exactly as long as the dispatch.
///
/// ## Example
///
/// ```ignore
/// async fn handle(&self, request: CreateCampaign, ctx: &Context) -> Outcome<CampaignCreated> {
///     let campaign = Campaign::create(Uuid::new_v4(), request.input, Utc::now());
///     self.store.create(campaign.id, &campaign).await?;
///     ctx.publish(CampaignChanged::new(campaign.id));
///     Ok(CampaignCreated { id: campaign.id })
/// }
/// ```
#[derive(Clone)]
pub struct Context {
    request_name: &'static str,
    dispatch_id: Uuid,
    cancellation: CancellationToken,
    notifications: Notifications,
}

impl Context {
    pub(crate) fn new(
        request_name: &'static str,
        cancellation: CancellationToken,
        notifications: Notifications,
    ) -> Self {
        Self {
            request_name,
            dispatch_id: Uuid::new_v4(),
            cancellation,
            notifications,
        }
    }

    /// Name of the request type being dispatched.
    pub fn request_name(&self) -> &'static str {
        self.request_name
    }

    /// Unique id of this dispatch, attached to every log line it produces.
    pub fn dispatch_id(&self) -> Uuid {
        self.dispatch_id
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Publish an event to every current subscriber of its type.
    ///
    /// Returns the number of subscribers it reached. Zero is not an error.
    pub fn publish<E: Notification>(&self, event: E) -> usize {
        self.notifications.publish(event)
    }
}
