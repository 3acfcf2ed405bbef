use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::model::{Campaign, CampaignChanged, CampaignStatus};
use crate::mediator::{Context, Request, RequestHandler};
use crate::outcome::{fail, DomainError, Outcome};
use crate::store::Store;

/// Make an inactive campaign active. Activating twice is a conflict.
#[derive(Debug, Clone, Copy)]
pub struct ActivateCampaign {
    pub id: Uuid,
}

impl ActivateCampaign {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

impl Request for ActivateCampaign {
    type Response = Outcome<Campaign>;
}

pub struct ActivateCampaignHandler {
    store: Arc<dyn Store<Campaign>>,
}

impl ActivateCampaignHandler {
    pub fn new(store: Arc<dyn Store<Campaign>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<ActivateCampaign> for ActivateCampaignHandler {
    async fn handle(&self, request: ActivateCampaign, ctx: &Context) -> Outcome<Campaign> {
        let Some(mut campaign) = self.store.get(request.id).await? else {
            return fail(DomainError::NotFound(format!(
                "campaign {} not found",
                request.id
            )));
        };
        if campaign.is_active() {
            return fail(DomainError::Conflict(format!(
                "campaign {} is already active",
                campaign.id
            )));
        }

        campaign.status = CampaignStatus::Active;
        campaign.updated_at = Utc::now();
        self.store.update(campaign.id, &campaign).await?;

        tracing::info!(campaign_id = %campaign.id, "campaign activated");
        ctx.publish(CampaignChanged::new(campaign.id));

        Ok(campaign)
    }
}
