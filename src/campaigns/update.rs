use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::model::{Campaign, CampaignChanged, CampaignInput};
use crate::mediator::{Context, Request, RequestHandler};
use crate::outcome::{fail, DomainError, Outcome};
use crate::store::Store;

/// Replace the editable fields of an existing campaign.
#[derive(Debug, Clone)]
pub struct UpdateCampaign {
    pub id: Uuid,
    pub input: CampaignInput,
}

impl UpdateCampaign {
    pub fn new(id: Uuid, input: CampaignInput) -> Self {
        Self { id, input }
    }
}

impl Request for UpdateCampaign {
    type Response = Outcome<Campaign>;
}

pub struct UpdateCampaignHandler {
    store: Arc<dyn Store<Campaign>>,
}

impl UpdateCampaignHandler {
    pub fn new(store: Arc<dyn Store<Campaign>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<UpdateCampaign> for UpdateCampaignHandler {
    async fn handle(&self, request: UpdateCampaign, ctx: &Context) -> Outcome<Campaign> {
        let Some(mut campaign) = self.store.get(request.id).await? else {
            return fail(DomainError::NotFound(format!(
                "campaign {} not found",
                request.id
            )));
        };

        campaign.apply(request.input, Utc::now());
        self.store.update(campaign.id, &campaign).await?;

        tracing::info!(campaign_id = %campaign.id, "campaign updated");
        ctx.publish(CampaignChanged::new(campaign.id));

        Ok(campaign)
    }
}
