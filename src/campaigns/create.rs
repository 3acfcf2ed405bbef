use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{Campaign, CampaignChanged, CampaignInput};
use crate::mediator::{Context, Request, RequestHandler};
use crate::outcome::Outcome;
use crate::store::Store;

/// Create a new, inactive campaign.
#[derive(Debug, Clone)]
pub struct CreateCampaign {
    pub input: CampaignInput,
}

impl CreateCampaign {
    pub fn new(input: CampaignInput) -> Self {
        Self { input }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignCreated {
    pub id: Uuid,
}

impl Request for CreateCampaign {
    type Response = Outcome<CampaignCreated>;
}

pub struct CreateCampaignHandler {
    store: Arc<dyn Store<Campaign>>,
}

impl CreateCampaignHandler {
    pub fn new(store: Arc<dyn Store<Campaign>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<CreateCampaign> for CreateCampaignHandler {
    async fn handle(&self, request: CreateCampaign, ctx: &Context) -> Outcome<CampaignCreated> {
        let campaign = Campaign::create(Uuid::new_v4(), request.input, Utc::now());
        self.store.create(campaign.id, &campaign).await?;

        tracing::info!(campaign_id = %campaign.id, "campaign created");
        ctx.publish(CampaignChanged::new(campaign.id));

        Ok(CampaignCreated { id: campaign.id })
    }
}
