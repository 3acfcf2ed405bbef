use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Campaign;
use crate::mediator::{Context, Request, RequestHandler};
use crate::outcome::{DomainError, Failure, Outcome};
use crate::store::Store;

#[derive(Debug, Clone, Copy)]
pub struct GetCampaign {
    pub id: Uuid,
}

impl GetCampaign {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

impl Request for GetCampaign {
    type Response = Outcome<Campaign>;
}

pub struct GetCampaignHandler {
    store: Arc<dyn Store<Campaign>>,
}

impl GetCampaignHandler {
    pub fn new(store: Arc<dyn Store<Campaign>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<GetCampaign> for GetCampaignHandler {
    async fn handle(&self, request: GetCampaign, _ctx: &Context) -> Outcome<Campaign> {
        self.store.get(request.id).await?.ok_or_else(|| {
            Failure::new(DomainError::NotFound(format!(
                "campaign {} not found",
                request.id
            )))
        })
    }
}
