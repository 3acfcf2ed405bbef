//! HTTP transport: axum routes over the campaign mediator.
//!
//! Requires the `http` feature.
//!
//! ## Routes
//!
//! - `GET /ping`: liveness, returns `pong`.
//! - `POST /campaigns`: create a campaign from a JSON [`CampaignInput`].
//! - `GET /campaigns/:id`: read a campaign.
//! - `PUT /campaigns/:id`: replace a campaign's editable fields.
//! - `POST /campaigns/:id/activate`: activate a campaign.
//! - `GET /campaigns/changes`: `text/event-stream` of changed campaign ids.
//!
//! Every outcome goes through the [`ResultMapper`], so failures come back as
//! `application/problem+json`.
//!
//! ## Example
//!
//! ```ignore
//! let state = AppState::new(Arc::new(mediator), ResultMapper::default());
//! transport::http::serve(state, "127.0.0.1:5000".parse()?, shutdown).await?;
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{ResultMapper, WireResponse};
use crate::bus::stream::{self, ChannelSink};
use crate::campaigns::{
    ActivateCampaign, CampaignChanged, CampaignInput, CreateCampaign, GetCampaign, UpdateCampaign,
};
use crate::mediator::{Chain, DispatchResult, Mediator};
use crate::outcome::Outcome;

/// Frames buffered per stream before the observer waits on the client.
const STREAM_BUFFER: usize = 16;

pub const EVENT_STREAM: &str = "text/event-stream";

/// Shared state for the HTTP routes.
pub struct AppState<C> {
    mediator: Arc<Mediator<C>>,
    mapper: Arc<ResultMapper>,
    shutdown: CancellationToken,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            mediator: Arc::clone(&self.mediator),
            mapper: Arc::clone(&self.mapper),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<C: Chain> AppState<C> {
    pub fn new(mediator: Arc<Mediator<C>>, mapper: ResultMapper) -> Self {
        Self {
            mediator,
            mapper: Arc::new(mapper),
            shutdown: CancellationToken::new(),
        }
    }

    /// Use `shutdown` to end open event streams when the server stops.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn mediator(&self) -> &Mediator<C> {
        &self.mediator
    }

    fn respond<T: Serialize>(
        &self,
        result: DispatchResult<Outcome<T>>,
        instance: &Uri,
    ) -> WireResponse {
        match result {
            Ok(outcome) => self.mapper.map(&outcome, instance.path()),
            Err(err) => self.mapper.map_dispatch_error(&err, instance.path()),
        }
    }
}

impl IntoResponse for WireResponse {
    fn into_response(self) -> Response {
        let (status, content_type, body) = self.into_parts();
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(CONTENT_TYPE, content_type)], Json(body)).into_response()
    }
}

/// Build an axum `Router` over the given state.
pub fn router<C: Chain>(state: AppState<C>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/campaigns", post(create_campaign::<C>))
        .route("/campaigns/changes", get(campaign_changes::<C>))
        .route(
            "/campaigns/:id",
            get(get_campaign::<C>).put(update_campaign::<C>),
        )
        .route("/campaigns/:id/activate", post(activate_campaign::<C>))
        .with_state(state)
}

/// Serve on `addr` until `shutdown` fires. Open event streams are closed
/// on shutdown.
pub async fn serve<C: Chain>(
    state: AppState<C>,
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    let app = router(state.with_shutdown(shutdown.clone()));
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

async fn ping() -> &'static str {
    "pong"
}

async fn create_campaign<C: Chain>(
    State(state): State<AppState<C>>,
    uri: Uri,
    Json(input): Json<CampaignInput>,
) -> WireResponse {
    let result = state.mediator.send(CreateCampaign::new(input)).await;
    state.respond(result, &uri)
}

async fn get_campaign<C: Chain>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    uri: Uri,
) -> WireResponse {
    let result = state.mediator.send(GetCampaign::new(id)).await;
    state.respond(result, &uri)
}

async fn update_campaign<C: Chain>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    uri: Uri,
    Json(input): Json<CampaignInput>,
) -> WireResponse {
    let result = state.mediator.send(UpdateCampaign::new(id, input)).await;
    state.respond(result, &uri)
}

async fn activate_campaign<C: Chain>(
    State(state): State<AppState<C>>,
    Path(id): Path<Uuid>,
    uri: Uri,
) -> WireResponse {
    let result = state.mediator.send(ActivateCampaign::new(id)).await;
    state.respond(result, &uri)
}

/// `GET /campaigns/changes`: one `data:` frame per [`CampaignChanged`].
///
/// The observer runs on its own task and stops when the client goes away
/// or the server shuts down.
async fn campaign_changes<C: Chain>(State(state): State<AppState<C>>) -> Response {
    let (tx, rx) = mpsc::channel::<Bytes>(STREAM_BUFFER);
    let cancellation = state.shutdown.child_token();

    // A dropped response body closes the channel; turn that into cancellation
    // so an idle stream does not wait for the next event to notice.
    let watched = tx.clone();
    let watcher = cancellation.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = watched.closed() => watcher.cancel(),
            _ = watcher.cancelled() => {}
        }
    });

    let hub = state.mediator.notifications().clone();
    tokio::spawn(async move {
        let mut sink = ChannelSink::new(tx);
        match stream::observe::<CampaignChanged, _>(&hub, &mut sink, cancellation.clone()).await {
            Ok(stats) => tracing::info!(frames = stats.frames, "change stream ended"),
            Err(err) => tracing::warn!(error = %err, "change stream failed"),
        }
        cancellation.cancel();
    });

    let body = Body::from_stream(ReceiverStream::new(rx).map(Ok::<_, Infallible>));
    (
        [(CONTENT_TYPE, EVENT_STREAM), (CACHE_CONTROL, "no-cache")],
        body,
    )
        .into_response()
}
