//! Campaign registration API.
//!
//! Settings come from `MEDIATOR_*` environment variables (see
//! `mediator_rust::config`). Campaigns are stored as JSON files under
//! `MEDIATOR_DATA_FOLDER`.

use std::sync::Arc;

use mediator_rust::bus::Notifications;
use mediator_rust::campaigns::{self, Campaign};
use mediator_rust::config::Settings;
use mediator_rust::store::{JsonFileStore, Store};
use mediator_rust::transport::http::{self, AppState};
use mediator_rust::transport::ResultMapper;
use mediator_rust::{telemetry, CancellationToken};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    telemetry::init(&settings.log_filter);

    let store: Arc<dyn Store<Campaign>> = Arc::new(JsonFileStore::open(&settings.data_folder).await?);
    let mediator = campaigns::mediator(store, Notifications::new())?;
    tracing::info!(requests = ?mediator.requests(), data_folder = %settings.data_folder.display(), "mediator ready");

    let state = AppState::new(Arc::new(mediator), ResultMapper::new(settings.mapper_config()));

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutting down");
        }
        signal.cancel();
    });

    http::serve(state, settings.bind_addr, shutdown).await?;
    Ok(())
}
