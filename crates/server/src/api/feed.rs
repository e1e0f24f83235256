use std::{sync::Arc, time::Instant};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use crate::state::{AppState, load_tracker};

/// Re-reads the feed and swaps the snapshot in one step.
pub async fn reload(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    info!("Reloading feed...");
    let now = Instant::now();
    let feed_path = state.feed_path.clone();
    let clock = state.clock;
    let tracker = tokio::task::spawn_blocking(move || load_tracker(&feed_path, clock))
        .await
        .map_err(|err| {
            error!("Reload task failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|err| {
            error!("Failed to reload feed: {err}");
            StatusCode::UNPROCESSABLE_ENTITY
        })?;
    *state.tracker.write().await = tracker;
    info!("Reloading feed took {:?}", now.elapsed());
    Ok(StatusCode::NO_CONTENT.into_response())
}
