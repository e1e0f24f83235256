use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{dto::StationDto, state::AppState};

pub async fn station(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let tracker = state.tracker.read().await;
    let station = tracker
        .repository()
        .resolve_station(&key)
        .found()
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(StationDto::from(station)).into_response())
}
