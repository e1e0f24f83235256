use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use kereta::tracker::Error as TrackerError;

use crate::{dto::TimelineStopDto, state::AppState};

pub async fn live(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let tracker = state.tracker.read().await;
    let states = tracker.project_all(Utc::now());
    Ok(Json(states).into_response())
}

pub async fn train_live(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let tracker = state.tracker.read().await;
    if tracker.repository().train_by_id(&id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    match tracker.project(&id, Utc::now()) {
        Some(projected) => Ok(Json(projected).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn timeline(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let now = Utc::now();
    let date = match params.get("date") {
        Some(value) => {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| StatusCode::BAD_REQUEST)?
        }
        None => state.clock.local_date(now),
    };
    let destination = params.get("destination").map(String::as_str);

    let tracker = state.tracker.read().await;
    let stops = tracker
        .timeline(&id, now, date, destination)
        .map_err(|err| match err {
            TrackerError::UnknownTrain(_) => StatusCode::NOT_FOUND,
            TrackerError::DateOutOfRange(_) => StatusCode::BAD_REQUEST,
        })?;
    let result: Vec<_> = stops
        .iter()
        .map(|stop| TimelineStopDto::from(stop, tracker.repository()))
        .collect();
    Ok(Json(result).into_response())
}
