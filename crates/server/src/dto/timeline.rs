use chrono::{DateTime, Utc};
use kereta::{
    repository::Repository,
    timeline::{StopState, TimelineStop},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TimelineStopDto {
    pub station_id: String,
    /// Missing when the station is not in the directory.
    pub station_name: Option<String>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub departure_time: Option<DateTime<Utc>>,
    pub state: StopState,
    pub is_actual_stop: bool,
    pub progress_to_next: Option<f64>,
}

impl TimelineStopDto {
    pub fn from(stop: &TimelineStop, repository: &Repository) -> Self {
        let station_name = repository
            .resolve_station(&stop.station_id)
            .found()
            .map(|station| station.name.to_string());
        Self {
            station_id: stop.station_id.to_string(),
            station_name,
            arrival_time: stop.arrival_time,
            departure_time: stop.departure_time,
            state: stop.state,
            is_actual_stop: stop.is_actual_stop,
            progress_to_next: stop.progress_to_next,
        }
    }
}
