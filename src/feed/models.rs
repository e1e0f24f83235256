use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FeedStation {
    pub station_id: String,
    pub station_code: String,
    pub station_name: String,
    pub station_lat: f64,
    pub station_lon: f64,
}

/// One vertex of a route polyline.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FeedRoutePoint {
    pub route_id: String,
    pub point_sequence: u32,
    pub point_lat: f64,
    pub point_lon: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FeedTrain {
    pub train_id: String,
    pub train_code: String,
    pub train_name: String,
}

/// One leg of a train. Times are local `HH:MM[:SS]` wall-clock times in the
/// feed's reference timezone.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FeedStep {
    pub train_id: String,
    pub step_sequence: u32,
    pub start_time: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub origin_code: String,
    pub destination_code: String,
    pub route_id: Option<String>,
    pub reversed: Option<String>,
}
