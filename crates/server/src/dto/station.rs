use kereta::{repository::Station, shared::Coordinate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationDto {
    pub id: String,
    pub code: String,
    pub name: String,
    pub coordinate: Coordinate,
}

impl StationDto {
    pub fn from(station: &Station) -> Self {
        Self {
            id: station.id.to_string(),
            code: station.code.to_string(),
            name: station.name.to_string(),
            coordinate: station.coordinate,
        }
    }
}
