use std::{collections::HashMap, sync::Arc};

mod models;
pub(crate) mod source;
pub use models::*;

use thiserror::Error;

use crate::{geometry::Route, projection::Projector};

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Station id {0} is used more than once")]
    DuplicateStation(String),
    #[error("Route id {0} is used more than once")]
    DuplicateRoute(String),
    #[error("Train id {0} is used more than once")]
    DuplicateTrain(String),
    #[error("Train {0} has no schedule steps")]
    EmptyTrain(String),
}

type IdToIndex = HashMap<Arc<str>, u32>;

/// An owned snapshot of stations, routes and trains.
///
/// Callers swap in a whole new repository when data is refreshed, so every
/// computation runs against one consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub stations: Box<[Station]>,
    pub routes: Box<[Route]>,
    pub trains: Box<[Train]>,

    station_id_lookup: IdToIndex,
    station_code_lookup: IdToIndex,
    route_lookup: IdToIndex,
    train_lookup: IdToIndex,
}

impl Repository {
    pub fn new() -> Self {
        Default::default()
    }

    /// Builds lookups and checks the snapshot for duplicate ids and trains
    /// without any steps.
    pub fn from_parts(
        stations: Vec<Station>,
        routes: Vec<Route>,
        trains: Vec<Train>,
    ) -> Result<Self, self::Error> {
        let mut station_id_lookup = IdToIndex::new();
        let mut station_code_lookup = IdToIndex::new();
        for (i, station) in stations.iter().enumerate() {
            if station_id_lookup
                .insert(station.id.clone(), i as u32)
                .is_some()
            {
                return Err(self::Error::DuplicateStation(station.id.to_string()));
            }
            // Codes are a secondary key, first one wins
            station_code_lookup
                .entry(station.code.clone())
                .or_insert(i as u32);
        }

        let mut route_lookup = IdToIndex::new();
        for (i, route) in routes.iter().enumerate() {
            if route_lookup.insert(route.id.clone(), i as u32).is_some() {
                return Err(self::Error::DuplicateRoute(route.id.to_string()));
            }
        }

        let mut train_lookup = IdToIndex::new();
        for (i, train) in trains.iter().enumerate() {
            if train.steps.is_empty() {
                return Err(self::Error::EmptyTrain(train.id.to_string()));
            }
            if train_lookup.insert(train.id.clone(), i as u32).is_some() {
                return Err(self::Error::DuplicateTrain(train.id.to_string()));
            }
        }

        Ok(Self {
            stations: stations.into(),
            routes: routes.into(),
            trains: trains.into(),
            station_id_lookup,
            station_code_lookup,
            route_lookup,
            train_lookup,
        })
    }

    pub fn station_by_id(&self, id: &str) -> Option<&Station> {
        let index = self.station_id_lookup.get(id)?;
        Some(&self.stations[*index as usize])
    }

    pub fn station_by_code(&self, code: &str) -> Option<&Station> {
        let index = self.station_code_lookup.get(code)?;
        Some(&self.stations[*index as usize])
    }

    /// Looks a station up by id first and by code second.
    pub fn resolve_station(&self, key: &str) -> Resolution<'_, Station> {
        if let Some(station) = self.station_by_id(key) {
            Resolution::Primary(station)
        } else if let Some(station) = self.station_by_code(key) {
            Resolution::Secondary(station)
        } else {
            Resolution::Missing
        }
    }

    /// The id of the station `key` resolves to, or `key` itself when it
    /// does not resolve.
    pub fn station_key(&self, key: &Arc<str>) -> Arc<str> {
        match self.resolve_station(key) {
            Resolution::Primary(station) | Resolution::Secondary(station) => station.id.clone(),
            Resolution::Missing => key.clone(),
        }
    }

    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        let index = self.route_lookup.get(id)?;
        Some(&self.routes[*index as usize])
    }

    pub fn train_by_id(&self, id: &str) -> Option<&Train> {
        let index = self.train_lookup.get(id)?;
        Some(&self.trains[*index as usize])
    }

    pub fn projector(&'_ self) -> Projector<'_> {
        Projector::new(self)
    }
}
