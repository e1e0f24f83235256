use crate::{
    clock::RecurringClock,
    feed::{self, FeedReader, FeedStep},
    geometry::Route,
    repository::{Repository, ScheduleStep, Station, Train},
    shared::{geo::Coordinate, time::Time},
};
use rayon::prelude::*;
use std::{collections::HashMap, sync::Arc, time::Instant};
use tracing::debug;

impl Repository {
    /// Reads a whole feed into a validated snapshot.
    ///
    /// Local feed times are turned into recurring times with `clock`, which
    /// should be the same clock later used to place schedules on dates.
    pub fn load_feed(feed: FeedReader, clock: &RecurringClock) -> Result<Self, feed::Error> {
        let stations = load_stations(&feed)?;
        let routes = load_routes(&feed)?;
        let trains = load_trains(&feed, clock)?;
        let repository = Repository::from_parts(stations, routes, trains)?;
        debug!(
            "Loaded {} stations, {} routes and {} trains",
            repository.stations.len(),
            repository.routes.len(),
            repository.trains.len()
        );
        Ok(repository)
    }
}

fn load_stations(feed: &FeedReader) -> Result<Vec<Station>, feed::Error> {
    debug!("Loading stations...");
    let now = Instant::now();
    let mut stations: Vec<Station> = Vec::new();
    feed.stream_stations(|(_, station)| {
        stations.push(Station {
            id: station.station_id.into(),
            code: station.station_code.into(),
            name: station.station_name.into(),
            coordinate: Coordinate::new(station.station_lat, station.station_lon),
        });
    })?;
    debug!("Loading stations took {:?}", now.elapsed());
    Ok(stations)
}

fn load_routes(feed: &FeedReader) -> Result<Vec<Route>, feed::Error> {
    debug!("Loading routes...");
    let now = Instant::now();
    let mut points: HashMap<Arc<str>, Vec<(u32, Coordinate)>> = HashMap::new();
    let mut order: Vec<Arc<str>> = Vec::new();
    feed.stream_route_points(|(_, point)| {
        let coordinate = Coordinate::new(point.point_lat, point.point_lon);
        if let Some(existing) = points.get_mut(point.route_id.as_str()) {
            existing.push((point.point_sequence, coordinate));
        } else {
            let id: Arc<str> = point.route_id.into();
            order.push(id.clone());
            points.insert(id, vec![(point.point_sequence, coordinate)]);
        }
    })?;

    let routes = order
        .into_iter()
        .map(|id| {
            let mut polyline = points.remove(&id).unwrap_or_default();
            polyline.par_sort_by_key(|(sequence, _)| *sequence);
            Route::new(id, polyline.into_iter().map(|(_, point)| point).collect())
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Loading routes took {:?}", now.elapsed());
    Ok(routes)
}

fn load_trains(feed: &FeedReader, clock: &RecurringClock) -> Result<Vec<Train>, feed::Error> {
    debug!("Loading trains...");
    let now = Instant::now();
    let mut trains: Vec<Train> = Vec::new();
    let mut train_lookup: HashMap<Arc<str>, usize> = HashMap::new();
    feed.stream_trains(|(i, train)| {
        let value = Train {
            id: train.train_id.into(),
            code: train.train_code.into(),
            name: train.train_name.into(),
            steps: Box::default(),
        };
        train_lookup.insert(value.id.clone(), i);
        trains.push(value);
    })?;
    debug!("Loading trains took {:?}", now.elapsed());

    debug!("Loading steps...");
    let now = Instant::now();
    let mut raw_steps: Vec<FeedStep> = Vec::new();
    feed.stream_steps(|(_, step)| raw_steps.push(step))?;

    let mut steps: Vec<Vec<(u32, ScheduleStep)>> = vec![Vec::new(); trains.len()];
    for step in raw_steps {
        let index = *train_lookup
            .get(step.train_id.as_str())
            .ok_or_else(|| feed::Error::UnknownTrain(step.train_id.clone()))?;
        steps[index].push((step.step_sequence, to_schedule_step(step, clock)?));
    }
    trains
        .par_iter_mut()
        .zip(steps.into_par_iter())
        .for_each(|(train, mut steps)| {
            steps.sort_by_key(|(sequence, _)| *sequence);
            train.steps = steps.into_iter().map(|(_, step)| step).collect();
        });
    debug!("Loading steps took {:?}", now.elapsed());
    Ok(trains)
}

fn to_schedule_step(step: FeedStep, clock: &RecurringClock) -> Result<ScheduleStep, feed::Error> {
    let time = |value: &str| {
        Time::from_hms(value)
            .map(|local| clock.recurring_from_local(local))
            .ok_or_else(|| feed::Error::InvalidTime {
                train_id: step.train_id.clone(),
                value: value.to_string(),
            })
    };
    let start = time(&step.start_time)?;
    let arrival = time(&step.arrival_time)?;
    let departure = time(&step.departure_time)?;
    let reversed = match step.reversed.as_deref().map(str::trim) {
        None | Some("") | Some("0") | Some("false") => false,
        Some("1") | Some("true") => true,
        Some(other) => {
            return Err(feed::Error::InvalidFlag {
                train_id: step.train_id.clone(),
                value: other.to_string(),
            });
        }
    };
    let route_id = step
        .route_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(Arc::from);

    Ok(ScheduleStep {
        start,
        arrival,
        departure,
        origin_code: step.origin_code.as_str().into(),
        destination_code: step.destination_code.as_str().into(),
        route_id,
        reversed,
    })
}
