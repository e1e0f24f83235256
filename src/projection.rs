//! Live position of trains running against a recurring daily schedule.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    geometry::Route,
    repository::{Repository, Resolution, ScheduleStep, Station, Train},
    shared::{
        geo::{Coordinate, Distance, Speed},
        time::{DAY, Duration, positive_modulo},
        window::NormalizedWindow,
    },
};

/// Where a train is at one instant. Computed fresh for every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedTrainState {
    pub train_id: Arc<str>,
    pub code: Arc<str>,
    pub name: Arc<str>,
    pub position: Coordinate,
    pub moving: bool,
    /// Degrees clockwise from north.
    pub bearing: Option<f64>,
    pub route_id: Option<Arc<str>>,
    pub speed: Option<Speed>,
    /// Station code the current leg starts from.
    pub from_station: Option<Arc<str>>,
    /// Station code the current leg ends at.
    pub to_station: Option<Arc<str>>,
    pub segment_departure: DateTime<Utc>,
    pub segment_arrival: DateTime<Utc>,
    pub progress: Option<f64>,
    pub journey_departure: DateTime<Utc>,
    pub journey_arrival: DateTime<Utc>,
}

impl ProjectedTrainState {
    /// Station the journey is "at" for timeline purposes: the leg's origin
    /// while moving, the station the train is standing at otherwise.
    pub fn active_station(&self) -> Option<&Arc<str>> {
        if self.moving {
            self.from_station.as_ref()
        } else {
            self.to_station.as_ref()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectionConfig {
    /// Arc length between the two samples a heading is estimated from.
    pub heading_lookahead: Distance,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            heading_lookahead: Distance::from_meters(50.0),
        }
    }
}

/// Absolute instants of the leg currently in progress.
#[derive(Debug, Clone, Copy)]
struct SegmentAnchors {
    start: DateTime<Utc>,
    arrival: DateTime<Utc>,
    journey_departure: DateTime<Utc>,
    journey_arrival: DateTime<Utc>,
}

/// Position, heading and speed of a train on a leg.
#[derive(Debug, Clone, Copy)]
struct Placement {
    position: Coordinate,
    moving: bool,
    bearing: Option<f64>,
    speed: Option<Speed>,
    progress: f64,
    on_route: bool,
}

pub struct Projector<'a> {
    repository: &'a Repository,
    config: ProjectionConfig,
}

impl<'a> Projector<'a> {
    pub fn new(repository: &'a Repository) -> Self {
        Self {
            repository,
            config: ProjectionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ProjectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Projects every train, keeping the ones running at `now`, ordered by
    /// train code.
    pub fn project_all(&self, now: DateTime<Utc>) -> Vec<ProjectedTrainState> {
        let mut states: Vec<_> = self
            .repository
            .trains
            .par_iter()
            .filter_map(|train| self.project(now, train))
            .collect();
        states.par_sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.train_id.cmp(&b.train_id)));
        states
    }

    /// Where `train` is at `now`. `None` when it is not running or when
    /// the stations it runs between cannot be resolved.
    pub fn project(&self, now: DateTime<Utc>, train: &Train) -> Option<ProjectedTrainState> {
        let now_ms = now.timestamp_millis();
        let journey = train.journey_window()?.normalize(now_ms);
        let time_ms = journey_time(now_ms, &train.service_window()?.normalize(now_ms))?;

        let step = train
            .steps
            .iter()
            .find(|step| step.window().contains(time_ms))?;
        trace!(
            "Train {} is on leg {} -> {}",
            train.code, step.origin_code, step.destination_code
        );

        let anchors = anchor(now, time_ms, &journey, step);
        let origin = self.repository.resolve_station(&step.origin_code);
        let destination = self.repository.resolve_station(&step.destination_code);
        let placement = if step.dwell_window().contains(time_ms) {
            stopped(origin, destination)
        } else {
            let travel = step.travel_window().normalize(time_ms);
            match self.route_for(step) {
                Some(route) => Some(self.on_route(route, step, &travel)),
                None => straight_line(origin, destination, &travel),
            }
        };
        let Some(placement) = placement else {
            debug!(
                "Train {} skipped, stations {} and {} do not resolve",
                train.code, step.origin_code, step.destination_code
            );
            return None;
        };

        Some(ProjectedTrainState {
            train_id: train.id.clone(),
            code: train.code.clone(),
            name: train.name.clone(),
            position: placement.position,
            moving: placement.moving,
            bearing: placement.bearing,
            route_id: if placement.on_route {
                step.route_id.clone()
            } else {
                None
            },
            speed: placement.speed,
            from_station: Some(step.origin_code.clone()),
            to_station: Some(step.destination_code.clone()),
            segment_departure: anchors.start,
            segment_arrival: anchors.arrival,
            progress: Some(placement.progress),
            journey_departure: anchors.journey_departure,
            journey_arrival: anchors.journey_arrival,
        })
    }

    fn route_for(&self, step: &ScheduleStep) -> Option<&'a Route> {
        let id = step.route_id.as_ref()?;
        let route = self.repository.route_by_id(id);
        if route.is_none() {
            debug!("Route {id} does not resolve, using straight line");
        }
        route
    }

    fn on_route(
        &self,
        route: &Route,
        step: &ScheduleStep,
        travel: &NormalizedWindow,
    ) -> Placement {
        let progress = travel.progress();
        let forward = route.length() * progress;
        let along = if step.reversed {
            route.length() - forward
        } else {
            forward
        };
        trace!("Following route {} at {:.0}m", route.id, along.as_meters());
        Placement {
            position: route.coordinate_at(along),
            moving: true,
            bearing: route.heading_at(along, self.config.heading_lookahead, step.reversed),
            speed: Speed::over(route.length(), Duration::from_millis(travel.length())),
            progress,
            on_route: true,
        }
    }
}

/// Position of `now` on the journey's cycle, or `None` when the train is
/// not in service.
///
/// The normalized time is only one representative of `now` modulo the
/// cycle. When a journey runs over midnight its cycle spans several days and
/// that representative can land on the wrong day, so the time of day is tried
/// on every day of the cycle and the first one inside `service` wins.
fn journey_time(now_ms: i64, service: &NormalizedWindow) -> Option<i64> {
    let day = DAY.as_millis();
    let mut candidate = positive_modulo(now_ms, day);
    while candidate < service.cycle {
        if service.start <= candidate && candidate <= service.end {
            return Some(candidate);
        }
        candidate += day;
    }
    None
}

/// Places the leg on absolute time. Each instant is moved a day forward
/// while it would precede the one before it, keeping order over midnight.
fn anchor(
    now: DateTime<Utc>,
    time_ms: i64,
    journey: &NormalizedWindow,
    step: &ScheduleStep,
) -> SegmentAnchors {
    let base = now - TimeDelta::milliseconds(time_ms);
    let at = |millis: i64| base + TimeDelta::milliseconds(millis);
    let not_before = |millis: i64, previous: DateTime<Utc>| {
        let mut instant = at(millis);
        while instant < previous {
            instant += TimeDelta::from(DAY);
        }
        instant
    };

    let journey_departure = at(journey.start);
    let start = not_before(step.start.as_millis(), journey_departure);
    let arrival = not_before(step.arrival.as_millis(), start);
    let journey_arrival = not_before(journey.end, journey_departure).max(arrival);
    SegmentAnchors {
        start,
        arrival,
        journey_departure,
        journey_arrival,
    }
}

fn stopped(origin: Resolution<'_, Station>, destination: Resolution<'_, Station>) -> Option<Placement> {
    let position = match (&origin, &destination) {
        (_, Resolution::Primary(station) | Resolution::Secondary(station)) => station.coordinate,
        (Resolution::Primary(station) | Resolution::Secondary(station), Resolution::Missing) => {
            station.coordinate
        }
        (Resolution::Missing, Resolution::Missing) => return None,
    };
    let bearing = match (origin.found(), destination.found()) {
        (Some(from), Some(to)) => from.coordinate.bearing_to(&to.coordinate),
        _ => None,
    };
    Some(Placement {
        position,
        moving: false,
        bearing,
        speed: None,
        progress: 0.0,
        on_route: false,
    })
}

fn straight_line(
    origin: Resolution<'_, Station>,
    destination: Resolution<'_, Station>,
    travel: &NormalizedWindow,
) -> Option<Placement> {
    let (Some(from), Some(to)) = (origin.found(), destination.found()) else {
        return None;
    };
    let progress = travel.progress();
    trace!("Interpolating {} -> {} at {:.3}", from.code, to.code, progress);
    Some(Placement {
        position: from.coordinate.interpolate(&to.coordinate, progress),
        moving: true,
        bearing: from.coordinate.bearing_to(&to.coordinate),
        speed: Speed::over(
            from.coordinate.distance(&to.coordinate),
            Duration::from_millis(travel.length()),
        ),
        progress,
        on_route: false,
    })
}
