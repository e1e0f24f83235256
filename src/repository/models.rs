use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::shared::{geo::Coordinate, time::Time, window::TimeWindow};

/// A station trains call at or pass through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    /// Unique external identifier.
    pub id: Arc<str>,
    /// Short public code printed on timetables, referenced by schedule steps.
    pub code: Arc<str>,
    pub name: Arc<str>,
    pub coordinate: Coordinate,
}

/// One leg of a train's journey: leaving `origin_code` at `start`, reaching
/// `destination_code` at `arrival` and leaving it again at `departure`.
///
/// Times are recurring, so `start <= arrival` does not hold arithmetically
/// for legs that run over midnight.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleStep {
    pub start: Time,
    pub arrival: Time,
    pub departure: Time,
    pub origin_code: Arc<str>,
    pub destination_code: Arc<str>,
    pub route_id: Option<Arc<str>>,
    /// The train runs from the last point of the route towards its first.
    pub reversed: bool,
}

impl ScheduleStep {
    /// Leaving the origin until leaving the destination, dwell included.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.departure)
    }

    pub fn travel_window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.arrival)
    }

    pub fn dwell_window(&self) -> TimeWindow {
        TimeWindow::new(self.arrival, self.departure)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Train {
    pub id: Arc<str>,
    pub code: Arc<str>,
    pub name: Arc<str>,
    /// Legs in traversal order.
    pub steps: Box<[ScheduleStep]>,
}

impl Train {
    pub fn overall_departure(&self) -> Option<Time> {
        self.steps.first().map(|step| step.start)
    }

    pub fn overall_arrival(&self) -> Option<Time> {
        self.steps.last().map(|step| step.arrival)
    }

    pub fn journey_window(&self) -> Option<TimeWindow> {
        Some(TimeWindow::new(
            self.overall_departure()?,
            self.overall_arrival()?,
        ))
    }

    /// From the first leg's start until the train leaves its terminus,
    /// covering the final dwell that `journey_window` leaves out.
    pub fn service_window(&self) -> Option<TimeWindow> {
        Some(TimeWindow::new(
            self.overall_departure()?,
            self.steps.last()?.departure,
        ))
    }

    /// Orders legs by departure time of day, for sources that do not carry
    /// a traversal sequence.
    pub fn sort_steps_by_departure(&mut self) {
        self.steps.sort_by_key(|step| step.departure);
    }
}

/// A stop of a journey with times already placed on a calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub station_id: Arc<str>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub departure_time: Option<DateTime<Utc>>,
    pub train_code: Arc<str>,
    pub train_name: Arc<str>,
    pub route_id: Option<Arc<str>>,
}

/// Outcome of looking up a record through an ordered list of keys.
#[derive(Debug, PartialEq)]
pub enum Resolution<'a, T> {
    /// Matched on the primary key.
    Primary(&'a T),
    /// Matched on the fallback key.
    Secondary(&'a T),
    Missing,
}

impl<T> Clone for Resolution<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Resolution<'_, T> {}

impl<'a, T> Resolution<'a, T> {
    pub fn found(self) -> Option<&'a T> {
        match self {
            Resolution::Primary(value) | Resolution::Secondary(value) => Some(value),
            Resolution::Missing => None,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Resolution::Missing)
    }
}
