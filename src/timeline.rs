//! Stop by stop view of a journey on a chosen calendar date.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::Serialize;
use tracing::trace;

use crate::{clock::RecurringClock, repository::ScheduleRow, shared::time::DAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopState {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineStop {
    pub station_id: Arc<str>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub departure_time: Option<DateTime<Utc>>,
    pub state: StopState,
    /// The train calls here, as opposed to only passing through.
    pub is_actual_stop: bool,
    /// How far the train is towards the next stop. `None` on the last stop.
    pub progress_to_next: Option<f64>,
}

/// Classifies every row of a date resolved schedule as completed, current
/// or upcoming.
///
/// `rows` must already be placed on `selected_date` and ordered by
/// departure.
pub struct TimelineBuilder<'a> {
    clock: &'a RecurringClock,
    rows: &'a [ScheduleRow],
    now: DateTime<Utc>,
    selected_date: NaiveDate,
    current_station: Option<&'a str>,
    destination: Option<&'a str>,
}

impl<'a> TimelineBuilder<'a> {
    pub fn new(
        clock: &'a RecurringClock,
        rows: &'a [ScheduleRow],
        now: DateTime<Utc>,
        selected_date: NaiveDate,
    ) -> Self {
        Self {
            clock,
            rows,
            now,
            selected_date,
            current_station: None,
            destination: None,
        }
    }

    /// Station of the leg the train is currently on.
    pub fn current_station(mut self, station_id: Option<&'a str>) -> Self {
        self.current_station = station_id;
        self
    }

    /// Station the rider is travelling to.
    pub fn destination(mut self, station_id: Option<&'a str>) -> Self {
        self.destination = station_id;
        self
    }

    pub fn build(&self) -> Vec<TimelineStop> {
        let is_future_day = self.selected_date > self.clock.local_date(self.now);
        let has_departed = !is_future_day
            && self
                .effective_departure()
                .is_some_and(|departure| self.now >= departure);
        let has_arrived = self.has_arrived_at_destination();
        trace!(
            "Timeline for {}: future {}, departed {}, arrived {}",
            self.selected_date, is_future_day, has_departed, has_arrived
        );

        let mut found_current = false;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let is_current = !is_future_day
                    && has_departed
                    && !found_current
                    && self.current_station == Some(row.station_id.as_ref());
                let state = if is_future_day || !has_departed {
                    StopState::Upcoming
                } else if has_arrived && self.current_station.is_none() {
                    StopState::Completed
                } else if is_current {
                    found_current = true;
                    StopState::Current
                } else if found_current {
                    StopState::Upcoming
                } else {
                    StopState::Completed
                };

                let progress_to_next = self.rows.get(i + 1).and_then(|next| {
                    let start = row.departure_time.or(row.arrival_time)?;
                    let end = next.arrival_time.or(next.departure_time)?;
                    Some(self.progress_between(start, end))
                });

                TimelineStop {
                    station_id: row.station_id.clone(),
                    arrival_time: row.arrival_time,
                    departure_time: row.departure_time,
                    state,
                    is_actual_stop: row.arrival_time.is_some() || row.departure_time.is_some(),
                    progress_to_next,
                }
            })
            .collect()
    }

    /// First departure of the journey, moved back a day when the journey
    /// runs over midnight and `now` is still before its final arrival.
    fn effective_departure(&self) -> Option<DateTime<Utc>> {
        let first = self.rows.first()?;
        let departure = first.departure_time.or(first.arrival_time)?;
        let Some(last_arrival) = self.rows.last().and_then(|row| row.arrival_time) else {
            return Some(departure);
        };

        let last_arrival_of_day = self.clock.time_of_day(last_arrival);
        let crosses_midnight = last_arrival_of_day < self.clock.time_of_day(departure);
        if crosses_midnight && self.clock.time_of_day(self.now) < last_arrival_of_day {
            Some(
                departure
                    .checked_sub_signed(TimeDelta::from(DAY))
                    .unwrap_or(DateTime::<Utc>::MIN_UTC),
            )
        } else {
            Some(departure)
        }
    }

    fn has_arrived_at_destination(&self) -> bool {
        let Some(destination) = self.destination else {
            return false;
        };
        self.rows
            .iter()
            .find(|row| row.station_id.as_ref() == destination)
            .and_then(|row| row.arrival_time)
            .is_some_and(|arrival| self.now >= arrival)
    }

    fn progress_between(&self, departure: DateTime<Utc>, arrival: DateTime<Utc>) -> f64 {
        if self.clock.local_date(departure) > self.clock.local_date(self.now)
            || self.now < departure
        {
            return 0.0;
        }
        if self.now >= arrival {
            return 1.0;
        }
        let total = (arrival - departure).num_milliseconds();
        let elapsed = (self.now - departure).num_milliseconds();
        if total <= 0 {
            return 1.0;
        }
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }
}
