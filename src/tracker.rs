use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::{
    clock::RecurringClock,
    feed::{self, FeedReader},
    projection::{ProjectedTrainState, ProjectionConfig, Projector},
    repository::{Repository, ScheduleRow, Train},
    timeline::{TimelineBuilder, TimelineStop},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Train id does not match any entry: {0}")]
    UnknownTrain(String),
    #[error("Schedule cannot be placed on {0}")]
    DateOutOfRange(NaiveDate),
}

/// Binds a snapshot to the one clock every schedule time is read with, so
/// live positions and timelines always agree on the reference timezone.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    repository: Repository,
    clock: RecurringClock,
    config: ProjectionConfig,
}

impl Tracker {
    pub fn new(repository: Repository, clock: RecurringClock) -> Self {
        Self {
            repository,
            clock,
            config: ProjectionConfig::default(),
        }
    }

    pub fn from_feed(feed: FeedReader, clock: RecurringClock) -> Result<Self, feed::Error> {
        let repository = Repository::load_feed(feed, &clock)?;
        Ok(Self::new(repository, clock))
    }

    pub fn with_config(mut self, config: ProjectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn clock(&self) -> &RecurringClock {
        &self.clock
    }

    pub fn projector(&self) -> Projector<'_> {
        self.repository.projector().with_config(self.config)
    }

    pub fn project(&self, train_id: &str, now: DateTime<Utc>) -> Option<ProjectedTrainState> {
        let train = self.repository.train_by_id(train_id)?;
        self.projector().project(now, train)
    }

    pub fn project_all(&self, now: DateTime<Utc>) -> Vec<ProjectedTrainState> {
        self.projector().project_all(now)
    }

    /// The stops of `train` placed on `date`.
    ///
    /// Each time is rolled over a day when it would precede the time before
    /// it, so a journey running past midnight ends on the following date.
    /// `None` when a stop would fall outside of the representable calendar.
    pub fn schedule_rows(&self, train: &Train, date: NaiveDate) -> Option<Vec<ScheduleRow>> {
        let Some(first) = train.steps.first() else {
            return Some(Vec::new());
        };
        let row = |code: &Arc<str>, arrival, departure, route_id: Option<Arc<str>>| ScheduleRow {
            station_id: self.repository.station_key(code),
            arrival_time: arrival,
            departure_time: departure,
            train_code: train.code.clone(),
            train_name: train.name.clone(),
            route_id,
        };

        let mut rows = Vec::with_capacity(train.steps.len() + 1);
        let mut previous = self.clock.to_instant(first.start, date)?;
        rows.push(row(
            &first.origin_code,
            None,
            Some(previous),
            first.route_id.clone(),
        ));
        for (i, step) in train.steps.iter().enumerate() {
            let arrival = self.clock.normalize_arrival(previous, step.arrival, date)?;
            let next = train.steps.get(i + 1);
            let departure = match next {
                Some(_) => Some(self.clock.normalize_arrival(arrival, step.departure, date)?),
                None => None,
            };
            let route_id = next
                .and_then(|next| next.route_id.clone())
                .or_else(|| step.route_id.clone());
            rows.push(row(&step.destination_code, Some(arrival), departure, route_id));
            previous = departure.unwrap_or(arrival);
        }
        Some(rows)
    }

    /// Timeline of train `train_id` on `date`, with the leg it is currently
    /// on marked when that run belongs to `date`.
    pub fn timeline(
        &self,
        train_id: &str,
        now: DateTime<Utc>,
        date: NaiveDate,
        destination: Option<&str>,
    ) -> Result<Vec<TimelineStop>, self::Error> {
        let train = self
            .repository
            .train_by_id(train_id)
            .ok_or_else(|| Error::UnknownTrain(train_id.to_string()))?;
        let rows = self
            .schedule_rows(train, date)
            .ok_or(Error::DateOutOfRange(date))?;
        let current = self
            .projector()
            .project(now, train)
            .filter(|state| {
                self.clock.local_date(state.journey_departure) == date
                    || self.clock.local_date(state.journey_arrival) == date
            })
            .and_then(|state| state.active_station().map(|code| self.repository.station_key(code)));
        let destination = destination.map(|key| self.repository.station_key(&Arc::from(key)));

        Ok(TimelineBuilder::new(&self.clock, &rows, now, date)
            .current_station(current.as_deref())
            .destination(destination.as_deref())
            .build())
    }
}
