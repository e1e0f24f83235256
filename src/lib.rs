//! Tracks trains against recurring daily schedules.
//!
//! Everything here is a pure function of the snapshot and the `now` it is
//! given: [`projection`] places a running train on the map, [`timeline`]
//! classifies the stops of a journey, and [`clock`] turns schedule times of
//! day into instants on a chosen date.

pub mod clock;
pub mod feed;
pub mod geometry;
pub mod projection;
pub mod repository;
pub mod shared;
pub mod timeline;
pub mod tracker;

pub mod prelude {
    pub use crate::clock::RecurringClock;
    pub use crate::feed::FeedReader;
    pub use crate::geometry::Route;
    pub use crate::projection::{ProjectedTrainState, ProjectionConfig, Projector};
    pub use crate::repository::{
        Repository, Resolution, ScheduleRow, ScheduleStep, Station, Train,
    };
    pub use crate::shared::{Coordinate, DAY, Distance, Duration, Speed, Time, TimeWindow};
    pub use crate::timeline::{StopState, TimelineBuilder, TimelineStop};
    pub use crate::tracker::Tracker;
}
