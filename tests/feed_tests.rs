use std::path::PathBuf;

use chrono::{FixedOffset, TimeZone, Utc};
use kereta::{
    feed::{self, Config},
    prelude::*,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR")))
}

fn load(name: &str) -> Result<Tracker, feed::Error> {
    let reader = FeedReader::new(Config::default()).from_path(fixture(name));
    Tracker::from_feed(reader, RecurringClock::wib())
}

#[test]
fn loads_directory_feed() {
    let tracker = load("feed").unwrap();
    let repository = tracker.repository();
    assert_eq!(repository.stations.len(), 4);
    assert_eq!(repository.routes.len(), 1);
    assert_eq!(repository.trains.len(), 2);

    let bogor = repository.station_by_code("BOO").unwrap();
    assert_eq!(bogor.id.as_ref(), "1003");
    assert_eq!(bogor.name.as_ref(), "Bogor");
}

#[test]
fn route_points_follow_sequence() {
    let tracker = load("feed").unwrap();
    let route = tracker.repository().route_by_id("JAKK-BOO").unwrap();
    assert_eq!(route.points().len(), 4);
    assert_eq!(route.first(), Coordinate::new(-6.137645, 106.814692));
    assert_eq!(route.last(), Coordinate::new(-6.595332, 106.790636));
    assert!(route.length().as_kilometers() > 40.0);
}

#[test]
fn steps_follow_sequence_and_become_recurring_utc() {
    let tracker = load("feed").unwrap();
    let train = tracker.repository().train_by_id("krl-1").unwrap();
    assert_eq!(train.steps.len(), 2);
    assert_eq!(train.steps[0].origin_code.as_ref(), "JAKK");
    assert_eq!(train.steps[0].start, Time::from_hm(23, 0));
    assert_eq!(train.steps[1].arrival, Time::from_hm(0, 20));
    assert_eq!(train.steps[0].route_id.as_deref(), Some("JAKK-BOO"));
    assert!(!train.steps[0].reversed);

    let night = tracker.repository().train_by_id("ka-7").unwrap();
    assert_eq!(night.steps[0].route_id, None);
    assert_eq!(night.steps[0].start, Time::from_hm(16, 50));
}

#[test]
fn zip_and_directory_agree() {
    let from_directory = load("feed").unwrap();
    let from_zip = load("feed.zip").unwrap();
    assert_eq!(
        from_directory.repository().stations,
        from_zip.repository().stations
    );
    assert_eq!(from_directory.repository().routes, from_zip.repository().routes);
    assert_eq!(from_directory.repository().trains, from_zip.repository().trains);
}

#[test]
fn loaded_train_moves_along_its_route() {
    let tracker = load("feed").unwrap();
    let now = FixedOffset::east_opt(7 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 4, 6, 9, 0)
        .unwrap()
        .with_timezone(&Utc);
    let state = tracker.project("krl-1", now).unwrap();
    assert!(state.moving);
    assert_eq!(state.route_id.as_deref(), Some("JAKK-BOO"));
    assert!((state.progress.unwrap() - 0.5).abs() < 1e-9);
    assert!(state.bearing.is_some());
}

#[test]
fn step_for_unknown_train_fails() {
    match load("broken_feed") {
        Err(feed::Error::UnknownTrain(id)) => assert_eq!(id, "krl-9"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn out_of_range_time_fails() {
    match load("overflow_feed") {
        Err(feed::Error::InvalidTime { train_id, value }) => {
            assert_eq!(train_id, "krl-1");
            assert_eq!(value, "9999999999999:00");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn missing_file_fails() {
    match load("nowhere") {
        Err(feed::Error::FileNotFound(name)) => assert_eq!(name, "stations.txt"),
        Err(feed::Error::Io(_)) => {}
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}
