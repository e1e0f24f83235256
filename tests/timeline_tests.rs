use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, TimeZone, Utc};
use kereta::{prelude::*, tracker::Error as TrackerError};

fn clock() -> RecurringClock {
    RecurringClock::wib()
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
}

/// Instant for a WIB wall-clock time.
fn local(d: u32, h: u32, m: u32) -> DateTime<Utc> {
    FixedOffset::east_opt(7 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 8, d, h, m, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn station(id: &str, code: &str, longitude: f64) -> Station {
    Station {
        id: id.into(),
        code: code.into(),
        name: code.into(),
        coordinate: Coordinate::new(-6.0, longitude),
    }
}

fn leg(start: (i64, i64), arrival: (i64, i64), departure: (i64, i64), from: &str, to: &str) -> ScheduleStep {
    let clock = clock();
    let time = |(h, m): (i64, i64)| clock.recurring_from_local(Time::from_hm(h, m));
    ScheduleStep {
        start: time(start),
        arrival: time(arrival),
        departure: time(departure),
        origin_code: from.into(),
        destination_code: to.into(),
        route_id: None,
        reversed: false,
    }
}

fn tracker() -> Tracker {
    let stations = vec![
        station("st-gmr", "GMR", 106.8),
        station("st-ck", "CK", 107.0),
        station("st-bd", "BD", 107.6),
    ];
    let trains = vec![
        Train {
            id: "day".into(),
            code: "KA20".into(),
            name: "Argo Parahyangan".into(),
            steps: vec![
                leg((8, 0), (9, 30), (9, 35), "GMR", "CK"),
                leg((9, 35), (11, 0), (11, 0), "CK", "BD"),
            ]
            .into(),
        },
        Train {
            id: "night".into(),
            code: "KA7".into(),
            name: "Malam Express".into(),
            steps: vec![leg((23, 50), (0, 10), (0, 10), "GMR", "CK")].into(),
        },
    ];
    let repository = Repository::from_parts(stations, vec![], trains).unwrap();
    Tracker::new(repository, clock())
}

fn states(stops: &[TimelineStop]) -> Vec<StopState> {
    stops.iter().map(|stop| stop.state).collect()
}

#[test]
fn rows_are_placed_on_the_date() {
    let tracker = tracker();
    let train = tracker.repository().train_by_id("day").unwrap();
    let rows = tracker.schedule_rows(train, date(15)).unwrap();

    let stations: Vec<_> = rows.iter().map(|row| row.station_id.as_ref()).collect();
    assert_eq!(stations, vec!["st-gmr", "st-ck", "st-bd"]);
    assert_eq!(rows[0].arrival_time, None);
    assert_eq!(rows[0].departure_time, Some(local(15, 8, 0)));
    assert_eq!(rows[1].arrival_time, Some(local(15, 9, 30)));
    assert_eq!(rows[1].departure_time, Some(local(15, 9, 35)));
    assert_eq!(rows[2].arrival_time, Some(local(15, 11, 0)));
    assert_eq!(rows[2].departure_time, None);
    assert!(rows.iter().all(|row| row.train_code.as_ref() == "KA20"));
}

#[test]
fn overnight_arrival_rolls_to_next_date() {
    let tracker = tracker();
    let train = tracker.repository().train_by_id("night").unwrap();
    let rows = tracker.schedule_rows(train, date(15)).unwrap();
    assert_eq!(rows[0].departure_time, Some(local(15, 23, 50)));
    assert_eq!(rows[1].arrival_time, Some(local(16, 0, 10)));
}

#[test]
fn live_leg_marks_current_stop() {
    let tracker = tracker();
    let stops = tracker.timeline("day", local(15, 10, 0), date(15), None).unwrap();
    assert_eq!(
        states(&stops),
        vec![StopState::Completed, StopState::Current, StopState::Upcoming]
    );
    let progress = stops[1].progress_to_next.unwrap();
    assert!((progress - 25.0 / 85.0).abs() < 1e-9);
}

#[test]
fn dwelling_train_is_current_at_its_station() {
    let tracker = tracker();
    let stops = tracker.timeline("day", local(15, 9, 32), date(15), None).unwrap();
    assert_eq!(
        states(&stops),
        vec![StopState::Completed, StopState::Current, StopState::Upcoming]
    );
    assert_eq!(stops[0].progress_to_next, Some(1.0));
}

#[test]
fn overnight_run_seen_after_midnight() {
    let tracker = tracker();
    let now = local(15, 0, 5);
    let state = tracker.project("night", now).unwrap();
    assert!(state.moving);
    assert_eq!(tracker.clock().local_date(state.journey_departure), date(14));

    let stops = tracker.timeline("night", now, date(15), None).unwrap();
    assert_eq!(states(&stops), vec![StopState::Current, StopState::Upcoming]);
}

#[test]
fn tomorrow_is_all_upcoming() {
    let tracker = tracker();
    let stops = tracker
        .timeline("day", local(15, 10, 0), date(16), Some("BD"))
        .unwrap();
    assert!(stops.iter().all(|stop| stop.state == StopState::Upcoming));
    assert_eq!(stops[0].progress_to_next, Some(0.0));
    assert_eq!(stops[1].progress_to_next, Some(0.0));
}

#[test]
fn finished_journey_at_destination_is_completed() {
    let tracker = tracker();
    let stops = tracker
        .timeline("day", local(15, 12, 0), date(15), Some("CK"))
        .unwrap();
    assert!(tracker.project("day", local(15, 12, 0)).is_none());
    assert!(stops.iter().all(|stop| stop.state == StopState::Completed));
    assert!(stops[..2].iter().all(|stop| stop.progress_to_next == Some(1.0)));
}

#[test]
fn past_date_ignores_todays_run() {
    let tracker = tracker();
    let now = local(15, 10, 0);
    let stops = tracker.timeline("day", now, date(14), None).unwrap();
    assert!(stops.iter().all(|stop| stop.state == StopState::Completed));
    assert_eq!(
        stops[0].departure_time.map(|t| now - t),
        Some(TimeDelta::hours(26))
    );
}

#[test]
fn unknown_train_has_no_timeline() {
    let tracker = tracker();
    assert_eq!(
        tracker.timeline("nope", local(15, 10, 0), date(15), None),
        Err(TrackerError::UnknownTrain("nope".to_string()))
    );
}

#[test]
fn date_at_calendar_edge_is_rejected() {
    let tracker = tracker();
    let train = tracker.repository().train_by_id("night").unwrap();
    assert!(tracker.schedule_rows(train, NaiveDate::MIN).is_none());
    assert_eq!(
        tracker.timeline("night", local(15, 10, 0), NaiveDate::MIN, None),
        Err(TrackerError::DateOutOfRange(NaiveDate::MIN))
    );
}
