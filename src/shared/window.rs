//! Reconciles recurring `[start, end]` windows with a timestamp on a
//! common cycle.
//!
//! A window whose end is earlier than its start crosses midnight. The end is
//! pushed one day forward so that `start <= end`, and the comparison cycle
//! grows to a whole number of days large enough to hold the window. The
//! timestamp is then folded onto that cycle with a positive modulo.

use crate::shared::time::{DAY, Time, positive_modulo};

/// A window and a timestamp expressed on the same cycle.
///
/// `time` always lies in `[0, cycle)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedWindow {
    pub time: i64,
    pub start: i64,
    pub end: i64,
    pub cycle: i64,
}

impl NormalizedWindow {
    pub fn contains_time(&self) -> bool {
        self.start <= self.time && self.time <= self.end
    }

    /// Fraction of the window that has elapsed at `time`, clamped to `[0, 1]`.
    /// Zero-length windows are treated as one millisecond long.
    pub fn progress(&self) -> f64 {
        let duration = (self.end - self.start).max(1);
        let elapsed = (self.time - self.start).max(0);
        (elapsed as f64 / duration as f64).clamp(0.0, 1.0)
    }

    pub fn length(&self) -> i64 {
        self.end - self.start
    }
}

/// Normalizes `timestamp` against the recurring window `[start, end]`.
///
/// All values are milliseconds. `day_length` must be positive.
pub fn normalize(timestamp: i64, start: i64, end: i64, day_length: i64) -> NormalizedWindow {
    let day_length = day_length.max(1);
    let (start, end) = if end < start {
        (
            positive_modulo(start, day_length),
            positive_modulo(end, day_length) + day_length,
        )
    } else {
        (start, end)
    };
    // ceil(end / day_length) for any sign of `end`
    let days = -(-end).div_euclid(day_length);
    let cycle = days.max(1) * day_length;
    NormalizedWindow {
        time: positive_modulo(timestamp, cycle),
        start,
        end,
        cycle,
    }
}

/// Whether `timestamp` falls inside `[start, end]` once both are on the
/// window's cycle. Uses a one day cycle length.
pub fn is_within(timestamp: i64, start: i64, end: i64) -> bool {
    normalize(timestamp, start, end, DAY.as_millis()).contains_time()
}

/// A recurring window between two times of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Time,
    pub end: Time,
}

impl TimeWindow {
    pub const fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end < self.start
    }

    pub fn normalize(&self, timestamp: i64) -> NormalizedWindow {
        normalize(
            timestamp,
            self.start.as_millis(),
            self.end.as_millis(),
            DAY.as_millis(),
        )
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.normalize(timestamp).contains_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::time::Duration;

    const D: i64 = DAY.as_millis();

    fn hm(hours: i64, minutes: i64) -> i64 {
        Time::from_hm(hours, minutes).as_millis()
    }

    #[test]
    fn plain_window_keeps_bounds() {
        let window = normalize(hm(9, 0), hm(8, 0), hm(10, 0), D);
        assert_eq!(window.start, hm(8, 0));
        assert_eq!(window.end, hm(10, 0));
        assert_eq!(window.cycle, D);
        assert!(window.contains_time());
    }

    #[test]
    fn crossing_window_extends_end_by_a_day() {
        let window = normalize(hm(23, 55), hm(23, 50), hm(0, 10), D);
        assert_eq!(window.start, hm(23, 50));
        assert_eq!(window.end, hm(0, 10) + D);
        assert_eq!(window.cycle, 2 * D);
        assert!(window.contains_time());
    }

    #[test]
    fn after_midnight_on_second_day_of_cycle() {
        assert!(is_within(D + hm(0, 5), hm(23, 50), hm(0, 10)));
        assert!(!is_within(D + hm(0, 15), hm(23, 50), hm(0, 10)));
    }

    #[test]
    fn negative_timestamps_fold_into_cycle() {
        let window = normalize(-1, hm(8, 0), hm(10, 0), D);
        assert_eq!(window.time, D - 1);
    }

    #[test]
    fn time_always_inside_cycle() {
        let samples = [
            -3 * D - 17,
            -1,
            0,
            1,
            D - 1,
            D,
            5 * D + hm(13, 37),
            i64::from(i32::MAX) * 7,
        ];
        for timestamp in samples {
            for (start, end) in [(hm(8, 0), hm(10, 0)), (hm(22, 0), hm(1, 0))] {
                let window = normalize(timestamp, start, end, D);
                assert!(window.time >= 0 && window.time < window.cycle);
            }
        }
    }

    #[test]
    fn periodic_over_cycle() {
        let windows = [(hm(8, 0), hm(10, 0)), (hm(23, 50), hm(0, 10)), (0, 0)];
        for (start, end) in windows {
            let cycle = normalize(0, start, end, D).cycle;
            for minute in (0..(2 * 24 * 60)).step_by(7) {
                let t = Duration::from_minutes(minute).as_millis();
                let expected = is_within(t, start, end);
                for k in [-3, -1, 1, 2, 10] {
                    assert_eq!(is_within(t + k * cycle, start, end), expected);
                }
            }
        }
    }

    #[test]
    fn progress_is_clamped() {
        let window = TimeWindow::new(Time::from_hm(8, 0), Time::from_hm(9, 0));
        assert_eq!(window.normalize(hm(7, 0)).progress(), 0.0);
        assert_eq!(window.normalize(hm(8, 30)).progress(), 0.5);
        assert_eq!(window.normalize(hm(10, 0)).progress(), 1.0);
    }

    #[test]
    fn zero_length_window_has_unit_duration() {
        let window = normalize(hm(8, 0), hm(8, 0), hm(8, 0), D);
        assert!(window.contains_time());
        assert_eq!(window.progress(), 0.0);
    }
}
