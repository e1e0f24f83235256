use std::{
    fmt::Display,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

/// Length of one schedule day.
pub const DAY: Duration = Duration::from_days(1);

/// Remainder of `value / modulus` that is never negative.
///
/// `modulus` must be positive. Every cycle comparison in the crate goes
/// through this, so `positive_modulo(t + k * m, m) == positive_modulo(t, m)`
/// holds for any integer `k`.
pub const fn positive_modulo(value: i64, modulus: i64) -> i64 {
    value.rem_euclid(modulus)
}

/// A span of time with millisecond precision. May be negative.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Duration(i64);

impl From<i64> for Duration {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Duration> for chrono::TimeDelta {
    fn from(value: Duration) -> Self {
        chrono::TimeDelta::milliseconds(value.0)
    }
}

impl Duration {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn from_seconds(secs: i64) -> Self {
        Self(secs * 1000)
    }

    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes * 60 * 1000)
    }

    pub const fn from_hours(hours: i64) -> Self {
        Self(hours * 60 * 60 * 1000)
    }

    pub const fn from_days(days: i64) -> Self {
        Self(days * 24 * 60 * 60 * 1000)
    }

    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn as_hours(&self) -> f64 {
        self.0 as f64 / Self::from_hours(1).0 as f64
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

/// A recurring time of day.
///
/// Only the position within a day carries meaning, so any millisecond value
/// handed in (often a full epoch timestamp whose date is a storage artifact)
/// is reduced into `[0, DAY)` on construction. Values are in UTC; use
/// [`crate::clock::RecurringClock`] to move between local wall-clock times
/// and recurring times.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Time(i64);

impl From<i64> for Time {
    fn from(value: i64) -> Self {
        Self::from_millis(value)
    }
}

impl Sub<Time> for Time {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration(self.0 - rhs.0)
    }
}

impl Add<Duration> for Time {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::from_millis(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs
    }
}

impl Sub<Duration> for Time {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self::from_millis(self.0 - rhs.0)
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hms_string())
    }
}

impl Time {
    pub const MIDNIGHT: Time = Time(0);

    pub const fn from_millis(millis: i64) -> Self {
        Self(positive_modulo(millis, DAY.as_millis()))
    }

    pub const fn from_hm(hours: i64, minutes: i64) -> Self {
        Self::from_millis(Duration::from_hours(hours).0 + Duration::from_minutes(minutes).0)
    }

    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn to_hms_string(&self) -> String {
        let secs = self.0 / 1000;
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        let s = secs % 60;
        format!("{:02}:{:02}:{:02}", h, m, s)
    }

    /// Parses `HH:MM` or `HH:MM:SS`. Hours 24 to 47 wrap into the next day,
    /// anything further out is rejected.
    pub fn from_hms(time: &str) -> Option<Self> {
        let mut split = time.trim().split(':');
        let hours: i64 = split.next()?.parse().ok()?;
        let minutes: i64 = split.next()?.parse().ok()?;
        let seconds: i64 = match split.next() {
            Some(value) => value.parse().ok()?,
            None => 0,
        };
        if split.next().is_some() || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
            return None;
        }
        if !(0..48).contains(&hours) {
            return None;
        }
        let millis = Duration::from_hours(hours).0
            + Duration::from_minutes(minutes).0
            + Duration::from_seconds(seconds).0;
        Some(Self::from_millis(millis))
    }
}

#[test]
fn parse_unparse_1() {
    let time = "00:00:00";
    let stime = Time::from_hms(time).unwrap();
    assert_eq!(time, stime.to_hms_string())
}

#[test]
fn parse_unparse_2() {
    let time = "12:30:30";
    let stime = Time::from_hms(time).unwrap();
    assert_eq!(time, stime.to_hms_string())
}

#[test]
fn parse_without_seconds() {
    let stime = Time::from_hms("23:50").unwrap();
    assert_eq!(stime, Time::from_hm(23, 50));
}

#[test]
fn parse_wraps_past_midnight() {
    let stime = Time::from_hms("24:10:00").unwrap();
    assert_eq!(stime, Time::from_hm(0, 10));
}

#[test]
fn parse_rejects_out_of_range_hours() {
    assert_eq!(Time::from_hms("47:59:59"), Some(Time::from_hms("23:59:59").unwrap()));
    assert_eq!(Time::from_hms("48:00"), None);
    assert_eq!(Time::from_hms("9999999999999:00"), None);
    assert_eq!(Time::from_hms("-1:00"), None);
}

#[test]
fn date_component_is_discarded() {
    // 2024-01-01T05:00:00Z
    let time = Time::from_millis(1_704_085_200_000);
    assert_eq!(time, Time::from_hm(5, 0));
}

#[test]
fn negative_millis_wrap_backwards() {
    let time = Time::from_millis(-Duration::from_minutes(10).as_millis());
    assert_eq!(time, Time::from_hm(23, 50));
}
