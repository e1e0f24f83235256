//! Conversion between recurring times of day and absolute instants.
//!
//! Schedules only carry a time of day, and the calendar day they belong to
//! is chosen by the caller. Which calendar day an instant falls on depends
//! on a reference timezone, so exactly one [`RecurringClock`] should be
//! shared by everything that turns schedule times into instants.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeDelta, TimeZone, Utc};

use crate::shared::time::{DAY, Duration, Time, positive_modulo};

/// Western Indonesian Time, UTC+7.
pub const WIB_UTC_OFFSET_HOURS: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurringClock {
    zone: FixedOffset,
}

impl Default for RecurringClock {
    fn default() -> Self {
        Self::wib()
    }
}

impl RecurringClock {
    pub const fn new(zone: FixedOffset) -> Self {
        Self { zone }
    }

    pub fn wib() -> Self {
        Self::from_utc_offset_hours(WIB_UTC_OFFSET_HOURS).unwrap_or(Self::utc())
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// `None` when the offset is outside of +-24 hours.
    pub fn from_utc_offset_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours.checked_mul(3600)?).map(Self::new)
    }

    pub const fn zone(&self) -> FixedOffset {
        self.zone
    }

    fn offset(&self) -> Duration {
        Duration::from_seconds(i64::from(self.zone.local_minus_utc()))
    }

    /// Local wall-clock time of day of a recurring time.
    pub fn local_time_of(&self, recurring: Time) -> Time {
        recurring + self.offset()
    }

    /// Recurring (UTC) time for a local wall-clock time of day.
    pub fn recurring_from_local(&self, local: Time) -> Time {
        local - self.offset()
    }

    fn utc_delta(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.zone.local_minus_utc()))
    }

    /// Places the hour and minute of `recurring`, read in the reference
    /// timezone, on `date`. Seconds are dropped.
    ///
    /// `None` when the result falls outside of the representable calendar.
    pub fn to_instant(&self, recurring: Time, date: NaiveDate) -> Option<DateTime<Utc>> {
        let local = self.local_time_of(recurring).as_millis();
        let minutes = local / Duration::from_minutes(1).as_millis();
        let utc = date
            .and_time(NaiveTime::MIN)
            .checked_add_signed(TimeDelta::minutes(minutes))?
            .checked_sub_signed(self.utc_delta())?;
        Some(Utc.from_utc_datetime(&utc))
    }

    /// Converts an arrival like [`Self::to_instant`], rolling it over to the
    /// next day when it would otherwise precede `departure`.
    ///
    /// Only a single rollover is applied.
    pub fn normalize_arrival(
        &self,
        departure: DateTime<Utc>,
        arrival: Time,
        date: NaiveDate,
    ) -> Option<DateTime<Utc>> {
        let instant = self.to_instant(arrival, date)?;
        if instant < departure {
            instant.checked_add_signed(TimeDelta::from(DAY))
        } else {
            Some(instant)
        }
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.zone).date_naive()
    }

    /// Time elapsed since local midnight of the instant's day.
    pub fn time_of_day(&self, instant: DateTime<Utc>) -> Duration {
        let millis = instant.timestamp_millis() + self.offset().as_millis();
        Duration::from_millis(positive_modulo(millis, DAY.as_millis()))
    }

    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let utc = date
            .and_time(NaiveTime::MIN)
            .checked_sub_signed(self.utc_delta())?;
        Some(Utc.from_utc_datetime(&utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn instant_keeps_local_hour_and_minute() {
        let clock = RecurringClock::wib();
        // 01:30:45 UTC on some arbitrary storage date, 08:30 in WIB
        let recurring = Time::from_millis(1_600_000_000_000 - 1_600_000_000_000 % 86_400_000)
            + Duration::from_hours(1)
            + Duration::from_minutes(30)
            + Duration::from_seconds(45);
        let instant = clock.to_instant(recurring, date(2024, 5, 1)).unwrap();
        let local = instant.with_timezone(&clock.zone());
        assert_eq!(local.date_naive(), date(2024, 5, 1));
        assert_eq!((local.hour(), local.minute(), local.second()), (8, 30, 0));
    }

    #[test]
    fn arrival_before_departure_rolls_to_next_day() {
        let clock = RecurringClock::wib();
        let day = date(2024, 5, 1);
        let departure = clock
            .to_instant(clock.recurring_from_local(Time::from_hm(23, 50)), day)
            .unwrap();
        let arrival = clock
            .normalize_arrival(departure, clock.recurring_from_local(Time::from_hm(0, 10)), day)
            .unwrap();
        assert_eq!(arrival - departure, TimeDelta::minutes(20));
        assert_eq!(clock.local_date(arrival), date(2024, 5, 2));
    }

    #[test]
    fn arrival_after_departure_is_untouched() {
        let clock = RecurringClock::utc();
        let day = date(2024, 5, 1);
        let departure = clock.to_instant(Time::from_hm(8, 0), day).unwrap();
        let arrival = clock
            .normalize_arrival(departure, Time::from_hm(9, 15), day)
            .unwrap();
        assert_eq!(arrival - departure, TimeDelta::minutes(75));
    }

    #[test]
    fn local_round_trip() {
        let clock = RecurringClock::wib();
        let local = Time::from_hm(3, 0);
        let recurring = clock.recurring_from_local(local);
        assert_eq!(recurring, Time::from_hm(20, 0));
        assert_eq!(clock.local_time_of(recurring), local);
    }

    #[test]
    fn start_of_day_in_reference_zone() {
        let clock = RecurringClock::wib();
        let start = clock.start_of_day(date(2024, 5, 1)).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-04-30T17:00:00+00:00");
        assert_eq!(clock.time_of_day(start), Duration::from_millis(0));
    }

    #[test]
    fn calendar_edges_have_no_instant() {
        let clock = RecurringClock::wib();
        // 03:00 WIB on the first representable date is still the day before in UTC
        assert_eq!(clock.to_instant(Time::from_hm(20, 0), NaiveDate::MIN), None);
        assert_eq!(clock.start_of_day(NaiveDate::MIN), None);
        assert!(clock.to_instant(Time::from_hm(0, 0), NaiveDate::MIN).is_some());

        let late = RecurringClock::utc();
        let departure = late.to_instant(Time::from_hm(23, 0), NaiveDate::MAX).unwrap();
        assert_eq!(
            late.normalize_arrival(departure, Time::from_hm(1, 0), NaiveDate::MAX),
            None
        );
    }

    #[test]
    fn offsets_out_of_range_are_rejected() {
        assert!(RecurringClock::from_utc_offset_hours(25).is_none());
        assert!(RecurringClock::from_utc_offset_hours(-5).is_some());
    }
}
