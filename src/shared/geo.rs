use std::{
    cmp,
    fmt::Display,
    ops::{Add, Div, Mul, Sub},
};

use serde::{Deserialize, Serialize};

use crate::shared::time::Duration;

const EARTH_RADIUS_KM: f64 = 6371.0;
/// Below this difference (in degrees) two coordinates are treated as the same point.
pub const COORDINATE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distance(f64);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Distance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Distance {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Distance {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div for Distance {
    type Output = f64;
    fn div(self, rhs: Self) -> Self::Output {
        self.0 / rhs.0
    }
}

impl Distance {
    pub const ZERO: Distance = Distance(0.0);

    pub const fn from_meters(distance: f64) -> Self {
        Self(distance)
    }

    pub const fn from_kilometers(distance: f64) -> Self {
        Self(distance * 1000.0)
    }

    pub const fn as_meters(&self) -> f64 {
        self.0
    }

    pub const fn as_kilometers(&self) -> f64 {
        self.0 / 1000.0
    }

    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self(self.0.clamp(min.0, max.0))
    }
}

/// Ground speed, stored as meters per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Speed(f64);

impl Speed {
    /// `None` when the duration is not positive.
    pub fn over(distance: Distance, duration: Duration) -> Option<Self> {
        if duration.as_millis() <= 0 {
            return None;
        }
        Some(Self(distance.as_meters() / (duration.as_millis() as f64 / 1000.0)))
    }

    pub const fn as_meters_per_second(&self) -> f64 {
        self.0
    }

    pub fn as_kilometers_per_hour(&self) -> f64 {
        self.0 * 3.6
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.latitude, value.longitude)
    }
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    pub fn approx_eq(&self, other: &Self) -> bool {
        (self.latitude - other.latitude).abs() < COORDINATE_EPSILON
            && (self.longitude - other.longitude).abs() < COORDINATE_EPSILON
    }

    /// Great-circle distance using the haversine formula.
    pub fn distance(&self, coord: &Self) -> Distance {
        let dist_lat = f64::to_radians(coord.latitude - self.latitude);
        let dist_lon = f64::to_radians(coord.longitude - self.longitude);
        let a = f64::powi(f64::sin(dist_lat / 2.0), 2)
            + f64::cos(f64::to_radians(self.latitude))
                * f64::cos(f64::to_radians(coord.latitude))
                * f64::sin(dist_lon / 2.0)
                * f64::sin(dist_lon / 2.0);
        let c = 2.0 * f64::atan2(f64::sqrt(a), f64::sqrt(1.0 - a));
        Distance::from_kilometers(EARTH_RADIUS_KM * c)
    }

    /// Initial forward azimuth from `self` towards `coord`, in degrees
    /// clockwise from north within `[0, 360)`.
    ///
    /// Returns `None` when the two points coincide, since no heading can be
    /// derived from a zero-length vector.
    pub fn bearing_to(&self, coord: &Self) -> Option<f64> {
        if self.approx_eq(coord) {
            return None;
        }
        let lat_a = self.latitude.to_radians();
        let lat_b = coord.latitude.to_radians();
        let dist_lon = (coord.longitude - self.longitude).to_radians();
        let y = dist_lon.sin() * lat_b.cos();
        let x = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * dist_lon.cos();
        Some((y.atan2(x).to_degrees() + 360.0) % 360.0)
    }

    /// Linear interpolation in latitude/longitude space. `fraction` is
    /// clamped to `[0, 1]` and the end points are returned exactly.
    pub fn interpolate(&self, coord: &Self, fraction: f64) -> Self {
        if fraction <= 0.0 {
            return *self;
        }
        if fraction >= 1.0 {
            return *coord;
        }
        Self {
            latitude: self.latitude + (coord.latitude - self.latitude) * fraction,
            longitude: self.longitude + (coord.longitude - self.longitude) * fraction,
        }
    }
}

#[test]
fn distance_test() {
    let coord_a = Coordinate {
        latitude: 48.85800943005911,
        longitude: 2.3514350059357927,
    };

    let coord_b = Coordinate {
        latitude: 51.5052389927712,
        longitude: -0.12495407345099824,
    };
    let d = coord_a.distance(&coord_b);
    assert!((d.as_kilometers() - 343.5).abs() < 5.0);
}

#[test]
fn distance_eq_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(1.0);
    assert_eq!(dist_a, dist_b)
}

#[test]
fn distance_cmp_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(0.5);
    assert!(dist_a > dist_b)
}

#[test]
fn bearing_cardinal_directions() {
    let origin = Coordinate::new(0.0, 0.0);
    let north = origin.bearing_to(&Coordinate::new(1.0, 0.0)).unwrap();
    let east = origin.bearing_to(&Coordinate::new(0.0, 1.0)).unwrap();
    let south = origin.bearing_to(&Coordinate::new(-1.0, 0.0)).unwrap();
    let west = origin.bearing_to(&Coordinate::new(0.0, -1.0)).unwrap();
    assert!(north.abs() < 1e-9);
    assert!((east - 90.0).abs() < 1e-9);
    assert!((south - 180.0).abs() < 1e-9);
    assert!((west - 270.0).abs() < 1e-9);
}

#[test]
fn bearing_of_same_point_is_undefined() {
    let a = Coordinate::new(-6.1754, 106.8272);
    assert_eq!(a.bearing_to(&a), None);
}

#[test]
fn speed_over_zero_duration_is_undefined() {
    assert_eq!(Speed::over(Distance::from_kilometers(1.0), Duration::from_millis(0)), None);
    let speed = Speed::over(Distance::from_kilometers(60.0), Duration::from_hours(1)).unwrap();
    assert!((speed.as_kilometers_per_hour() - 60.0).abs() < 1e-9);
}
