//! Route polylines with precomputed arc length.

use std::sync::Arc;

use thiserror::Error;

use crate::shared::geo::{Coordinate, Distance};

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Route {0} has no points")]
    EmptyRoute(String),
    #[error("Route {route} has a non finite point at position {index}")]
    NonFinitePoint { route: String, index: usize },
}

/// An ordered polyline a train travels along.
///
/// `cumulative[i]` holds the great-circle length from the first point up to
/// point `i`, so `length` equals the last entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: Arc<str>,
    points: Box<[Coordinate]>,
    cumulative: Box<[Distance]>,
}

impl Route {
    pub fn new(id: impl Into<Arc<str>>, points: Vec<Coordinate>) -> Result<Self, self::Error> {
        let id = id.into();
        if points.is_empty() {
            return Err(self::Error::EmptyRoute(id.to_string()));
        }
        if let Some(index) = points.iter().position(|point| !point.is_finite()) {
            return Err(self::Error::NonFinitePoint {
                route: id.to_string(),
                index,
            });
        }

        let mut total = Distance::ZERO;
        let mut cumulative = Vec::with_capacity(points.len());
        cumulative.push(total);
        for pair in points.windows(2) {
            total = total + pair[0].distance(&pair[1]);
            cumulative.push(total);
        }

        Ok(Self {
            id,
            points: points.into(),
            cumulative: cumulative.into(),
        })
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn length(&self) -> Distance {
        self.cumulative.last().copied().unwrap_or_default()
    }

    pub fn first(&self) -> Coordinate {
        self.points[0]
    }

    pub fn last(&self) -> Coordinate {
        self.points[self.points.len() - 1]
    }

    /// The point `distance` along the polyline from its first point, clamped
    /// to `[0, length]`.
    pub fn coordinate_at(&self, distance: Distance) -> Coordinate {
        let length = self.length();
        if distance <= Distance::ZERO || self.points.len() == 1 {
            return self.first();
        }
        if distance >= length {
            return self.last();
        }

        // First vertex at or beyond the requested distance, never index 0 here
        let end = self
            .cumulative
            .partition_point(|travelled| *travelled < distance)
            .max(1);
        let start = end - 1;
        let segment = self.cumulative[end] - self.cumulative[start];
        if segment <= Distance::ZERO {
            return self.points[end];
        }
        let fraction = (distance - self.cumulative[start]) / segment;
        self.points[start].interpolate(&self.points[end], fraction)
    }

    /// Direction of travel at `distance`, estimated from a second sample
    /// `lookahead` further along in the direction of travel.
    ///
    /// Near the end of the line the sample is taken behind instead so a
    /// heading is still available. `None` if the route has no extent.
    pub fn heading_at(&self, distance: Distance, lookahead: Distance, reversed: bool) -> Option<f64> {
        let step = if reversed {
            Distance::ZERO - lookahead
        } else {
            lookahead
        };
        let here = self.coordinate_at(distance);
        let ahead = self.coordinate_at((distance + step).clamp(Distance::ZERO, self.length()));
        match here.bearing_to(&ahead) {
            Some(bearing) => Some(bearing),
            None => {
                let behind =
                    self.coordinate_at((distance - step).clamp(Distance::ZERO, self.length()));
                behind.bearing_to(&here)
            }
        }
    }
}
