//! Geographic helpers for zone rings and map bounds.

use serde::{Deserialize, Serialize};

use crate::models::LatLon;

/// Minimum number of points that form a closed ring.
pub const MIN_RING_POINTS: usize = 3;

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Smallest box covering every finite point. Returns `None` when there is none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LatLon>,
    {
        points
            .into_iter()
            .filter(|point| point.is_finite())
            .fold(None, |bounds: Option<GeoBounds>, point| {
                Some(match bounds {
                    None => GeoBounds {
                        south: point.latitude,
                        west: point.longitude,
                        north: point.latitude,
                        east: point.longitude,
                    },
                    Some(b) => GeoBounds {
                        south: b.south.min(point.latitude),
                        west: b.west.min(point.longitude),
                        north: b.north.max(point.latitude),
                        east: b.east.max(point.longitude),
                    },
                })
            })
    }

    pub fn contains(&self, point: &LatLon) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }

    pub fn center(&self) -> LatLon {
        LatLon::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

/// Check that a perimeter can be rendered as a closed polygon.
pub fn validate_ring(points: &[LatLon]) -> Result<(), String> {
    if points.len() < MIN_RING_POINTS {
        return Err(format!(
            "perimeter needs at least {} points, got {}",
            MIN_RING_POINTS,
            points.len()
        ));
    }
    if let Some(index) = points.iter().position(|point| !point.is_finite()) {
        return Err(format!("perimeter point {} is not finite", index));
    }
    Ok(())
}
