//! Geographic points and ellipsoidal distance.
//!
//! Distances are measured on the WGS-84 ellipsoid using Karney's geodesic
//! algorithm (through [`geo::Geodesic`]). Unlike a spherical haversine, this
//! stays accurate to well under a millimeter for any pair of points, including
//! pairs near the poles and pairs straddling the antimeridian.

use geo::{Distance, Geodesic};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A latitude/longitude pair in degrees.
///
/// Construction through [`Point::new`] does not check ranges; use
/// [`Point::try_new`] or [`Point::validate`] when the input is untrusted.
/// [`geodesic_distance`] always validates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude in degrees, `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, `[-180, 180]`.
    pub longitude: f64,
}

impl Point {
    /// Create a point without range checks.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a point, rejecting out-of-range or non-finite coordinates.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let p = Self::new(latitude, longitude);
        p.validate()?;
        Ok(p)
    }

    /// Whether both coordinates are finite and within range.
    pub fn is_valid(&self) -> bool {
        // NaN fails both range checks.
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Check the coordinate ranges.
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(p: Point) -> Self {
        // geo uses (x, y) = (lon, lat).
        geo::Point::new(p.longitude, p.latitude)
    }
}

/// Ellipsoidal distance in meters between two points.
///
/// Symmetric, and zero for identical points. Fails with
/// [`Error::InvalidCoordinate`] if either point is out of range.
pub fn geodesic_distance(a: &Point, b: &Point) -> Result<f64> {
    a.validate()?;
    b.validate()?;
    Ok(distance_unchecked(a, b))
}

/// Distance for points already known to be valid.
#[inline]
pub(crate) fn distance_unchecked(a: &Point, b: &Point) -> f64 {
    if a == b {
        return 0.0;
    }
    Geodesic::distance(geo::Point::from(*a), geo::Point::from(*b))
}
