//! Coordinates and the planar straight-line metric.

use serde::{Deserialize, Serialize};

/// Metres per degree of latitude used by the planar projection.
pub const METRES_PER_DEGREE: f64 = 111_320.0;

/// A WGS84 position in decimal degrees.
///
/// # Examples
///
/// ```
/// use u_roadnet::graph::Coordinate;
///
/// let c = Coordinate::new(-9.65, -35.72).unwrap();
/// assert_eq!(c.lat(), -9.65);
/// assert!(Coordinate::new(91.0, 0.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Creates a coordinate.
    ///
    /// Returns `None` if either value is non-finite, `|lat| > 90` or
    /// `|lon| > 180`.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if !lat.is_finite() || !lon.is_finite() || lat.abs() > 90.0 || lon.abs() > 180.0 {
            return None;
        }
        Some(Self { lat, lon })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Projects onto a plane in metres: `x = lon·k·cos(lat)`, `y = lat·k`.
    pub fn planar_xy(&self) -> (f64, f64) {
        let x = self.lon * METRES_PER_DEGREE * self.lat.to_radians().cos();
        let y = self.lat * METRES_PER_DEGREE;
        (x, y)
    }
}

/// Straight-line distance in metres between the planar projections of
/// two coordinates.
///
/// This is the A* heuristic. It is only admissible when edge weights are
/// measured in the same projected metric; against geodesic weights it can
/// overestimate, in which case A* may return a suboptimal path.
///
/// # Examples
///
/// ```
/// use u_roadnet::graph::{planar_distance, Coordinate, METRES_PER_DEGREE};
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(1.0, 0.0).unwrap();
/// assert!((planar_distance(&a, &b) - METRES_PER_DEGREE).abs() < 1e-6);
/// ```
pub fn planar_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let (x1, y1) = a.planar_xy();
    let (x2, y2) = b.planar_xy();
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}
