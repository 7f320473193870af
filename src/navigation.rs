//! Geodesic primitives
//!
//! Distances are measured on the WGS84 ellipsoid (Karney's method, through the
//! `geo` crate). Bearings are initial great-circle headings in degrees true.

use crate::conversion::meters_to_nm;
use crate::types::Position;
use geo::{GeodesicDistance, Point};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn to_point(position: Position) -> Point<f64> {
    // geo points are (x, y) = (lon, lat)
    Point::new(position.longitude, position.latitude)
}

/// Geodesic distance between two positions in nautical miles
pub fn distance_nm(a: Position, b: Position) -> f64 {
    if a == b {
        return 0.0;
    }
    meters_to_nm(to_point(a).geodesic_distance(&to_point(b)))
}

/// Initial great-circle bearing from `a` to `b`, normalized to [0, 360)
///
/// The reverse bearing is generally not `initial_bearing_deg(a, b) - 180`;
/// compute each direction separately.
pub fn initial_bearing_deg(a: Position, b: Position) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let x = delta_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    normalize_degrees(x.atan2(y).to_degrees())
}

/// Wrap any angle into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid of a tiny negative rounds up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Time en route at `speed_kts`; zero when the speed is not positive
pub fn eta_hours(distance_nm: f64, speed_kts: f64) -> f64 {
    if speed_kts > 0.0 {
        distance_nm / speed_kts
    } else {
        0.0
    }
}

/// Point-to-point course: distance, heading and time en route
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Course {
    pub distance_nm: f64,
    pub bearing_deg: f64,
    pub eta_hours: f64,
}

/// Plan a direct course from `from` to `to`
pub fn course(from: Position, to: Position, speed_kts: f64) -> Course {
    let distance = distance_nm(from, to);
    Course {
        distance_nm: distance,
        bearing_deg: initial_bearing_deg(from, to),
        eta_hours: eta_hours(distance, speed_kts),
    }
}
