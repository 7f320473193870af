use crate::error::{ChartError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch
pub type Timestamp = u64;

/// WGS84 position in decimal degrees
///
/// Equality is exact; the track recorder relies on it to suppress repeated
/// fixes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a position, rejecting values outside the WGS84 range
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(ChartError::InvalidCoordinate {
                lat: latitude,
                lon: longitude,
            });
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Build a position from a GeoJSON-ordered `[lon, lat]` pair
    pub fn from_lon_lat(pair: [f64; 2]) -> Result<Self> {
        Self::checked(pair[1], pair[0])
    }

    pub fn as_lat_lon(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Harbour starting point used before the first GPS fix
pub const DEFAULT_POSITION: Position = Position::new(29.55, -94.9);

/// A position fix as delivered by the geolocation layer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fix {
    pub position: Position,
    pub timestamp: Timestamp,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64, timestamp: Timestamp) -> Self {
        Self {
            position: Position::new(latitude, longitude),
            timestamp,
        }
    }
}
