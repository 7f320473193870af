//! Drawn-geometry ingestion
//!
//! The drawing layer hands over GeoJSON geometries whose coordinates are
//! `[lon, lat]` pairs. Everything is validated and swapped to [`Position`]
//! (lat, lon) here, before any distance or bearing is computed.

use crate::error::Result;
use crate::types::Position;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw `[lon, lat]` pair as it arrives from the drawing layer
pub type LonLat = [f64; 2];

/// A drawn feature's geometry
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "coordinates"))]
pub enum DrawnGeometry {
    Point(LonLat),
    LineString(Vec<LonLat>),
    Polygon(Vec<Vec<LonLat>>),
}

impl DrawnGeometry {
    pub fn kind(&self) -> &'static str {
        match self {
            DrawnGeometry::Point(_) => "Point",
            DrawnGeometry::LineString(_) => "LineString",
            DrawnGeometry::Polygon(_) => "Polygon",
        }
    }

    /// Validate every coordinate and, for LineStrings, return the path in
    /// (lat, lon) order. Points and polygons are not route legs.
    pub fn into_route_path(self) -> Result<Option<Vec<Position>>> {
        match self {
            DrawnGeometry::LineString(coords) => {
                let path = coords
                    .into_iter()
                    .map(Position::from_lon_lat)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(path))
            }
            DrawnGeometry::Point(pair) => {
                Position::from_lon_lat(pair)?;
                Ok(None)
            }
            DrawnGeometry::Polygon(rings) => {
                for pair in rings.into_iter().flatten() {
                    Position::from_lon_lat(pair)?;
                }
                Ok(None)
            }
        }
    }
}

#[cfg(feature = "json")]
mod geojson {
    use super::DrawnGeometry;
    use crate::error::Result;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Feature {
        geometry: Option<DrawnGeometry>,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Document {
        Collection { features: Vec<Feature> },
        Features(Vec<Feature>),
        Single(Feature),
    }

    /// Parse saved drawings: a FeatureCollection, a bare array of Features
    /// (what the map's draw plugin reports), or a single Feature
    ///
    /// Features with a null geometry are skipped.
    pub fn parse_drawings(json: &str) -> Result<Vec<DrawnGeometry>> {
        let features = match serde_json::from_str::<Document>(json)? {
            Document::Collection { features } | Document::Features(features) => features,
            Document::Single(feature) => vec![feature],
        };
        Ok(features.into_iter().filter_map(|f| f.geometry).collect())
    }
}

#[cfg(feature = "json")]
pub use geojson::parse_drawings;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linestring_is_swapped_to_lat_lon() {
        let geometry = DrawnGeometry::LineString(vec![[-95.0, 29.5], [-94.9, 29.55]]);
        let path = geometry.into_route_path().unwrap().unwrap();
        assert_eq!(
            path,
            vec![Position::new(29.5, -95.0), Position::new(29.55, -94.9)]
        );
    }

    #[test]
    fn test_points_and_polygons_are_not_legs() {
        assert_eq!(
            DrawnGeometry::Point([-95.0, 29.5]).into_route_path().unwrap(),
            None
        );
        let polygon = DrawnGeometry::Polygon(vec![vec![
            [-95.0, 29.5],
            [-94.9, 29.5],
            [-94.9, 29.6],
            [-95.0, 29.5],
        ]]);
        assert_eq!(polygon.into_route_path().unwrap(), None);
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        // lat/lon given in the wrong order: 120 is not a latitude
        let geometry = DrawnGeometry::LineString(vec![[29.5, -95.0], [29.55, 120.0]]);
        assert!(geometry.into_route_path().is_err());
        assert!(DrawnGeometry::Point([f64::NAN, 0.0]).into_route_path().is_err());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_parse_feature_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "LineString", "coordinates": [[-95.0, 29.5], [-94.9, 29.55]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Point", "coordinates": [-95.0, 29.5]}},
                {"type": "Feature", "properties": {}, "geometry": null}
            ]
        }"#;
        let drawings = parse_drawings(json).unwrap();
        assert_eq!(drawings.len(), 2);
        assert_eq!(drawings[0].kind(), "LineString");
        assert_eq!(drawings[1], DrawnGeometry::Point([-95.0, 29.5]));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_parse_bare_feature_array() {
        let json = r#"[{"type": "Feature",
            "geometry": {"type": "LineString", "coordinates": [[-95.0, 29.5], [-94.9, 29.55]]}}]"#;
        let drawings = parse_drawings(json).unwrap();
        assert_eq!(
            drawings,
            vec![DrawnGeometry::LineString(vec![[-95.0, 29.5], [-94.9, 29.55]])]
        );
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(parse_drawings("{not json").is_err());
    }
}
