//! Canonical polygon geometry types used across all locset crates.
//!
//! These types provide a bridge between GeoJSON serialization and the
//! computational geo crate types. Only areal geometries are modelled: every
//! resolved location is a Polygon or a MultiPolygon.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LocsetError, Result};

/// A `[lon, lat]` coordinate pair
pub type Position = [f64; 2];

/// A closed linear ring
pub type Ring = Vec<Position>;

/// Polygon coordinates: exterior ring followed by any holes
pub type PolygonCoords = Vec<Ring>;

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GeometryType {
    #[default]
    Polygon,
    MultiPolygon,
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryType::Polygon => write!(f, "Polygon"),
            GeometryType::MultiPolygon => write!(f, "MultiPolygon"),
        }
    }
}

/// GeoJSON-compatible areal geometry
///
/// Serializes exactly as a GeoJSON geometry object with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: PolygonCoords },
    MultiPolygon { coordinates: Vec<PolygonCoords> },
}

impl Geometry {
    /// Create a Polygon geometry
    pub fn polygon(rings: PolygonCoords) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Create a MultiPolygon geometry
    pub fn multi_polygon(polygons: Vec<PolygonCoords>) -> Self {
        Geometry::MultiPolygon { coordinates: polygons }
    }

    /// Rectangle covering the whole lon/lat domain
    pub fn world() -> Self {
        Geometry::polygon(vec![vec![
            [-180.0, -90.0],
            [180.0, -90.0],
            [180.0, 90.0],
            [-180.0, 90.0],
            [-180.0, -90.0],
        ]])
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// Number of polygons in this geometry
    pub fn polygon_count(&self) -> usize {
        match self {
            Geometry::Polygon { .. } => 1,
            Geometry::MultiPolygon { coordinates } => coordinates.len(),
        }
    }

    /// True when the geometry carries no rings at all
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Polygon { coordinates } => coordinates.is_empty(),
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().all(|polygon| polygon.is_empty())
            }
        }
    }

    /// Borrow every polygon's rings, regardless of variant
    pub fn polygons(&self) -> Vec<&PolygonCoords> {
        match self {
            Geometry::Polygon { coordinates } => vec![coordinates],
            Geometry::MultiPolygon { coordinates } => coordinates.iter().collect(),
        }
    }

    /// Apply `f` to every position in place
    pub fn for_each_position_mut(&mut self, mut f: impl FnMut(&mut Position)) {
        let polygons: Vec<&mut PolygonCoords> = match self {
            Geometry::Polygon { coordinates } => vec![coordinates],
            Geometry::MultiPolygon { coordinates } => coordinates.iter_mut().collect(),
        };
        for ring in polygons.into_iter().flatten() {
            ring.iter_mut().for_each(&mut f);
        }
    }
}

impl TryFrom<&geojson::Value> for Geometry {
    type Error = LocsetError;

    /// Copy a `geojson` crate geometry, dropping any elevation component.
    fn try_from(value: &geojson::Value) -> Result<Self> {
        match value {
            geojson::Value::Polygon(rings) => Ok(Geometry::polygon(copy_polygon(rings)?)),
            geojson::Value::MultiPolygon(polygons) => Ok(Geometry::multi_polygon(
                polygons.iter().map(|rings| copy_polygon(rings)).collect::<Result<_>>()?,
            )),
            other => Err(LocsetError::InvalidGeometry {
                feature_id: "unknown".to_string(),
                reason: format!("Unsupported geometry type {}", geojson_type_name(other)),
            }),
        }
    }
}

fn geojson_type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn copy_polygon(rings: &[Vec<Vec<f64>>]) -> Result<PolygonCoords> {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .map(|position| match position.as_slice() {
                    [x, y, ..] => Ok([*x, *y]),
                    _ => Err(LocsetError::InvalidGeometry {
                        feature_id: "unknown".to_string(),
                        reason: format!("Position needs two coordinates, found {}", position.len()),
                    }),
                })
                .collect()
        })
        .collect()
}
