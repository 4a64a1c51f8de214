//! Geometry models for locset-geo.
//!
//! This module re-exports canonical types from `locset-core` and provides
//! conversions to and from the `geo` crate.

use geo::algorithm::bounding_rect::BoundingRect;
use geo::{Coord, LineString, MultiPolygon, Polygon};

// Re-export canonical types from locset-core
pub use locset_core::models::{Geometry, GeometryType, PolygonCoords, Position, Ring};

fn to_geo_ring(ring: &Ring) -> LineString<f64> {
    LineString::new(ring.iter().map(|p| Coord { x: p[0], y: p[1] }).collect())
}

fn from_geo_ring(ring: &LineString<f64>) -> Ring {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

/// Convert canonical polygon rings to a geo::Polygon
pub fn to_geo_polygon(rings: &PolygonCoords) -> Polygon<f64> {
    match rings.split_first() {
        Some((exterior, interiors)) => {
            Polygon::new(to_geo_ring(exterior), interiors.iter().map(to_geo_ring).collect())
        }
        None => Polygon::new(LineString::new(vec![]), vec![]),
    }
}

/// Convert a geo::Polygon to canonical rings, exterior first
pub fn from_geo_polygon(polygon: &Polygon<f64>) -> PolygonCoords {
    let mut rings = Vec::with_capacity(1 + polygon.interiors().len());
    rings.push(from_geo_ring(polygon.exterior()));
    rings.extend(polygon.interiors().iter().map(from_geo_ring));
    rings
}

/// Convert any canonical geometry to a geo::MultiPolygon
///
/// Boolean operations run on MultiPolygons so both variants take the same path.
pub fn to_geo_multi_polygon(geom: &Geometry) -> MultiPolygon<f64> {
    MultiPolygon::new(geom.polygons().into_iter().map(to_geo_polygon).collect())
}

/// Convert a geo::MultiPolygon back to a canonical geometry
///
/// A single polygon comes back as `Polygon`, anything else as `MultiPolygon`.
pub fn from_geo_multi_polygon(multi: &MultiPolygon<f64>) -> Geometry {
    crate::clip::classify(multi.iter().map(from_geo_polygon).collect())
}

/// Extension trait for Geometry with geo-crate operations
pub trait GeometryExt {
    /// Convert to geo::MultiPolygon
    fn to_geo(&self) -> MultiPolygon<f64>;

    /// Bounding box as `[min_lon, min_lat, max_lon, max_lat]`
    fn bounding_box(&self) -> Option<[f64; 4]>;
}

impl GeometryExt for Geometry {
    fn to_geo(&self) -> MultiPolygon<f64> {
        to_geo_multi_polygon(self)
    }

    fn bounding_box(&self) -> Option<[f64; 4]> {
        self.to_geo()
            .bounding_rect()
            .map(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> PolygonCoords {
        vec![vec![[x, y], [x + size, y], [x + size, y + size], [x, y + size], [x, y]]]
    }

    #[test]
    fn test_polygon_roundtrip() {
        let geom = Geometry::polygon(square(0.0, 0.0, 1.0));
        let back = from_geo_multi_polygon(&to_geo_multi_polygon(&geom));
        assert_eq!(back, geom);
    }

    #[test]
    fn test_polygon_with_hole_keeps_interior() {
        let mut rings = square(0.0, 0.0, 10.0);
        rings.push(vec![[2.0, 2.0], [2.0, 4.0], [4.0, 4.0], [4.0, 2.0], [2.0, 2.0]]);
        let geo_polygon = to_geo_polygon(&rings);
        assert_eq!(geo_polygon.interiors().len(), 1);
        assert_eq!(from_geo_polygon(&geo_polygon).len(), 2);
    }

    #[test]
    fn test_multipolygon_stays_multi() {
        let geom = Geometry::multi_polygon(vec![square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)]);
        let back = from_geo_multi_polygon(&geom.to_geo());
        assert_eq!(back.geometry_type(), GeometryType::MultiPolygon);
        assert_eq!(back.polygon_count(), 2);
    }

    #[test]
    fn test_unclosed_ring_is_closed_by_geo() {
        let geom = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]);
        let back = from_geo_multi_polygon(&geom.to_geo());
        let ring = &back.polygons()[0][0];
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_bounding_box() {
        let geom = Geometry::multi_polygon(vec![square(0.0, 0.0, 1.0), square(5.0, -3.0, 1.0)]);
        assert_eq!(geom.bounding_box(), Some([0.0, -3.0, 6.0, 1.0]));
    }
}
