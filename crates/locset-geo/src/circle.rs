use geo::{Destination, Haversine, Point};

use crate::models::{Geometry, Ring};

/// Approximate a circle on the sphere with an `edges`-sided polygon
///
/// Vertices are placed by walking `radius_m` meters from the center at evenly
/// spaced bearings, counter-clockwise starting due north. The ring is closed.
///
/// Longitudes stay within 180° of the center, so a circle crossing the
/// antimeridian extends past ±180 instead of wrapping around the globe.
pub fn circle_polygon(lon: f64, lat: f64, radius_m: f64, edges: usize) -> Geometry {
    let center = Point::new(lon, lat);
    let edges = edges.max(3);

    let mut ring: Ring = (0..edges)
        .map(|i| {
            let bearing = -360.0 * i as f64 / edges as f64;
            let vertex = Haversine.destination(center, bearing, radius_m);
            [unwrap_longitude(vertex.x(), lon), vertex.y()]
        })
        .collect();
    ring.push(ring[0]);

    Geometry::polygon(vec![ring])
}

fn unwrap_longitude(x: f64, center_lon: f64) -> f64 {
    if x - center_lon > 180.0 {
        x - 360.0
    } else if x - center_lon < -180.0 {
        x + 360.0
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::area_km2;
    use geo::Distance;
    use proptest::prelude::*;

    #[test]
    fn test_ring_is_closed_with_expected_vertex_count() {
        let circle = circle_polygon(-75.0, 40.0, 25_000.0, 10);
        let ring = &circle.polygons()[0][0];

        assert_eq!(ring.len(), 11);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_vertices_lie_on_radius() {
        let circle = circle_polygon(10.0, 50.0, 100_000.0, 16);
        let center = Point::new(10.0, 50.0);

        for p in &circle.polygons()[0][0] {
            let d = Haversine.distance(center, Point::new(p[0], p[1]));
            assert!((d - 100_000.0).abs() < 1.0, "vertex {:?} is {} m away", p, d);
        }
    }

    #[test]
    fn test_first_vertex_is_north_and_winding_is_counter_clockwise() {
        let circle = circle_polygon(0.0, 0.0, 10_000.0, 4);
        let ring = &circle.polygons()[0][0];

        assert!(ring[0][1] > 0.0 && ring[0][0].abs() < 1e-9);
        // second vertex is west of center
        assert!(ring[1][0] < 0.0);
    }

    #[test]
    fn test_edge_count_has_a_floor() {
        let circle = circle_polygon(0.0, 0.0, 1_000.0, 1);
        assert_eq!(circle.polygons()[0][0].len(), 4);
    }

    #[test]
    fn test_circle_across_antimeridian_stays_local() {
        for lon in [179.95, -179.95] {
            let circle = circle_polygon(lon, 0.0, 25_000.0, 10);
            let ring = &circle.polygons()[0][0];

            let min = ring.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
            let max = ring.iter().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);
            assert!(max - min < 1.0, "ring spans {} to {}", min, max);

            let area = area_km2(&circle);
            assert!(area > 1_700.0 && area < 2_000.0, "got {}", area);
        }
    }

    proptest! {
        #[test]
        fn prop_ring_is_closed(
            lon in -170.0f64..170.0,
            lat in -80.0f64..80.0,
            radius_m in 100.0f64..500_000.0,
            edges in 3usize..64,
        ) {
            let circle = circle_polygon(lon, lat, radius_m, edges);
            let ring = &circle.polygons()[0][0];

            prop_assert_eq!(ring.len(), edges + 1);
            prop_assert_eq!(ring.first(), ring.last());
        }
    }
}
