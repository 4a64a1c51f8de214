//! Union and difference over canonical geometries.
//!
//! The clipping itself is `geo`'s `BooleanOps`; this module only adapts
//! inputs and outputs. Results come back as a bare list of polygons with no
//! type tag, so [`classify`] decides the GeoJSON type from how deeply the
//! rings are nested.

use geo::{BooleanOps, MultiPolygon};

use crate::models::{from_geo_multi_polygon, to_geo_multi_polygon, Geometry, PolygonCoords};

/// Set operation applied across a list of geometries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipOperation {
    /// Everything covered by any input
    Union,
    /// The first input minus every following input
    Difference,
}

/// Apply `operation` across `geometries`; `None` for an empty list
pub fn clip(geometries: &[&Geometry], operation: ClipOperation) -> Option<Geometry> {
    let (first, rest) = geometries.split_first()?;
    let subject = to_geo_multi_polygon(first);

    let result = match operation {
        ClipOperation::Union => {
            // Unioning with nothing still dissolves borders inside `subject`
            let seed = subject.union(&MultiPolygon::<f64>::new(vec![]));
            rest.iter().fold(seed, |acc, geom| acc.union(&to_geo_multi_polygon(geom)))
        }
        ClipOperation::Difference => rest
            .iter()
            .fold(subject, |acc, geom| acc.difference(&to_geo_multi_polygon(geom))),
    };

    tracing::trace!(
        inputs = geometries.len(),
        polygons = result.0.len(),
        ?operation,
        "clipped geometries"
    );

    Some(from_geo_multi_polygon(&result))
}

/// Union all geometries into one
pub fn union(geometries: &[&Geometry]) -> Option<Geometry> {
    clip(geometries, ClipOperation::Union)
}

/// `subject` minus `clipping`
pub fn difference(subject: &Geometry, clipping: &Geometry) -> Geometry {
    let result = to_geo_multi_polygon(subject).difference(&to_geo_multi_polygon(clipping));
    from_geo_multi_polygon(&result)
}

/// Pick the GeoJSON type for an untagged polygon list
///
/// One polygon nests its rings two levels deep and is a `Polygon`; several
/// polygons (or none) nest three levels deep and form a `MultiPolygon`.
pub fn classify(mut polygons: Vec<PolygonCoords>) -> Geometry {
    if polygons.len() == 1 {
        Geometry::polygon(polygons.remove(0))
    } else {
        Geometry::multi_polygon(polygons)
    }
}
