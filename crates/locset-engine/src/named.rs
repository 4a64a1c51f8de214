//! Loading of named geometries (`<name>.geojson`) from a FeatureCollection.

use geojson::{feature::Id, FeatureCollection, GeoJson};
use locset_core::error::{LocsetError, Result};
use locset_core::models::{is_named_geometry_id, Feature, Geometry};
use locset_geo::{area_km2, ensure_valid};

/// Parse GeoJSON text that must be a FeatureCollection
pub fn parse_feature_collection(content: &str) -> Result<FeatureCollection> {
    let geojson: GeoJson = content.parse().map_err(|e| {
        LocsetError::Serialization(format!("Failed to parse GeoJSON: {}", e))
    })?;

    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        _ => Err(LocsetError::Serialization(
            "Expected a GeoJSON FeatureCollection".to_string(),
        )),
    }
}

/// Convert every usable feature of `collection` into a named feature
///
/// Features without a `<name>.geojson` id are skipped. Features with a bad
/// geometry fail the load when `strict`, and are skipped otherwise.
pub(crate) fn load_named_features(
    collection: &FeatureCollection,
    strict: bool,
) -> Result<Vec<Feature>> {
    let mut features = Vec::with_capacity(collection.features.len());

    for (idx, source) in collection.features.iter().enumerate() {
        let Some(id) = feature_id(source) else {
            tracing::warn!(index = idx, "skipping feature without a .geojson id");
            continue;
        };

        match named_feature(&id, source) {
            Ok(feature) => features.push(feature),
            Err(error) if strict => return Err(error),
            Err(error) => tracing::warn!(%id, %error, "skipping named feature"),
        }
    }

    Ok(features)
}

/// The lower-cased feature id, taken from `id` or `properties.id`
fn feature_id(source: &geojson::Feature) -> Option<String> {
    let id = match &source.id {
        Some(Id::String(s)) => Some(s.clone()),
        Some(Id::Number(n)) => Some(n.to_string()),
        None => source.property("id").and_then(|v| v.as_str()).map(str::to_string),
    }?;

    is_named_geometry_id(&id).then(|| id.to_lowercase())
}

fn named_feature(id: &str, source: &geojson::Feature) -> Result<Feature> {
    let geometry = source
        .geometry
        .as_ref()
        .ok_or_else(|| LocsetError::InvalidGeometry {
            feature_id: id.to_string(),
            reason: "Feature has no geometry".to_string(),
        })
        .and_then(|g| Geometry::try_from(&g.value))
        .map_err(|e| match e {
            LocsetError::InvalidGeometry { reason, .. } => LocsetError::InvalidGeometry {
                feature_id: id.to_string(),
                reason,
            },
            other => other,
        })?;

    ensure_valid(&geometry, id)?;

    let properties = source.properties.clone().unwrap_or_default();
    let area = properties
        .get("area")
        .and_then(|v| v.as_f64())
        .filter(|area| *area > 0.0)
        .unwrap_or_else(|| area_km2(&geometry));

    Ok(Feature::new(id, area, geometry).with_extra(properties))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "Philly_Metro.GEOJSON",
                "properties": { "name": "Philadelphia" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-76, 39], [-74, 39], [-74, 41], [-76, 41], [-76, 39]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "id": "fixed.geojson", "area": 42.0 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
                }
            },
            {
                "type": "Feature",
                "id": "not-named",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
                }
            }
        ]
    }"#;

    #[test]
    fn test_load_named_features() {
        let collection = parse_feature_collection(COLLECTION).unwrap();
        let features = load_named_features(&collection, true).unwrap();

        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, "philly_metro.geojson");
        assert_eq!(features[0].properties.id, "philly_metro.geojson");
        assert!(features[0].area() > 0.0);
        assert_eq!(features[0].properties.extra["name"], "Philadelphia");

        assert_eq!(features[1].id, "fixed.geojson");
        assert_eq!(features[1].area(), 42.0);
        assert!(!features[1].properties.extra.contains_key("id"));
    }

    #[test]
    fn test_invalid_geometry_strict_vs_lenient() {
        let content = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": "line.geojson",
                "properties": {},
                "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
            }]
        }"#;
        let collection = parse_feature_collection(content).unwrap();

        match load_named_features(&collection, true) {
            Err(LocsetError::InvalidGeometry { feature_id, .. }) => {
                assert_eq!(feature_id, "line.geojson")
            }
            other => panic!("expected InvalidGeometry, got {:?}", other),
        }
        assert!(load_named_features(&collection, false).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_collections() {
        let single = r#"{"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}"#;
        assert!(parse_feature_collection(single).is_err());
        assert!(parse_feature_collection("not json").is_err());
    }
}
