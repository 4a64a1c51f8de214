//! In-memory boundary provider backed by a GeoJSON FeatureCollection.
//!
//! Each region is stored once and indexed under every code it answers to.
//! Lookups normalize the requested code the same way the index keys were
//! normalized: integers are zero-padded to three digits (M49 and ISO numeric
//! codes), strings are trimmed and upper-cased.

use geojson::{feature::Id, FeatureCollection};
use locset_core::error::{LocsetError, Result};
use locset_core::models::{Geometry, RegionCode};
use locset_core::ports::{BoundaryFeature, BoundaryProvider};
use serde_json::Value;
use std::collections::HashMap;

use crate::named::parse_feature_collection;

/// Single-valued code properties
const CODE_KEYS: [&str; 6] = ["wikidata", "iso1A2", "iso1A3", "iso1N3", "m49", "ccTLD"];

/// Normalize a region code into its lookup key
pub fn normalize_code(code: &RegionCode) -> Option<String> {
    match code {
        RegionCode::Numeric(n) if *n >= 0 => Some(format!("{:03}", n)),
        RegionCode::Numeric(_) => None,
        RegionCode::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else if s.chars().all(|c| c.is_ascii_digit()) && s.len() < 3 {
                Some(format!("{:0>3}", s))
            } else {
                Some(s.to_uppercase())
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticBoundaries {
    features: Vec<BoundaryFeature>,
    index: HashMap<String, usize>,
}

impl StaticBoundaries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_features(features: Vec<BoundaryFeature>) -> Self {
        let mut boundaries = Self::new();
        for feature in features {
            boundaries.insert(feature);
        }
        boundaries
    }

    /// Add a region, replacing any region with the same id
    ///
    /// An id always points at its own region. Other codes keep pointing at
    /// the first region that claimed them.
    pub fn insert(&mut self, feature: BoundaryFeature) {
        let id_key = normalize_code(&RegionCode::from(feature.id.as_str()));

        let slot = match id_key.as_ref().and_then(|key| self.index.get(key)) {
            Some(&slot) if self.features[slot].id == feature.id => {
                self.features[slot] = feature;
                slot
            }
            _ => {
                self.features.push(feature);
                self.features.len() - 1
            }
        };

        if let Some(key) = id_key {
            self.index.insert(key, slot);
        }
        let codes: Vec<String> = self.features[slot]
            .codes
            .iter()
            .filter_map(|code| normalize_code(&RegionCode::from(code.as_str())))
            .collect();
        for key in codes {
            self.index.entry(key).or_insert(slot);
        }
    }

    /// Build a provider from region features
    ///
    /// The region id is taken from `properties.wikidata`, the feature id or
    /// `properties.id`, in that order. Features without one are skipped.
    pub fn from_feature_collection(collection: &FeatureCollection) -> Result<Self> {
        let mut boundaries = Self::new();

        for source in &collection.features {
            let properties = source.properties.clone().unwrap_or_default();
            let Some(id) = region_id(source, &properties) else {
                tracing::warn!("skipping boundary feature without an id");
                continue;
            };
            boundaries.insert(boundary_feature(id, source, properties)?);
        }

        tracing::info!(regions = boundaries.len(), "loaded boundaries");
        Ok(boundaries)
    }

    /// Parse GeoJSON text and build a provider from it
    pub fn from_geojson_str(content: &str) -> Result<Self> {
        Self::from_feature_collection(&parse_feature_collection(content)?)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundaryFeature> {
        self.features.iter()
    }
}

impl BoundaryProvider for StaticBoundaries {
    fn feature_by_code(&self, code: &RegionCode) -> Option<&BoundaryFeature> {
        let key = normalize_code(code)?;
        self.index.get(&key).map(|&slot| &self.features[slot])
    }
}

fn region_id(source: &geojson::Feature, properties: &serde_json::Map<String, Value>) -> Option<String> {
    if let Some(id) = properties.get("wikidata").and_then(Value::as_str) {
        return Some(id.to_string());
    }
    match &source.id {
        Some(Id::String(s)) => Some(s.clone()),
        Some(Id::Number(n)) => Some(n.to_string()),
        None => properties.get("id").and_then(Value::as_str).map(str::to_string),
    }
}

fn code_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(code_string).collect())
        .unwrap_or_default()
}

fn boundary_feature(
    id: String,
    source: &geojson::Feature,
    properties: serde_json::Map<String, Value>,
) -> Result<BoundaryFeature> {
    let geometry = source
        .geometry
        .as_ref()
        .map(|g| Geometry::try_from(&g.value))
        .transpose()
        .map_err(|e| match e {
            LocsetError::InvalidGeometry { reason, .. } => {
                LocsetError::InvalidGeometry { feature_id: id.clone(), reason }
            }
            other => other,
        })?;

    let mut codes: Vec<String> =
        CODE_KEYS.iter().filter_map(|key| properties.get(*key).and_then(code_string)).collect();
    codes.extend(string_list(properties.get("aliases")));

    Ok(BoundaryFeature {
        codes,
        geometry,
        members: string_list(properties.get("members")),
        area: properties.get("area").and_then(Value::as_f64),
        properties,
        id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "wikidata": "Q183",
                    "nameEn": "Germany",
                    "iso1A2": "DE",
                    "iso1A3": "DEU",
                    "iso1N3": "276",
                    "m49": "276",
                    "ccTLD": ".de",
                    "aliases": ["GER"]
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[5, 47], [15, 47], [15, 55], [5, 55], [5, 47]]]
                }
            },
            {
                "type": "Feature",
                "properties": {
                    "wikidata": "Q46",
                    "nameEn": "Europe",
                    "m49": "150",
                    "members": ["Q183"]
                },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "nameEn": "Nowhere" },
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(&RegionCode::from(4_i64)), Some("004".to_string()));
        assert_eq!(normalize_code(&RegionCode::from(276_i64)), Some("276".to_string()));
        assert_eq!(normalize_code(&RegionCode::from("  de ")), Some("DE".to_string()));
        assert_eq!(normalize_code(&RegionCode::from("4")), Some("004".to_string()));
        assert_eq!(normalize_code(&RegionCode::from("q183")), Some("Q183".to_string()));
        assert_eq!(normalize_code(&RegionCode::from("")), None);
        assert_eq!(normalize_code(&RegionCode::from(-1_i64)), None);
    }

    #[test]
    fn test_load_from_geojson() {
        let boundaries = StaticBoundaries::from_geojson_str(BOUNDARIES).unwrap();
        assert_eq!(boundaries.len(), 2);

        for code in ["de", "DEU", "276", ".DE", "ger", "Q183"] {
            let feature = boundaries.feature_by_code(&RegionCode::from(code)).unwrap();
            assert_eq!(feature.id, "Q183", "lookup by {}", code);
        }
        let by_number = boundaries.feature_by_code(&RegionCode::from(276_i64)).unwrap();
        assert_eq!(by_number.id, "Q183");

        let europe = boundaries.feature_by_code(&RegionCode::from(150_i64)).unwrap();
        assert!(europe.is_composite());
        assert!(europe.geometry.is_none());
        assert_eq!(europe.members, vec!["Q183".to_string()]);
        assert_eq!(europe.properties["nameEn"], "Europe");
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let square = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 0.0],
        ]]);
        let mut boundaries = StaticBoundaries::from_features(vec![
            BoundaryFeature::new("Q1", square.clone()).with_codes(["AA"]),
        ]);
        boundaries.insert(BoundaryFeature::new("Q1", square).with_codes(["BB"]));

        assert_eq!(boundaries.len(), 1);
        assert!(boundaries.feature_by_id("Q1").is_some());
        assert!(boundaries.feature_by_code(&RegionCode::from("bb")).is_some());
    }

    #[test]
    fn test_non_areal_geometry_is_rejected() {
        let content = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "wikidata": "Q9" },
                "geometry": { "type": "Point", "coordinates": [0, 0] }
            }]
        }"#;
        match StaticBoundaries::from_geojson_str(content) {
            Err(LocsetError::InvalidGeometry { feature_id, .. }) => assert_eq!(feature_id, "Q9"),
            other => panic!("expected InvalidGeometry, got {:?}", other),
        }
    }
}
