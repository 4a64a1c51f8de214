use serde::{Deserialize, Serialize};

use super::geometry::Geometry;
use crate::error::{LocsetError, Result};

/// Properties carried by every resolved feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// Canonical identifier, mirrors `Feature::id`
    pub id: String,

    /// Approximate area in square kilometers, two decimals
    pub area: f64,

    /// Member region ids, present on composite regions only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,

    /// Any other properties from the source data
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A resolved GeoJSON Feature with areal geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub id: String,
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

impl Feature {
    /// Create a feature whose `properties` are just `{id, area}`
    pub fn new(id: impl Into<String>, area: f64, geometry: Geometry) -> Self {
        let id = id.into();
        Self {
            properties: FeatureProperties {
                id: id.clone(),
                area,
                members: None,
                extra: serde_json::Map::new(),
            },
            id,
            geometry,
        }
    }

    /// Attach additional source properties
    ///
    /// `id`, `area` and `members` are owned by the feature and never copied.
    pub fn with_extra(mut self, mut extra: serde_json::Map<String, serde_json::Value>) -> Self {
        for reserved in ["id", "area", "members"] {
            extra.remove(reserved);
        }
        self.properties.extra = extra;
        self
    }

    /// Attach the member list of a composite region
    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.properties.members = Some(members);
        self
    }

    /// Area in square kilometers
    pub fn area(&self) -> f64 {
        self.properties.area
    }

    /// Serialize as a GeoJSON string
    pub fn to_geojson_string(&self, pretty: bool) -> Result<String> {
        let result = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        result.map_err(|e| LocsetError::Serialization(format!("Failed to serialize feature: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Geometry {
        Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]])
    }

    #[test]
    fn test_feature_serializes_as_geojson() {
        let feature = Feature::new("[0,0]", 1963.5, square());
        let value = serde_json::to_value(&feature).unwrap();

        assert_eq!(value["type"], "Feature");
        assert_eq!(value["id"], "[0,0]");
        assert_eq!(value["properties"]["id"], "[0,0]");
        assert_eq!(value["properties"]["area"], 1963.5);
        assert!(value["properties"].get("members").is_none());
        assert_eq!(value["geometry"]["type"], "Polygon");
    }

    #[test]
    fn test_extra_properties_are_flattened() {
        let mut extra = serde_json::Map::new();
        extra.insert("nameEn".to_string(), serde_json::json!("Europe"));
        let feature = Feature::new("Q46", 1.0, square())
            .with_extra(extra)
            .with_members(vec!["Q183".to_string()]);

        let json = feature.to_geojson_string(false).unwrap();
        assert!(json.contains("\"nameEn\":\"Europe\""));
        assert!(json.contains("\"members\":[\"Q183\"]"));

        let parsed: Feature = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, feature);
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let feature = Feature::new("a.geojson", 2.0, square());
        let pretty = feature.to_geojson_string(true).unwrap();
        assert!(pretty.lines().count() > 1);
    }
}
