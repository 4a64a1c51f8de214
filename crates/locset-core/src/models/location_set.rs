use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::feature::Feature;
use super::location::{Location, ValidatedLocation};

/// Include/exclude collection of locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationSet {
    #[serde(default)]
    pub include: Vec<Location>,
    #[serde(default)]
    pub exclude: Vec<Location>,
}

impl LocationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an included location
    pub fn include(mut self, location: impl Into<Location>) -> Self {
        self.include.push(location.into());
        self
    }

    /// Add an excluded location
    pub fn exclude(mut self, location: impl Into<Location>) -> Self {
        self.exclude.push(location.into());
        self
    }
}

/// A location set whose members passed validation
///
/// `include` and `exclude` hold the surviving members in id order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLocationSet {
    pub location_set: LocationSet,
    pub id: String,
    pub include: Vec<ValidatedLocation>,
    pub exclude: Vec<ValidatedLocation>,
}

impl ValidatedLocationSet {
    /// Sort both member lists and derive the set identifier
    ///
    /// The id is `+[include ids]`, followed by `-[exclude ids]` when anything
    /// is excluded. Members are combined by union, so ordering them cannot
    /// change the resolved geometry.
    pub fn new(
        location_set: LocationSet,
        mut include: Vec<ValidatedLocation>,
        mut exclude: Vec<ValidatedLocation>,
    ) -> Self {
        include.sort_by(|a, b| a.set_order(b));
        exclude.sort_by(|a, b| a.set_order(b));

        let mut id = format!("+{}", id_list(&include));
        if !exclude.is_empty() {
            id.push('-');
            id.push_str(&id_list(&exclude));
        }

        Self { location_set, id, include, exclude }
    }
}

fn id_list(locations: &[ValidatedLocation]) -> String {
    let ids: Vec<serde_json::Value> =
        locations.iter().map(|l| serde_json::Value::String(l.id.clone())).collect();
    serde_json::Value::Array(ids).to_string()
}

/// A location set together with its consolidated feature
#[derive(Debug, Clone)]
pub struct ResolvedLocationSet {
    pub validated: ValidatedLocationSet,
    pub feature: Arc<Feature>,
}

impl ResolvedLocationSet {
    pub fn id(&self) -> &str {
        &self.validated.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location::LocationKind;
    use proptest::prelude::*;

    fn region(id: &str) -> ValidatedLocation {
        ValidatedLocation::new(LocationKind::Region, Location::from(id), id)
    }

    #[test]
    fn test_location_set_builder() {
        let set = LocationSet::new().include("de").include([0.0, 0.0]).exclude(250_i64);
        assert_eq!(set.include.len(), 2);
        assert_eq!(set.exclude.len(), 1);
    }

    #[test]
    fn test_location_set_deserialize_defaults() {
        let set: LocationSet = serde_json::from_str(r#"{"include": ["us"]}"#).unwrap();
        assert_eq!(set.include.len(), 1);
        assert!(set.exclude.is_empty());

        let empty: LocationSet = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, LocationSet::default());
    }

    #[test]
    fn test_id_without_excludes() {
        let validated =
            ValidatedLocationSet::new(LocationSet::new(), vec![region("Q30"), region("Q16")], vec![]);
        assert_eq!(validated.id, r#"+["Q16","Q30"]"#);
    }

    #[test]
    fn test_id_with_excludes() {
        let point = ValidatedLocation::point(&[0.0, 0.0, 10.0]).unwrap();
        let validated =
            ValidatedLocationSet::new(LocationSet::new(), vec![point], vec![region("Q1")]);
        assert_eq!(validated.id, r#"+["[0,0,10]"]-["Q1"]"#);
    }

    proptest! {
        #[test]
        fn prop_id_ignores_input_order(
            ids in prop::sample::subsequence(vec!["Q1", "Q30", "Q183", "Q2"], 1..4)
                .prop_shuffle(),
        ) {
            let shuffled = ValidatedLocationSet::new(
                LocationSet::new(),
                ids.iter().map(|id| region(id)).collect(),
                vec![],
            );
            let mut sorted_ids = ids.clone();
            sorted_ids.sort();
            let sorted = ValidatedLocationSet::new(
                LocationSet::new(),
                sorted_ids.iter().map(|id| region(id)).collect(),
                vec![],
            );

            prop_assert_eq!(shuffled.id, sorted.id);
        }
    }
}
