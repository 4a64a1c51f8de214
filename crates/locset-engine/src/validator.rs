use locset_core::error::{LocsetError, Result};
use locset_core::models::{
    is_named_geometry_id, Location, LocationKind, RegionCode, ValidatedLocation,
};
use locset_core::ports::BoundaryProvider;
use locset_core::WORLD_ID;

use crate::engine::LocationConflation;

impl<B> LocationConflation<B>
where
    B: BoundaryProvider,
{
    /// Check a location and compute its canonical id
    ///
    /// Returns `Ok(None)` for an invalid location in lenient mode.
    pub fn validate_location(&self, location: &Location) -> Result<Option<ValidatedLocation>> {
        let validated = match location {
            Location::Point(coords) => ValidatedLocation::point(coords),
            Location::Named(name) => self.validate_named(location, name),
            Location::Region(code) => self.validate_region(location, code),
            Location::Unsupported(_) => None,
        };

        match validated {
            Some(validated) => Ok(Some(validated)),
            None => self.reject(LocsetError::invalid_location(location)),
        }
    }

    fn validate_named(&self, location: &Location, name: &str) -> Option<ValidatedLocation> {
        if !is_named_geometry_id(name) {
            return None;
        }

        let id = name.to_lowercase();
        self.named
            .contains_key(&id)
            .then(|| ValidatedLocation::new(LocationKind::Named, location.clone(), id))
    }

    fn validate_region(&self, location: &Location, code: &RegionCode) -> Option<ValidatedLocation> {
        let id = match self.boundaries.feature_by_code(code) {
            Some(feature) => feature.id.clone(),
            None if is_world(code) => WORLD_ID.to_string(),
            None => return None,
        };

        Some(ValidatedLocation::new(LocationKind::Region, location.clone(), id))
    }
}

fn is_world(code: &RegionCode) -> bool {
    matches!(code, RegionCode::Text(s) if s.trim().eq_ignore_ascii_case(WORLD_ID))
        || matches!(code, RegionCode::Numeric(1))
}
