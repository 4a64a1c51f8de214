use locset_core::error::{LocsetError, Result};
use locset_core::models::{
    Feature, Location, LocationKind, LocationSet, ResolvedLocation, ResolvedLocationSet,
    ValidatedLocation, ValidatedLocationSet,
};
use locset_core::ports::BoundaryProvider;
use locset_core::WORLD_ID;
use locset_geo::{area_km2, difference, union};

use crate::engine::LocationConflation;

impl<B> LocationConflation<B>
where
    B: BoundaryProvider,
{
    /// Validate every member of a location set and derive the set id
    ///
    /// With nothing left to include, strict mode fails with
    /// `EmptyLocationSet` and lenient mode includes the whole world instead.
    pub fn validate_location_set(&self, set: &LocationSet) -> Result<Option<ValidatedLocationSet>> {
        let mut include = self.validate_all(&set.include)?;
        let exclude = self.validate_all(&set.exclude)?;
        let mut location_set = set.clone();

        if include.is_empty() {
            if self.options.strict {
                return Err(LocsetError::EmptyLocationSet);
            }
            tracing::debug!("no valid includes, falling back to the world");
            let world = Location::from(WORLD_ID);
            location_set.include = vec![world.clone()];
            include.push(ValidatedLocation::new(LocationKind::Region, world, WORLD_ID));
        }

        Ok(Some(ValidatedLocationSet::new(location_set, include, exclude)))
    }

    /// Resolve a location set into one feature: union of the includes minus
    /// the union of the excludes
    ///
    /// A set with a single include and nothing excluded resolves to that
    /// include's own feature. Other results are cached under the set id.
    pub fn resolve_location_set(&mut self, set: &LocationSet) -> Result<Option<ResolvedLocationSet>> {
        let Some(validated) = self.validate_location_set(set)? else {
            return Ok(None);
        };

        if let Some(feature) = self.cached(&validated.id) {
            tracing::debug!(id = %validated.id, "cache hit");
            return Ok(Some(ResolvedLocationSet { validated, feature }));
        }

        let includes = self.resolve_all(&validated.include)?;
        let excludes = self.resolve_all(&validated.exclude)?;

        if let ([only], []) = (includes.as_slice(), excludes.as_slice()) {
            let feature = std::sync::Arc::clone(&only.feature);
            return Ok(Some(ResolvedLocationSet { validated, feature }));
        }

        let include_geometries: Vec<_> = includes.iter().map(|r| &r.feature.geometry).collect();
        let Some(mut geometry) = union(&include_geometries) else {
            return self.reject(LocsetError::unresolved(validated.id));
        };

        let exclude_geometries: Vec<_> = excludes.iter().map(|r| &r.feature.geometry).collect();
        if let Some(excluded) = union(&exclude_geometries) {
            geometry = difference(&geometry, &excluded);
        }

        let area = area_km2(&geometry);
        tracing::debug!(
            id = %validated.id,
            includes = includes.len(),
            excludes = excludes.len(),
            area,
            "conflated location set"
        );

        let feature = self.insert(Feature::new(validated.id.clone(), area, geometry));
        Ok(Some(ResolvedLocationSet { validated, feature }))
    }

    fn validate_all(&self, locations: &[Location]) -> Result<Vec<ValidatedLocation>> {
        locations
            .iter()
            .map(|location| self.validate_location(location))
            .filter_map(Result::transpose)
            .collect()
    }

    fn resolve_all(&mut self, locations: &[ValidatedLocation]) -> Result<Vec<ResolvedLocation>> {
        let mut resolved = Vec::with_capacity(locations.len());
        for location in locations {
            if let Some(location) = self.resolve_validated(location.clone())? {
                resolved.push(location);
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticBoundaries;
    use std::sync::Arc;

    #[test]
    fn test_empty_set_strict_fails() {
        let engine = LocationConflation::new(StaticBoundaries::new());
        let result = engine.validate_location_set(&LocationSet::new());
        assert!(matches!(result, Err(LocsetError::EmptyLocationSet)));
    }

    #[test]
    fn test_empty_set_lenient_is_world() {
        let mut engine = LocationConflation::new(StaticBoundaries::new());
        engine.set_strict(false);

        let validated = engine
            .validate_location_set(&LocationSet::new().include("nowhere"))
            .unwrap()
            .unwrap();
        assert_eq!(validated.id, r#"+["Q2"]"#);
        assert_eq!(validated.location_set.include, vec![Location::from("Q2")]);

        let resolved = engine.resolve_location_set(&LocationSet::new()).unwrap().unwrap();
        assert_eq!(resolved.id(), r#"+["Q2"]"#);
        assert!(Arc::ptr_eq(&resolved.feature, &engine.cached("Q2").unwrap()));
    }

    #[test]
    fn test_single_include_is_fast_path() {
        let mut engine = LocationConflation::new(StaticBoundaries::new());
        let point = engine.resolve_location(&Location::point(5.0, 5.0)).unwrap().unwrap();
        let len = engine.cache_len();

        let set = engine
            .resolve_location_set(&LocationSet::new().include([5.0, 5.0]))
            .unwrap()
            .unwrap();
        assert!(Arc::ptr_eq(&set.feature, &point.feature));
        assert_eq!(set.id(), r#"+["[5,5]"]"#);
        assert_eq!(engine.cache_len(), len);
    }

    #[test]
    fn test_set_results_are_cached() {
        let mut engine = LocationConflation::new(StaticBoundaries::new());
        let set = LocationSet::new().include([0.0, 0.0]).include([1.0, 0.0]);

        let first = engine.resolve_location_set(&set).unwrap().unwrap();
        let second = engine.resolve_location_set(&set).unwrap().unwrap();

        assert!(Arc::ptr_eq(&first.feature, &second.feature));
        assert_eq!(first.feature.id, r#"+["[0,0]","[1,0]"]"#);
        assert_eq!(first.feature.properties.id, first.feature.id);
        assert!(engine.cached(first.id()).is_some());
    }
}
