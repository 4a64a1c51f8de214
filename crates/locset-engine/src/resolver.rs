use locset_core::error::{LocsetError, Result};
use locset_core::models::{
    Circle, Feature, Location, LocationKind, RegionCode, ResolvedLocation, ValidatedLocation,
};
use locset_core::ports::BoundaryProvider;
use locset_geo::{area_km2, circle_area_km2, circle_polygon, round_positions, union};
use std::sync::Arc;

use crate::engine::LocationConflation;

impl<B> LocationConflation<B>
where
    B: BoundaryProvider,
{
    /// Validate a location and resolve it to a polygon feature
    ///
    /// Resolved features are cached by id, so resolving the same location
    /// twice hands back the same `Arc`.
    pub fn resolve_location(&mut self, location: &Location) -> Result<Option<ResolvedLocation>> {
        match self.validate_location(location)? {
            Some(validated) => self.resolve_validated(validated),
            None => Ok(None),
        }
    }

    pub(crate) fn resolve_validated(
        &mut self,
        validated: ValidatedLocation,
    ) -> Result<Option<ResolvedLocation>> {
        if let Some(feature) = self.cached(&validated.id) {
            tracing::debug!(id = %validated.id, "cache hit");
            return Ok(Some(ResolvedLocation { validated, feature }));
        }
        tracing::debug!(id = %validated.id, kind = validated.kind.name(), "cache miss");

        let feature = match validated.kind {
            LocationKind::Point(circle) => {
                let feature = self.circle_feature(&validated.id, circle);
                Some(self.insert(feature))
            }
            // Named geometries are cached when loaded
            LocationKind::Named => None,
            LocationKind::Region => self.region_feature(&validated.id, &mut Vec::new()),
        };

        match feature {
            Some(feature) => Ok(Some(ResolvedLocation { validated, feature })),
            None => self.reject(LocsetError::unresolved(validated.id)),
        }
    }

    fn circle_feature(&self, id: &str, circle: Circle) -> Feature {
        let radius_km = circle.radius_km.unwrap_or(self.options.default_radius_km);
        let mut geometry =
            circle_polygon(circle.lon, circle.lat, radius_km * 1000.0, self.options.circle_edges);
        round_positions(&mut geometry, self.options.precision);

        Feature::new(id, circle_area_km2(radius_km), geometry)
    }

    /// Build the feature for a region id, aggregating composites
    ///
    /// Members are resolved through the shared cache. `visiting` holds the
    /// composites currently being built so a cyclic membership ends instead
    /// of recursing forever.
    fn region_feature(&mut self, id: &str, visiting: &mut Vec<String>) -> Option<Arc<Feature>> {
        if let Some(feature) = self.cached(id) {
            return Some(feature);
        }
        if visiting.iter().any(|v| v == id) {
            tracing::warn!(%id, "cyclic region membership");
            return None;
        }

        let Some(source) = self.boundaries.feature_by_id(id).cloned() else {
            tracing::warn!(%id, "region missing from boundary provider");
            return None;
        };

        if !source.is_composite() {
            let geometry = source.geometry?;
            let area = source.area.unwrap_or_else(|| area_km2(&geometry));
            let feature = Feature::new(id, area, geometry).with_extra(source.properties);
            return Some(self.insert(feature));
        }

        visiting.push(id.to_string());
        let mut member_ids = Vec::with_capacity(source.members.len());
        let mut parts = Vec::with_capacity(source.members.len());
        for code in &source.members {
            let member_id = self
                .boundaries
                .feature_by_code(&RegionCode::from(code.as_str()))
                .map(|member| member.id.clone());

            match member_id.and_then(|member_id| {
                let part = self.region_feature(&member_id, visiting)?;
                Some((member_id, part))
            }) {
                Some((member_id, part)) => {
                    member_ids.push(member_id);
                    parts.push(part);
                }
                None => tracing::debug!(%id, member = %code, "skipping unresolvable member"),
            }
        }
        visiting.pop();

        let geometries: Vec<_> = parts.iter().map(|part| &part.geometry).collect();
        let geometry = union(&geometries)?;
        let area = source.area.unwrap_or_else(|| area_km2(&geometry));

        tracing::debug!(%id, members = member_ids.len(), "aggregated composite region");
        let feature = Feature::new(id, area, geometry)
            .with_extra(source.properties)
            .with_members(member_ids);
        Some(self.insert(feature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticBoundaries;
    use locset_core::models::{Geometry, GeometryType};
    use locset_core::ports::BoundaryFeature;

    fn square(x: f64, y: f64, size: f64) -> Geometry {
        Geometry::polygon(vec![vec![
            [x, y],
            [x + size, y],
            [x + size, y + size],
            [x, y + size],
            [x, y],
        ]])
    }

    fn boundaries() -> StaticBoundaries {
        StaticBoundaries::from_features(vec![
            BoundaryFeature::new("Q1", square(0.0, 0.0, 1.0)).with_codes(["AA"]),
            BoundaryFeature::new("Q3", square(1.0, 0.0, 1.0)).with_codes(["BB"]),
            BoundaryFeature::composite("Q10", vec!["AA".to_string(), "bb".to_string()])
                .with_codes(["AB"]),
            BoundaryFeature::composite("Q20", vec!["ZZ".to_string()]),
            BoundaryFeature::composite("Q30", vec!["Q31".to_string()]),
            BoundaryFeature::composite("Q31", vec!["Q30".to_string()]),
        ])
    }

    #[test]
    fn test_point_defaults_to_25km() {
        let mut engine = LocationConflation::new(StaticBoundaries::new());
        let resolved = engine.resolve_location(&Location::point(0.0, 0.0)).unwrap().unwrap();

        assert_eq!(resolved.id(), "[0,0]");
        assert_eq!(resolved.feature.area(), 1963.5);
        assert_eq!(resolved.feature.geometry.geometry_type(), GeometryType::Polygon);
        // 10 edges plus the closing position
        assert_eq!(resolved.feature.geometry.polygons()[0][0].len(), 11);
    }

    #[test]
    fn test_point_coordinates_are_rounded() {
        let mut engine = LocationConflation::new(StaticBoundaries::new());
        let resolved =
            engine.resolve_location(&Location::circle(-74.123, 40.456, 100.0)).unwrap().unwrap();

        assert_eq!(resolved.feature.area(), 31415.93);
        for position in &resolved.feature.geometry.polygons()[0][0] {
            for value in position {
                assert_eq!(*value, (value * 1000.0).round() / 1000.0);
            }
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut engine = LocationConflation::new(StaticBoundaries::new());
        let first = engine.resolve_location(&Location::point(10.0, 10.0)).unwrap().unwrap();
        let len = engine.cache_len();
        let second = engine.resolve_location(&Location::point(10.0, 10.0)).unwrap().unwrap();

        assert!(Arc::ptr_eq(&first.feature, &second.feature));
        assert_eq!(engine.cache_len(), len);
    }

    #[test]
    fn test_composite_region_is_aggregated() {
        let mut engine = LocationConflation::new(boundaries());
        let resolved = engine.resolve_location(&Location::from("ab")).unwrap().unwrap();
        let feature = &resolved.feature;

        assert_eq!(feature.id, "Q10");
        assert_eq!(feature.properties.members, Some(vec!["Q1".to_string(), "Q3".to_string()]));
        assert_eq!(feature.geometry.geometry_type(), GeometryType::Polygon);
        assert!(engine.cached("Q1").is_some());
        assert!(engine.cached("Q3").is_some());
    }

    #[test]
    fn test_composite_without_members_is_unresolved() {
        let mut engine = LocationConflation::new(boundaries());
        match engine.resolve_location(&Location::from("Q20")) {
            Err(LocsetError::UnresolvedLocation { id }) => assert_eq!(id, "Q20"),
            other => panic!("expected UnresolvedLocation, got {:?}", other),
        }

        engine.set_strict(false);
        assert!(engine.resolve_location(&Location::from("Q20")).unwrap().is_none());
    }

    #[test]
    fn test_cyclic_composites_terminate() {
        let mut engine = LocationConflation::new(boundaries());
        engine.set_strict(false);
        assert!(engine.resolve_location(&Location::from("Q30")).unwrap().is_none());
    }

    #[test]
    fn test_world_is_served_from_cache() {
        let mut engine = LocationConflation::new(StaticBoundaries::new());
        let world = engine.resolve_location(&Location::from("Q2")).unwrap().unwrap();
        assert!(Arc::ptr_eq(&world.feature, &engine.cached("Q2").unwrap()));
    }
}
