use geojson::FeatureCollection;
use locset_core::config::EngineOptions;
use locset_core::error::{LocsetError, Result};
use locset_core::models::{Feature, Geometry};
use locset_core::ports::BoundaryProvider;
use locset_core::WORLD_ID;
use locset_geo::area_km2;
use std::collections::HashMap;
use std::sync::Arc;

use crate::named::load_named_features;

/// Resolves locations and location sets into polygon features
///
/// All resolved features are memoized in an instance-owned cache keyed by
/// canonical id. The cache only grows; call [`clear_cache`] to reset it.
///
/// An instance is meant to be driven from one thread at a time: every
/// resolving operation takes `&mut self`.
///
/// [`clear_cache`]: LocationConflation::clear_cache
pub struct LocationConflation<B>
where
    B: BoundaryProvider,
{
    pub(crate) boundaries: B,
    pub(crate) options: EngineOptions,
    pub(crate) named: HashMap<String, Arc<Feature>>,
    pub(crate) cache: HashMap<String, Arc<Feature>>,
}

impl<B> LocationConflation<B>
where
    B: BoundaryProvider,
{
    /// Create an engine in strict mode with default options
    pub fn new(boundaries: B) -> Self {
        Self::with_options(boundaries, EngineOptions::default())
    }

    /// Create an engine with explicit options
    pub fn with_options(boundaries: B, options: EngineOptions) -> Self {
        let mut engine = Self {
            boundaries,
            options,
            named: HashMap::new(),
            cache: HashMap::new(),
        };
        engine.seed_cache();
        engine
    }

    /// Load named geometries that locations can refer to as `<name>.geojson`
    ///
    /// In strict mode an invalid geometry fails the whole load; in lenient
    /// mode the offending feature is skipped.
    pub fn with_named_features(mut self, collection: &FeatureCollection) -> Result<Self> {
        let features = load_named_features(collection, self.options.strict)?;
        tracing::info!(count = features.len(), "loaded named features");

        for feature in features {
            let feature = Arc::new(feature);
            self.cache.insert(feature.id.clone(), Arc::clone(&feature));
            self.named.insert(feature.id.clone(), feature);
        }

        Ok(self)
    }

    /// Whether invalid input fails with an error (true) or is dropped (false)
    pub fn strict(&self) -> bool {
        self.options.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.options.strict = strict;
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn boundaries(&self) -> &B {
        &self.boundaries
    }

    /// Look up an already resolved feature by canonical id
    pub fn cached(&self, id: &str) -> Option<Arc<Feature>> {
        self.cache.get(id).cloned()
    }

    /// Number of cached features, including the seeded ones
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every resolved feature, keeping the world and named geometries
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.seed_cache();
    }

    fn seed_cache(&mut self) {
        let world = self.world_feature();
        self.cache.insert(WORLD_ID.to_string(), Arc::new(world));
        for (id, feature) in &self.named {
            self.cache.insert(id.clone(), Arc::clone(feature));
        }
    }

    /// The world region, with a plain bounding rectangle as its geometry
    fn world_feature(&self) -> Feature {
        let geometry = Geometry::world();
        let area = area_km2(&geometry);
        let extra = self
            .boundaries
            .feature_by_id(WORLD_ID)
            .map(|source| source.properties.clone())
            .unwrap_or_default();

        Feature::new(WORLD_ID, area, geometry).with_extra(extra)
    }

    /// Store a freshly resolved feature under its id
    pub(crate) fn insert(&mut self, feature: Feature) -> Arc<Feature> {
        let feature = Arc::new(feature);
        self.cache.insert(feature.id.clone(), Arc::clone(&feature));
        feature
    }

    /// Fail in strict mode, drop silently otherwise
    pub(crate) fn reject<T>(&self, error: LocsetError) -> Result<Option<T>> {
        if self.options.strict {
            Err(error)
        } else {
            tracing::debug!(%error, "dropping location");
            Ok(None)
        }
    }
}
