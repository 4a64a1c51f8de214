//! Locset Engine - Location validation, resolution, and conflation
//!
//! [`LocationConflation`] turns point+radius pairs, named GeoJSON areas, and
//! region codes into polygon features, memoized per instance, and combines
//! include/exclude location sets into one consolidated feature.

pub mod boundaries;
mod conflator;
mod engine;
mod named;
mod resolver;
mod validator;

pub use boundaries::{normalize_code, StaticBoundaries};
pub use engine::LocationConflation;
pub use named::parse_feature_collection;
