//! Locset Geo - Polygon conversion, set algebra, and measurement
//!
//! This crate adapts the canonical polygon types from `locset-core` to the
//! `geo` crate: union and difference, circle synthesis, area, and ring
//! validation.

pub mod circle;
pub mod clip;
pub mod measure;
pub mod models;
pub mod validation;

pub use circle::circle_polygon;
pub use clip::{classify, clip, difference, union, ClipOperation};
pub use measure::{area_km2, circle_area_km2, round_positions, round_to};
pub use models::{from_geo_multi_polygon, to_geo_multi_polygon, GeometryExt};
pub use validation::{ensure_valid, validate_geometry, ValidationError, ValidationResult};
