//! Area and coordinate precision helpers.
//!
//! Areas are spherical approximations in square kilometers, rounded to two
//! decimals. They are informational only.

use geo::ChamberlainDuquetteArea;
use locset_core::config::MAX_PRECISION;
use std::f64::consts::PI;

use crate::models::{to_geo_multi_polygon, Geometry};

/// Round `value` to `decimals` decimal places, capped at [`MAX_PRECISION`]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_PRECISION) as i32);
    (value * factor).round() / factor
}

/// Spherical area of a geometry in km², two decimals
pub fn area_km2(geometry: &Geometry) -> f64 {
    let square_meters = to_geo_multi_polygon(geometry).chamberlain_duquette_unsigned_area();
    round_to(square_meters / 1e6, 2)
}

/// Planar area of a circle, `π·r²`, in km², two decimals
pub fn circle_area_km2(radius_km: f64) -> f64 {
    round_to(PI * radius_km * radius_km, 2)
}

/// Round every coordinate of `geometry` to `decimals` places
pub fn round_positions(geometry: &mut Geometry, decimals: u32) {
    geometry.for_each_position_mut(|p| {
        p[0] = round_to(p[0], decimals);
        p[1] = round_to(p[1], decimals);
    });
}
