use crate::models::{Geometry, PolygonCoords, Ring};
use locset_core::error::{LocsetError, Result};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    fn absorb(&mut self, prefix: &str, other: ValidationResult) {
        for error in other.errors {
            self.add_error(format!("{}.{}", prefix, error.location), error.reason);
        }
    }
}

/// Validate the ring structure of a polygonal geometry
pub fn validate_geometry(geometry: &Geometry) -> ValidationResult {
    match geometry {
        Geometry::Polygon { coordinates } => validate_polygon(coordinates),
        Geometry::MultiPolygon { coordinates } => validate_multipolygon(coordinates),
    }
}

fn validate_ring(ring: &Ring, label: &str) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if ring.len() < 4 {
        result.add_error(
            label.to_string(),
            format!("Ring must have at least 4 positions, found {}", ring.len()),
        );
    }

    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            result.add_error(
                label.to_string(),
                "Ring must be closed (first position == last position)".to_string(),
            );
        }
    }

    for (i, p) in ring.iter().enumerate() {
        if !p[0].is_finite() || !p[1].is_finite() {
            result.add_error(format!("{}[{}]", label, i), "Coordinates must be finite".to_string());
        }
    }

    result
}

fn validate_polygon(rings: &PolygonCoords) -> ValidationResult {
    let mut result = ValidationResult::valid();

    let Some((exterior, interiors)) = rings.split_first() else {
        result.add_error("Polygon".to_string(), "Polygon has no exterior ring".to_string());
        return result;
    };

    result.absorb("Polygon", validate_ring(exterior, "exterior"));
    for (i, interior) in interiors.iter().enumerate() {
        result.absorb("Polygon", validate_ring(interior, &format!("interior[{}]", i)));
    }

    result
}

fn validate_multipolygon(polygons: &[PolygonCoords]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if polygons.is_empty() {
        result.add_error("MultiPolygon".to_string(), "MultiPolygon has no polygons".to_string());
    }

    for (i, polygon) in polygons.iter().enumerate() {
        result.absorb(&format!("MultiPolygon[{}]", i), validate_polygon(polygon));
    }

    result
}

/// Fail with `InvalidGeometry` if `geometry` does not validate
pub fn ensure_valid(geometry: &Geometry, feature_id: &str) -> Result<()> {
    let validation = validate_geometry(geometry);
    if validation.is_valid {
        return Ok(());
    }

    Err(LocsetError::InvalidGeometry {
        feature_id: feature_id.to_string(),
        reason: validation
            .errors
            .first()
            .map(|e| format!("{}: {}", e.location, e.reason))
            .unwrap_or_else(|| "Invalid geometry".to_string()),
    })
}
