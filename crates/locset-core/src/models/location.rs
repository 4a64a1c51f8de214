//! Location specifiers and their validated forms.
//!
//! A raw [`Location`] arrives as a JSON array, string, or integer. Strings are
//! split into named geometry references and region codes when the location is
//! built; everything else about validity is decided by the engine's validator,
//! which produces a [`ValidatedLocation`] whose [`LocationKind`] carries the
//! parsed data downstream code needs.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::feature::Feature;

const NAMED_GEOMETRY_SUFFIX: &str = ".geojson";

/// True if `s` names a pre-loaded geometry (`<non-space>.geojson`, any case)
pub fn is_named_geometry_id(s: &str) -> bool {
    s.len() > NAMED_GEOMETRY_SUFFIX.len()
        && !s.chars().any(char::is_whitespace)
        && s.to_ascii_lowercase().ends_with(NAMED_GEOMETRY_SUFFIX)
}

/// A country or region code, as given by the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegionCode {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionCode::Numeric(n) => write!(f, "{}", n),
            RegionCode::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for RegionCode {
    fn from(s: &str) -> Self {
        RegionCode::Text(s.to_string())
    }
}

impl From<String> for RegionCode {
    fn from(s: String) -> Self {
        RegionCode::Text(s)
    }
}

impl From<i64> for RegionCode {
    fn from(n: i64) -> Self {
        RegionCode::Numeric(n)
    }
}

/// A single location specifier
///
/// `Point` keeps the raw coordinate list (`[lon, lat]` or `[lon, lat, radius]`)
/// so that malformed arrays still reach the validator and can be reported.
/// Any other JSON value becomes `Unsupported`, which never validates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLocation", into = "RawLocation")]
pub enum Location {
    Point(Vec<f64>),
    Named(String),
    Region(RegionCode),
    Unsupported(serde_json::Value),
}

/// Wire shape of a location: JSON gives no tag, only the value's type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawLocation {
    Coordinates(Vec<f64>),
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl From<RawLocation> for Location {
    fn from(raw: RawLocation) -> Self {
        match raw {
            RawLocation::Coordinates(coords) => Location::Point(coords),
            RawLocation::Number(n) => Location::Region(RegionCode::Numeric(n)),
            RawLocation::Text(s) => Location::from(s),
            RawLocation::Other(value) => Location::Unsupported(value),
        }
    }
}

impl From<Location> for RawLocation {
    fn from(location: Location) -> Self {
        match location {
            Location::Point(coords) => RawLocation::Coordinates(coords),
            Location::Named(name) => RawLocation::Text(name),
            Location::Region(RegionCode::Numeric(n)) => RawLocation::Number(n),
            Location::Region(RegionCode::Text(s)) => RawLocation::Text(s),
            Location::Unsupported(value) => RawLocation::Other(value),
        }
    }
}

impl Location {
    /// A point with the default radius
    pub fn point(lon: f64, lat: f64) -> Self {
        Location::Point(vec![lon, lat])
    }

    /// A point with an explicit radius in kilometers
    pub fn circle(lon: f64, lat: f64, radius_km: f64) -> Self {
        Location::Point(vec![lon, lat, radius_km])
    }
}

impl From<String> for Location {
    fn from(s: String) -> Self {
        if is_named_geometry_id(&s) {
            Location::Named(s)
        } else {
            Location::Region(RegionCode::Text(s))
        }
    }
}

impl From<&str> for Location {
    fn from(s: &str) -> Self {
        Location::from(s.to_string())
    }
}

impl From<i64> for Location {
    fn from(n: i64) -> Self {
        Location::Region(RegionCode::Numeric(n))
    }
}

impl From<Vec<f64>> for Location {
    fn from(coords: Vec<f64>) -> Self {
        Location::Point(coords)
    }
}

impl From<[f64; 2]> for Location {
    fn from(coords: [f64; 2]) -> Self {
        Location::Point(coords.to_vec())
    }
}

impl From<[f64; 3]> for Location {
    fn from(coords: [f64; 3]) -> Self {
        Location::Point(coords.to_vec())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Point(coords) => write!(f, "{}", format_point_id(coords)),
            Location::Named(name) => write!(f, "{}", name),
            Location::Region(code) => write!(f, "{}", code),
            Location::Unsupported(value) => write!(f, "{}", value),
        }
    }
}

/// `[lon,lat]` / `[lon,lat,radius]` with each number in shortest form
///
/// Negative zero prints as `0` so both zeros share one id.
pub(crate) fn format_point_id(coords: &[f64]) -> String {
    let parts: Vec<String> = coords
        .iter()
        .map(|&c| (if c == 0.0 { 0.0 } else { c }).to_string())
        .collect();
    format!("[{}]", parts.join(","))
}

/// Center and radius of a validated point location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub lon: f64,
    pub lat: f64,
    /// Radius in kilometers; `None` means the engine default applies
    pub radius_km: Option<f64>,
}

impl Circle {
    /// Parse `[lon, lat]` or `[lon, lat, radius]`, checking every range
    pub fn from_coordinates(coords: &[f64]) -> Option<Self> {
        let (lon, lat, radius_km) = match *coords {
            [lon, lat] => (lon, lat, None),
            [lon, lat, radius] => (lon, lat, Some(radius)),
            _ => return None,
        };

        let lon_ok = lon.is_finite() && (-180.0..=180.0).contains(&lon);
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let radius_ok = radius_km.map_or(true, |r| r.is_finite() && r > 0.0);

        (lon_ok && lat_ok && radius_ok).then_some(Circle { lon, lat, radius_km })
    }
}

/// What a location turned out to be once validated
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationKind {
    /// Resolved through the boundary provider
    Region,
    /// A pre-loaded named geometry
    Named,
    /// A point+radius circle
    Point(Circle),
}

impl LocationKind {
    /// Sort rank within a location set: regions, then named, then points
    pub fn rank(&self) -> u8 {
        match self {
            LocationKind::Region => 1,
            LocationKind::Named => 2,
            LocationKind::Point(_) => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LocationKind::Region => "region",
            LocationKind::Named => "named",
            LocationKind::Point(_) => "point",
        }
    }
}

/// A location that passed validation, with its canonical identifier
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLocation {
    pub kind: LocationKind,
    pub location: Location,
    pub id: String,
}

impl ValidatedLocation {
    pub fn new(kind: LocationKind, location: Location, id: impl Into<String>) -> Self {
        Self { kind, location, id: id.into() }
    }

    /// Validate a point location; ids are the stringified coordinate array
    pub fn point(coords: &[f64]) -> Option<Self> {
        let circle = Circle::from_coordinates(coords)?;
        Some(Self {
            kind: LocationKind::Point(circle),
            location: Location::Point(coords.to_vec()),
            id: format_point_id(coords),
        })
    }

    /// Ordering used to derive location set ids
    ///
    /// Points compare by longitude then latitude; everything else by id.
    pub fn set_order(&self, other: &Self) -> Ordering {
        self.kind.rank().cmp(&other.kind.rank()).then_with(|| match (&self.kind, &other.kind) {
            (LocationKind::Point(a), LocationKind::Point(b)) => a
                .lon
                .total_cmp(&b.lon)
                .then_with(|| a.lat.total_cmp(&b.lat))
                .then_with(|| self.id.cmp(&other.id)),
            _ => self.id.cmp(&other.id),
        })
    }
}

/// A validated location together with its resolved feature
#[derive(Debug, Clone)]
pub struct ResolvedLocation {
    pub validated: ValidatedLocation,
    pub feature: Arc<Feature>,
}

impl ResolvedLocation {
    pub fn id(&self) -> &str {
        &self.validated.id
    }

    pub fn kind(&self) -> LocationKind {
        self.validated.kind
    }
}
