//! Port trait definitions
//!
//! These traits define the interfaces that boundary data adapters must implement.

use crate::models::{Geometry, RegionCode};

/// A region as stored by a boundary data provider
///
/// Composite regions carry `members` instead of their own geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    /// Stable cross-reference identifier (a Wikidata QID)
    pub id: String,

    /// Other codes this region answers to (ISO 3166, M49, aliases)
    pub codes: Vec<String>,

    pub geometry: Option<Geometry>,

    /// Codes of member regions for composite regions
    pub members: Vec<String>,

    /// Precomputed area in square kilometers, if the source provides one
    pub area: Option<f64>,

    /// Remaining source properties, passed through to resolved features
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl BoundaryFeature {
    /// A region with its own geometry
    pub fn new(id: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            codes: Vec::new(),
            geometry: Some(geometry),
            members: Vec::new(),
            area: None,
            properties: serde_json::Map::new(),
        }
    }

    /// A region defined as the union of its members
    pub fn composite(id: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            id: id.into(),
            codes: Vec::new(),
            geometry: None,
            members,
            area: None,
            properties: serde_json::Map::new(),
        }
    }

    /// Add alternate codes this region can be looked up by
    pub fn with_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.codes.extend(codes.into_iter().map(Into::into));
        self
    }

    pub fn is_composite(&self) -> bool {
        !self.members.is_empty()
    }
}

/// Port for country/region boundary lookups
pub trait BoundaryProvider {
    /// Find the region a code refers to, after the provider's own normalization
    fn feature_by_code(&self, code: &RegionCode) -> Option<&BoundaryFeature>;

    /// Find a region by its canonical identifier
    fn feature_by_id(&self, id: &str) -> Option<&BoundaryFeature> {
        self.feature_by_code(&RegionCode::from(id))
    }
}

impl<B: BoundaryProvider + ?Sized> BoundaryProvider for &B {
    fn feature_by_code(&self, code: &RegionCode) -> Option<&BoundaryFeature> {
        (**self).feature_by_code(code)
    }
}

impl<B: BoundaryProvider + ?Sized> BoundaryProvider for Box<B> {
    fn feature_by_code(&self, code: &RegionCode) -> Option<&BoundaryFeature> {
        (**self).feature_by_code(code)
    }
}
