//! Error types for Locset

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocsetError {
    // Location errors
    #[error("Invalid location: \"{location}\"")]
    InvalidLocation { location: String },

    #[error("Unable to resolve location: \"{id}\"")]
    UnresolvedLocation { id: String },

    #[error("Location set includes nothing")]
    EmptyLocationSet,

    #[error("Invalid geometry at feature {feature_id}: {reason}")]
    InvalidGeometry {
        feature_id: String,
        reason: String,
    },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LocsetError {
    /// Build an `InvalidLocation` error from anything displayable
    pub fn invalid_location(location: impl std::fmt::Display) -> Self {
        LocsetError::InvalidLocation { location: location.to_string() }
    }

    /// Build an `UnresolvedLocation` error for a canonical id
    pub fn unresolved(id: impl Into<String>) -> Self {
        LocsetError::UnresolvedLocation { id: id.into() }
    }
}

pub type Result<T> = std::result::Result<T, LocsetError>;
