pub mod feature;
pub mod geometry;
pub mod location;
pub mod location_set;

pub use feature::{Feature, FeatureProperties};
pub use geometry::{Geometry, GeometryType, PolygonCoords, Position, Ring};
pub use location::{
    is_named_geometry_id, Circle, Location, LocationKind, RegionCode, ResolvedLocation,
    ValidatedLocation,
};
pub use location_set::{LocationSet, ResolvedLocationSet, ValidatedLocationSet};
