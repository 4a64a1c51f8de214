//! Configuration and engine loading for CLI commands

use anyhow::{Context, Result};
use locset_core::config::{CliConfigOverrides, LayeredConfig};
use locset_core::models::Location;
use locset_engine::{parse_feature_collection, LocationConflation, StaticBoundaries};
use std::fs;

use crate::cli::InputArgs;

/// Load layered configuration: defaults, then file, environment and flags
pub fn load_config(inputs: &InputArgs) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = &inputs.config {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides(inputs));
    Ok(config)
}

fn overrides(inputs: &InputArgs) -> CliConfigOverrides {
    CliConfigOverrides {
        strict: inputs.lenient.then_some(false),
        default_radius_km: inputs.radius,
        circle_edges: inputs.edges,
        precision: inputs.precision,
    }
}

/// Build an engine from the boundary and named geometry files
pub fn load_engine(
    inputs: &InputArgs,
    config: &LayeredConfig,
) -> Result<LocationConflation<StaticBoundaries>> {
    let boundaries = match &inputs.boundaries {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            StaticBoundaries::from_geojson_str(&content)
                .with_context(|| format!("Failed to load boundaries from {}", path.display()))?
        }
        None => StaticBoundaries::new(),
    };

    let engine = LocationConflation::with_options(boundaries, config.to_options());

    match &inputs.named {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let collection = parse_feature_collection(&content)?;
            engine
                .with_named_features(&collection)
                .with_context(|| format!("Failed to load named geometries from {}", path.display()))
        }
        None => Ok(engine),
    }
}

/// Parse a location given on the command line
///
/// JSON literals (`[0,10]`, `840`, `"de"`) are decoded as JSON; anything else
/// is taken as a bare region code or named geometry id.
pub fn parse_location(raw: &str) -> Location {
    serde_json::from_str(raw).unwrap_or_else(|_| Location::from(raw.trim()))
}
