use crate::error::{LocsetError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Radius in kilometers applied to points given without one
pub const DEFAULT_RADIUS_KM: f64 = 25.0;

/// Number of edges used when approximating a point+radius circle
pub const DEFAULT_CIRCLE_EDGES: usize = 10;

/// Decimal places kept in synthesized circle coordinates
pub const DEFAULT_PRECISION: u32 = 3;

/// Largest accepted precision; an `f64` holds no more significant decimals
pub const MAX_PRECISION: u32 = 15;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Resolved engine settings, independent of where each value came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Fail fast with an error (true) or drop invalid locations (false)
    pub strict: bool,
    pub default_radius_km: f64,
    pub circle_edges: usize,
    pub precision: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            strict: true,
            default_radius_km: DEFAULT_RADIUS_KM,
            circle_edges: DEFAULT_CIRCLE_EDGES,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl EngineOptions {
    /// Lenient options with every other setting at its default
    pub fn lenient() -> Self {
        Self { strict: false, ..Self::default() }
    }
}

/// Layered configuration for Locset
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub strict: ConfigValue<bool>,
    pub default_radius_km: ConfigValue<f64>,
    pub circle_edges: ConfigValue<usize>,
    pub precision: ConfigValue<u32>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let defaults = EngineOptions::default();
        Self {
            strict: ConfigValue::new(defaults.strict, ConfigSource::Default),
            default_radius_km: ConfigValue::new(defaults.default_radius_km, ConfigSource::Default),
            circle_edges: ConfigValue::new(defaults.circle_edges, ConfigSource::Default),
            precision: ConfigValue::new(defaults.precision, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| LocsetError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| LocsetError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(strict) = file_config.strict {
            self.strict.update(strict, ConfigSource::File);
        }

        if let Some(radius) = file_config.default_radius_km {
            self.default_radius_km.update(check_radius(radius)?, ConfigSource::File);
        }

        if let Some(edges) = file_config.circle_edges {
            self.circle_edges.update(check_circle_edges(edges)?, ConfigSource::File);
        }

        if let Some(precision) = file_config.precision {
            self.precision.update(check_precision(precision)?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // LOCSET_STRICT
        if let Ok(strict_str) = env::var("LOCSET_STRICT") {
            match parse_bool(&strict_str) {
                Ok(strict) => self.strict.update(strict, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LOCSET_STRICT value '{}': expected true or false",
                    strict_str
                ),
            }
        }

        // LOCSET_DEFAULT_RADIUS
        if let Ok(radius_str) = env::var("LOCSET_DEFAULT_RADIUS") {
            match parse_radius(&radius_str) {
                Ok(radius) => self.default_radius_km.update(radius, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LOCSET_DEFAULT_RADIUS value '{}': expected a positive number of kilometers",
                    radius_str
                ),
            }
        }

        // LOCSET_CIRCLE_EDGES
        if let Ok(edges_str) = env::var("LOCSET_CIRCLE_EDGES") {
            match parse_circle_edges(&edges_str) {
                Ok(edges) => self.circle_edges.update(edges, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LOCSET_CIRCLE_EDGES value '{}': expected an integer of at least 3",
                    edges_str
                ),
            }
        }

        // LOCSET_PRECISION
        if let Ok(precision_str) = env::var("LOCSET_PRECISION") {
            match parse_precision(&precision_str) {
                Ok(precision) => self.precision.update(precision, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LOCSET_PRECISION value '{}': expected 0 to 15 decimal places",
                    precision_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    ///
    /// The CLI parses its flags with the `parse_*` helpers, so values here
    /// are expected to be in range already.
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(strict) = overrides.strict {
            self.strict.update(strict, ConfigSource::Cli);
        }

        if let Some(radius) = overrides.default_radius_km {
            self.default_radius_km.update(radius, ConfigSource::Cli);
        }

        if let Some(edges) = overrides.circle_edges {
            self.circle_edges.update(edges, ConfigSource::Cli);
        }

        if let Some(precision) = overrides.precision {
            self.precision.update(precision, ConfigSource::Cli);
        }
    }

    /// Collapse the layered values into the options the engine reads
    pub fn to_options(&self) -> EngineOptions {
        EngineOptions {
            strict: self.strict.value,
            default_radius_km: self.default_radius_km.value,
            circle_edges: self.circle_edges.value,
            precision: self.precision.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("strict".to_string(), (self.strict.value.to_string(), self.strict.source));

        map.insert(
            "default_radius_km".to_string(),
            (format!("{} km", self.default_radius_km.value), self.default_radius_km.source),
        );

        map.insert(
            "circle_edges".to_string(),
            (self.circle_edges.value.to_string(), self.circle_edges.source),
        );

        map.insert(
            "precision".to_string(),
            (format!("{} decimals", self.precision.value), self.precision.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    strict: Option<bool>,
    default_radius_km: Option<f64>,
    circle_edges: Option<usize>,
    precision: Option<u32>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub strict: Option<bool>,
    pub default_radius_km: Option<f64>,
    pub circle_edges: Option<usize>,
    pub precision: Option<u32>,
}

/// Parse a boolean flag from string
pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "strict" => Ok(true),
        "false" | "0" | "no" | "off" | "lenient" => Ok(false),
        _ => Err(LocsetError::ConfigInvalid {
            key: "strict".to_string(),
            reason: format!("Invalid boolean: {}. Use true or false", s),
        }),
    }
}

/// Parse a circle radius in kilometers
pub fn parse_radius(s: &str) -> Result<f64> {
    let radius = s.trim().parse::<f64>().map_err(|_| LocsetError::ConfigInvalid {
        key: "default_radius_km".to_string(),
        reason: format!("Invalid radius: {}. Must be a positive number", s),
    })?;
    check_radius(radius)
}

fn check_radius(radius: f64) -> Result<f64> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(LocsetError::ConfigInvalid {
            key: "default_radius_km".to_string(),
            reason: format!("Invalid radius: {}. Must be a positive number", radius),
        })
    }
}

/// Parse the circle edge count
pub fn parse_circle_edges(s: &str) -> Result<usize> {
    let edges = s.trim().parse::<usize>().map_err(|_| LocsetError::ConfigInvalid {
        key: "circle_edges".to_string(),
        reason: format!("Invalid edge count: {}. Must be an integer of at least 3", s),
    })?;
    check_circle_edges(edges)
}

fn check_circle_edges(edges: usize) -> Result<usize> {
    if edges >= 3 {
        Ok(edges)
    } else {
        Err(LocsetError::ConfigInvalid {
            key: "circle_edges".to_string(),
            reason: format!("Invalid edge count: {}. Must be an integer of at least 3", edges),
        })
    }
}

/// Parse the number of decimal places kept in circle coordinates
pub fn parse_precision(s: &str) -> Result<u32> {
    let precision = s.trim().parse::<u32>().map_err(|_| LocsetError::ConfigInvalid {
        key: "precision".to_string(),
        reason: format!("Invalid precision: {}. Must be an integer from 0 to {}", s, MAX_PRECISION),
    })?;
    check_precision(precision)
}

fn check_precision(precision: u32) -> Result<u32> {
    if precision <= MAX_PRECISION {
        Ok(precision)
    } else {
        Err(LocsetError::ConfigInvalid {
            key: "precision".to_string(),
            reason: format!(
                "Invalid precision: {}. Must be an integer from 0 to {}",
                precision, MAX_PRECISION
            ),
        })
    }
}
