use locset_core::models::Feature;
use serde::Serialize;

/// Output for resolve command
#[derive(Debug, Serialize)]
pub struct ResolveOutput<'a> {
    pub id: &'a str,
    pub area: f64,
    pub geometry_type: String,
    pub bbox: Option<[f64; 4]>,
    pub feature: &'a Feature,
}

/// Output for validate command
#[derive(Debug, Serialize)]
pub struct ValidateOutput {
    pub location: String,
    pub valid: bool,
    pub kind: Option<String>,
    pub id: Option<String>,
    pub area: Option<f64>,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub strict: ConfigValue<String>,
    pub default_radius_km: ConfigValue<String>,
    pub circle_edges: ConfigValue<String>,
    pub precision: ConfigValue<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: String,
}
