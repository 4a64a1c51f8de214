use clap::{Args, Parser, Subcommand};
use locset_core::config::{parse_circle_edges, parse_precision, parse_radius};
use std::path::PathBuf;

/// Locset - Resolve location sets into GeoJSON areas
#[derive(Parser, Debug)]
#[command(name = "locset")]
#[command(about = "Resolve location sets into GeoJSON areas", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Data sources and engine settings shared by every command
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// FeatureCollection of named geometries (ids ending in .geojson)
    #[arg(long, global = true, value_name = "FILE")]
    pub named: Option<PathBuf>,

    /// FeatureCollection of country and region boundaries
    #[arg(long, global = true, value_name = "FILE")]
    pub boundaries: Option<PathBuf>,

    /// Drop invalid locations instead of failing
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Default circle radius in kilometers
    #[arg(long, global = true, value_name = "KM", value_parser = parse_radius)]
    pub radius: Option<f64>,

    /// Number of edges used to approximate circles
    #[arg(long, global = true, value_parser = parse_circle_edges)]
    pub edges: Option<usize>,

    /// Decimal places kept in circle coordinates
    #[arg(long, global = true, value_parser = parse_precision)]
    pub precision: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a location set into one feature
    Resolve(ResolveArgs),

    /// Validate a single location
    Validate(ValidateArgs),

    /// Show the effective configuration
    Config,
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Location to include: [lon,lat], [lon,lat,radius_km], a region code,
    /// or a <name>.geojson id
    #[arg(long, short = 'i', value_name = "LOCATION")]
    pub include: Vec<String>,

    /// Location to exclude, same forms as --include
    #[arg(long, short = 'x', value_name = "LOCATION")]
    pub exclude: Vec<String>,

    /// JSON file holding a location set ({"include": [...], "exclude": [...]})
    #[arg(long, value_name = "FILE", conflicts_with_all = ["include", "exclude"])]
    pub file: Option<PathBuf>,

    /// Pretty-print the GeoJSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// The location to validate
    #[arg(allow_hyphen_values = true)]
    pub location: String,

    /// Also resolve the location and report its area
    #[arg(long)]
    pub resolve: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_flag_is_range_checked() {
        let cli = Cli::try_parse_from(["locset", "--precision", "6", "config"]).unwrap();
        assert_eq!(cli.inputs.precision, Some(6));

        assert!(Cli::try_parse_from(["locset", "--precision", "400", "config"]).is_err());
        assert!(Cli::try_parse_from(["locset", "--edges", "2", "config"]).is_err());
    }
}
