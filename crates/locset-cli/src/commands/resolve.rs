//! Resolve command implementation

use crate::cli::{InputArgs, ResolveArgs};
use crate::config_loader::{load_engine, parse_location};
use crate::output::OutputWriter;
use crate::output_types::ResolveOutput;
use anyhow::{Context, Result};
use locset_core::config::LayeredConfig;
use locset_core::models::LocationSet;
use locset_geo::GeometryExt;
use std::fs;

pub fn execute(
    args: ResolveArgs,
    inputs: &InputArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let set = read_location_set(&args)?;
    let mut engine = load_engine(inputs, config)?;

    let Some(resolved) = engine.resolve_location_set(&set)? else {
        output.warning("Location set did not resolve to any area");
        return Ok(());
    };
    let feature = &resolved.feature;
    let bbox = feature.geometry.bounding_box();

    if output.is_json() {
        return output.result(ResolveOutput {
            id: resolved.id(),
            area: feature.area(),
            geometry_type: feature.geometry.geometry_type().to_string(),
            bbox,
            feature: feature.as_ref(),
        });
    }

    output.section("Location Set");
    output.kv("ID", resolved.id());
    output.kv("Area", format!("{} km²", feature.area()));
    output.kv("Geometry", feature.geometry.geometry_type());
    if let Some([min_lon, min_lat, max_lon, max_lat]) = bbox {
        output.kv("Bounds", format!("{}, {} .. {}, {}", min_lon, min_lat, max_lon, max_lat));
    }
    if let Some(members) = &feature.properties.members {
        output.kv("Members", members.join(", "));
    }
    output.geojson(&feature.to_geojson_string(args.pretty)?);

    Ok(())
}

fn read_location_set(args: &ResolveArgs) -> Result<LocationSet> {
    if let Some(path) = &args.file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return serde_json::from_str(&content)
            .with_context(|| format!("Invalid location set in {}", path.display()));
    }

    Ok(LocationSet {
        include: args.include.iter().map(|s| parse_location(s)).collect(),
        exclude: args.exclude.iter().map(|s| parse_location(s)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use locset_core::models::Location;
    use std::io::Write;

    fn args() -> ResolveArgs {
        ResolveArgs { include: vec![], exclude: vec![], file: None, pretty: false }
    }

    #[test]
    fn test_location_set_from_flags() {
        let args = ResolveArgs {
            include: vec!["[0,0]".to_string(), "de".to_string()],
            exclude: vec!["250".to_string()],
            ..args()
        };
        let set = read_location_set(&args).unwrap();

        assert_eq!(set.include, vec![Location::point(0.0, 0.0), Location::from("de")]);
        assert_eq!(set.exclude, vec![Location::from(250_i64)]);
    }

    #[test]
    fn test_location_set_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"include": [[1, 2, 50], "a.geojson"]}}"#).unwrap();

        let args = ResolveArgs { file: Some(file.path().to_path_buf()), ..args() };
        let set = read_location_set(&args).unwrap();

        assert_eq!(set.include.len(), 2);
        assert!(set.exclude.is_empty());
    }

    #[test]
    fn test_file_with_unsupported_members_still_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"include": ["Q2", [0, "x"], 1.5]}}"#).unwrap();

        let args = ResolveArgs { file: Some(file.path().to_path_buf()), ..args() };
        let set = read_location_set(&args).unwrap();

        assert_eq!(set.include.len(), 3);
        assert_eq!(set.include[2], Location::Unsupported(serde_json::json!(1.5)));
    }
}
