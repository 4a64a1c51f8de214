//! Validate command implementation

use crate::cli::{InputArgs, ValidateArgs};
use crate::config_loader::{load_engine, parse_location};
use crate::output::OutputWriter;
use crate::output_types::ValidateOutput;
use anyhow::Result;
use locset_core::config::LayeredConfig;
use locset_core::LocsetError;
use tabled::Tabled;

pub fn execute(
    args: ValidateArgs,
    inputs: &InputArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let location = parse_location(&args.location);
    let mut engine = load_engine(inputs, config)?;

    let validated = match engine.validate_location(&location) {
        Ok(validated) => validated,
        Err(LocsetError::InvalidLocation { .. }) => None,
        Err(e) => return Err(e.into()),
    };

    let area = match (&validated, args.resolve) {
        (Some(_), true) => engine.resolve_location(&location)?.map(|r| r.feature.area()),
        _ => None,
    };

    let report = ValidateOutput {
        location: location.to_string(),
        valid: validated.is_some(),
        kind: validated.as_ref().map(|v| v.kind.name().to_string()),
        id: validated.map(|v| v.id),
        area,
    };

    if output.is_json() {
        return output.result(report);
    }

    #[derive(Tabled)]
    struct ValidateRow {
        #[tabled(rename = "Location")]
        location: String,
        #[tabled(rename = "Valid")]
        valid: String,
        #[tabled(rename = "Kind")]
        kind: String,
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Area (km²)")]
        area: String,
    }

    output.table(vec![ValidateRow {
        location: report.location,
        valid: if report.valid { "yes" } else { "no" }.to_string(),
        kind: report.kind.unwrap_or_else(|| "-".to_string()),
        id: report.id.unwrap_or_else(|| "-".to_string()),
        area: report.area.map_or_else(|| "-".to_string(), |a| a.to_string()),
    }]);

    Ok(())
}
