//! Config command implementation

use crate::output::OutputWriter;
use crate::output_types::{ConfigOutput, ConfigValue};
use anyhow::Result;
use locset_core::config::{ConfigSource, LayeredConfig};
use std::collections::HashMap;
use tabled::Tabled;

const KEYS: [&str; 4] = ["strict", "default_radius_km", "circle_edges", "precision"];

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let inspection_map = config.to_inspection_map();

    if output.is_json() {
        let entry = |key: &str| config_value(&inspection_map, key);
        return output.result(ConfigOutput {
            strict: entry("strict"),
            default_radius_km: entry("default_radius_km"),
            circle_edges: entry("circle_edges"),
            precision: entry("precision"),
        });
    }

    output.section("Configuration Values");

    #[derive(Tabled)]
    struct ConfigRow {
        #[tabled(rename = "Key")]
        key: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Source")]
        source: String,
    }

    let rows: Vec<ConfigRow> = KEYS
        .iter()
        .map(|key| {
            let entry = config_value(&inspection_map, key);
            ConfigRow { key: key.to_string(), value: entry.value, source: entry.source }
        })
        .collect();
    output.table(rows);

    Ok(())
}

fn config_value(map: &HashMap<String, (String, ConfigSource)>, key: &str) -> ConfigValue<String> {
    map.get(key)
        .map(|(value, source)| ConfigValue { value: value.clone(), source: format!("{:?}", source) })
        .unwrap_or_else(|| ConfigValue {
            value: "-".to_string(),
            source: format!("{:?}", ConfigSource::Default),
        })
}
