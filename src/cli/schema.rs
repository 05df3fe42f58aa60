//! CLI handler for the `schema` subcommand

use crate::config::Config;
use schemars::schema_for;

/// Print the JSON Schema of `wavesmith.yaml` for editor validation
pub fn execute() -> anyhow::Result<()> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
