//! `korporus validate` and `korporus schema`.

use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use korporus_manifest::{app_manifest_schema, validate_manifest};
use serde_json::Value;

/// Validate the manifest at `path`, printing every error.
pub(crate) fn run(path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let report = validate_manifest(&value);
    if report.valid {
        println!("{} {}", "VALID".green().bold(), path.display());
        return Ok(());
    }

    println!("{} {}", "INVALID".red().bold(), path.display());
    for error in &report.errors {
        println!("  - {error}");
    }
    bail!("{} validation error(s)", report.errors.len())
}

/// Print the manifest JSON Schema.
pub(crate) fn print_schema() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&app_manifest_schema())?);
    Ok(())
}
