//! Import/export commands

use std::path::Path;

use colored::Colorize;

use crate::errors::TerseError;
use crate::interfaces::cli::{CliContext, CliError, RowsMode, reported};
use crate::models::{ExportPayload, ExportSelection};

pub async fn export_records(
    ctx: &CliContext,
    keys: Vec<String>,
    dir: Option<String>,
    to_stdout: bool,
) -> Result<(), CliError> {
    let selection = if keys.is_empty() {
        ExportSelection::All
    } else {
        ExportSelection::keys(keys)
    };

    let controller = ctx.terminal_controller(RowsMode::Silent);
    let file = controller.export(selection).await.map_err(reported)?;

    if to_stdout {
        println!("{}", file.to_json()?);
        return Ok(());
    }

    let dir = dir.unwrap_or_else(|| ctx.config.export.dir.clone());
    let path = file.save(&dir)?;
    println!(
        "{} Exported {} record(s) to {}",
        "✓".bold().green(),
        file.payload.len().to_string().green(),
        path.display().to_string().blue()
    );
    Ok(())
}

pub async fn import_records(ctx: &CliContext, file_path: &str, wipe: bool) -> Result<(), CliError> {
    let payload = read_export_file(file_path)?;
    if wipe {
        println!(
            "{} Existing data will be deleted before importing",
            "⚠".bold().yellow()
        );
    }

    let controller = ctx.terminal_controller(RowsMode::CountOnly);
    controller.import(&payload, wipe).await.map_err(reported)?;
    Ok(())
}

/// Load an export document (array or keyed object)
pub fn read_export_file(file_path: &str) -> Result<ExportPayload, TerseError> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(TerseError::file_operation(format!(
            "File not found: {}",
            file_path
        )));
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        TerseError::file_operation(format!("Failed to read '{}': {}", file_path, e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        TerseError::serialization(format!("'{}' is not an export document: {}", file_path, e))
    })
}
