//! Read-only commands: search, prefix, preview metadata

use std::sync::Arc;

use colored::Colorize;

use crate::errors::TerseError;
use crate::highlight::Emphasis;
use crate::interfaces::cli::{CliContext, CliError, RowsMode, TerminalSurface, reported};

pub async fn search(ctx: &CliContext, query: &str, emphasis: Emphasis) -> Result<(), CliError> {
    let controller = ctx.controller(Arc::new(TerminalSurface::new(emphasis, RowsMode::Silent)));
    controller.search(query).await.map_err(reported)?;
    Ok(())
}

pub async fn show_prefix(ctx: &CliContext) -> Result<(), CliError> {
    let controller = ctx.terminal_controller(RowsMode::Silent);
    let prefix = controller.load_prefix().await.map_err(reported)?;
    println!("{}", prefix);
    Ok(())
}

/// Print what the server extracts from `original_url`
pub async fn show_meta(ctx: &CliContext, original_url: &str) -> Result<(), CliError> {
    let preview = ctx
        .api
        .frontend_meta(original_url)
        .await
        .map_err(TerseError::from)?;

    if preview.is_blank() {
        println!(
            "{} No preview metadata found on {}",
            "ℹ".bold().blue(),
            original_url.blue().underline()
        );
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&preview).map_err(TerseError::from)?);
    Ok(())
}
