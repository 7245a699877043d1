//! Table commands: list, show, write, delete

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use colored::Colorize;

use crate::cli::parse_pair;
use crate::controller::HtmlSurface;
use crate::interfaces::cli::{CliContext, CliError, RowsMode, reported};
use crate::models::{MediaPreview, RedirectType, TerseRecord, WriteOperation};

pub async fn list_table(ctx: &CliContext, html: bool) -> Result<(), CliError> {
    if html {
        let surface = Arc::new(HtmlSurface::new());
        let controller = ctx.controller(surface.clone());
        controller.refresh().await.map_err(reported)?;
        println!("{}", surface.table_html());
        return Ok(());
    }

    let controller = ctx.terminal_controller(RowsMode::Full);
    if let Ok(prefix) = controller.load_prefix().await {
        println!("{} {}", "Prefix:".dimmed(), prefix.blue());
    }
    controller.refresh().await.map_err(reported)?;
    Ok(())
}

pub async fn show_record(ctx: &CliContext, key: &str) -> Result<(), CliError> {
    let controller = ctx.terminal_controller(RowsMode::Silent);
    let record = controller.load_record(key).await.map_err(reported)?;
    let json = serde_json::to_string_pretty(&record).map_err(crate::errors::TerseError::from)?;
    println!("{}", json);
    Ok(())
}

/// Raw `write` arguments
pub struct RecordArgs {
    pub original_url: String,
    pub short: Option<String>,
    pub redirect: RedirectType,
    pub js_tracking: bool,
    pub title: Option<String>,
    pub og: Vec<String>,
    pub twitter: Vec<String>,
    pub inherit: bool,
}

/// Assemble the record the form would submit
pub fn build_record(args: RecordArgs) -> Result<TerseRecord, CliError> {
    let og = parse_pairs(&args.og)?;
    let twitter = parse_pairs(&args.twitter)?;
    let wants_preview = args.title.is_some() || !og.is_empty() || !twitter.is_empty() || args.inherit;

    if wants_preview && !args.redirect.supports_preview() {
        return Err(CliError::ParseError(format!(
            "Preview options need a meta or js redirect, not '{}'",
            args.redirect
        )));
    }

    let media_preview = wants_preview.then(|| MediaPreview {
        title: args.title.unwrap_or_default(),
        og,
        twitter,
        inherit_from_original: args.inherit,
    });

    Ok(TerseRecord {
        original_url: args.original_url,
        shortened_url: args.short.unwrap_or_default(),
        redirect_type: args.redirect,
        javascript_tracking: args.js_tracking,
        media_preview,
    })
}

fn parse_pairs(raw: &[String]) -> Result<BTreeMap<String, String>, CliError> {
    raw.iter()
        .map(|pair| parse_pair(pair).map_err(CliError::ParseError))
        .collect()
}

pub async fn write_record(
    ctx: &CliContext,
    op: WriteOperation,
    record: TerseRecord,
) -> Result<(), CliError> {
    let controller = ctx.terminal_controller(RowsMode::CountOnly);
    let key = controller.write(op, record).await.map_err(reported)?;

    if let Ok(prefix) = controller.load_prefix().await {
        println!(
            "  {}",
            format!("{}{}", prefix, key).blue().underline()
        );
    }
    Ok(())
}

pub async fn delete_records(ctx: &CliContext, keys: Vec<String>) -> Result<(), CliError> {
    let controller = ctx.terminal_controller(RowsMode::CountOnly);
    let result = if let [key] = keys.as_slice() {
        controller.delete_one(key).await
    } else {
        let keys: BTreeSet<String> = keys.into_iter().collect();
        controller.delete_many(&keys).await
    };
    result.map_err(reported)
}

pub async fn delete_all(ctx: &CliContext, yes: bool) -> Result<(), CliError> {
    if !yes {
        return Err(CliError::CommandError(
            "Refusing to delete everything without --yes".to_string(),
        ));
    }
    let controller = ctx.terminal_controller(RowsMode::CountOnly);
    controller.delete_all().await.map_err(reported)
}
