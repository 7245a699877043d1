//! CLI interface module
//!
//! One-shot commands over the table controller. Each command builds a
//! controller on the surface it prints through, runs one action and exits.

pub mod commands;
mod surface;

pub use surface::{RowsMode, TerminalSurface};

use std::fmt;
use std::sync::Arc;

use crate::cli::{Commands, ConfigCommands};
use crate::client::{HttpTerseApi, TerseApi};
use crate::config::StaticConfig;
use crate::controller::{ControllerOptions, EntityTableController, RenderSurface};
use crate::errors::TerseError;
use crate::highlight::Emphasis;

#[derive(Debug)]
pub enum CliError {
    /// Failure already shown to the user through the render surface
    Reported(TerseError),
    Terse(TerseError),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::Reported(err) | CliError::Terse(err) => err.format_simple(),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::Reported(err) | CliError::Terse(err) => err.format_colored(),
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }

    /// Whether the surface already printed this failure
    pub fn is_reported(&self) -> bool {
        matches!(self, CliError::Reported(_))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<TerseError> for CliError {
    fn from(err: TerseError) -> Self {
        CliError::Terse(err)
    }
}

/// What every command needs: the store and the loaded configuration
pub struct CliContext {
    pub api: Arc<dyn TerseApi>,
    pub config: Arc<StaticConfig>,
}

impl CliContext {
    pub fn new(api: Arc<dyn TerseApi>, config: Arc<StaticConfig>) -> Self {
        Self { api, config }
    }

    /// Context over the HTTP store named in the configuration
    pub fn from_config(config: Arc<StaticConfig>) -> Self {
        let api: Arc<dyn TerseApi> = Arc::new(HttpTerseApi::from_config(&config.api));
        Self::new(api, config)
    }

    pub fn controller(&self, surface: Arc<dyn RenderSurface>) -> EntityTableController {
        EntityTableController::new(
            self.api.clone(),
            surface,
            ControllerOptions::from(self.config.as_ref()),
        )
    }

    /// Controller printing to the terminal
    pub fn terminal_controller(&self, rows: RowsMode) -> EntityTableController {
        self.controller(Arc::new(TerminalSurface::new(
            self.config.display.emphasis,
            rows,
        )))
    }

    pub fn emphasis(&self) -> Emphasis {
        self.config.display.emphasis
    }
}

/// Controller failures were notified on the surface already
pub(crate) fn reported(err: TerseError) -> CliError {
    CliError::Reported(err)
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(ctx: &CliContext, cmd: Commands) -> Result<(), CliError> {
    use commands::*;

    match cmd {
        Commands::List { html } => list_table(ctx, html).await,
        Commands::Show { key } => show_record(ctx, &key).await,
        Commands::Write {
            operation,
            original_url,
            short,
            redirect,
            js_tracking,
            title,
            og,
            twitter,
            inherit,
        } => {
            let record = build_record(RecordArgs {
                original_url,
                short,
                redirect,
                js_tracking,
                title,
                og,
                twitter,
                inherit,
            })?;
            write_record(ctx, operation, record).await
        }
        Commands::Delete { keys } => delete_records(ctx, keys).await,
        Commands::DeleteAll { yes } => delete_all(ctx, yes).await,
        Commands::Export { keys, dir, stdout } => export_records(ctx, keys, dir, stdout).await,
        Commands::Import { file_path, wipe } => import_records(ctx, &file_path, wipe).await,
        Commands::Search {
            query,
            html,
            markdown,
        } => {
            let emphasis = if html {
                Emphasis::Html
            } else if markdown {
                Emphasis::Markdown
            } else {
                ctx.emphasis()
            };
            search(ctx, &query, emphasis).await
        }
        Commands::Prefix => show_prefix(ctx).await,
        Commands::Meta { original_url } => show_meta(ctx, &original_url).await,
        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => {
                generate_config(output_path, force)
            }
            ConfigCommands::Show => show_config(ctx),
        },
        #[cfg(feature = "tui")]
        Commands::Tui => Err(CliError::CommandError(
            "TUI mode is started by the binary, not as a CLI command".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_errors_are_marked() {
        let err = reported(TerseError::rejected("HTTP 400: nope"));
        assert!(err.is_reported());
        assert!(err.format_simple().contains("nope"));

        let err: CliError = TerseError::file_operation("missing").into();
        assert!(!err.is_reported());
        assert!(err.format_colored().contains("T006"));
    }
}
