//! Mode routing
//!
//! Entry points for the two ways the console runs:
//! - CLI mode (one command, then exit)
//! - TUI mode (interactive table)
//!
//! The mode is picked from the parsed command and the enabled features.

use crate::cli::Commands;
use crate::config::{LoggingConfig, StaticConfig};
use crate::interfaces::cli::{CliContext, CliError};

/// Mode detection result
#[derive(Debug, PartialEq, Eq)]
pub enum Mode {
    Cli,
    #[cfg(feature = "tui")]
    Tui,
}

/// Detect which mode to run from the parsed command
#[cfg(feature = "tui")]
pub fn detect_mode(cmd: &Commands) -> Mode {
    match cmd {
        Commands::Tui => Mode::Tui,
        _ => Mode::Cli,
    }
}

/// Detect which mode to run from the parsed command
#[cfg(not(feature = "tui"))]
pub fn detect_mode(_cmd: &Commands) -> Mode {
    Mode::Cli
}

/// Logging settings for a mode
///
/// The TUI owns the terminal, so console logging is switched off there
/// unless a log file is configured.
#[cfg(feature = "tui")]
pub fn logging_for(mode: &Mode, config: &StaticConfig) -> LoggingConfig {
    let mut logging = config.logging.clone();
    if *mode == Mode::Tui && logging.file.as_deref().is_none_or(str::is_empty) {
        logging.level = "off".to_string();
    }
    logging
}

/// Logging settings for a mode; CLI mode uses the configured settings as-is
#[cfg(not(feature = "tui"))]
pub fn logging_for(_mode: &Mode, config: &StaticConfig) -> LoggingConfig {
    config.logging.clone()
}

/// Run CLI mode
pub async fn run_cli(ctx: &CliContext, cmd: Commands) -> Result<(), CliError> {
    tracing::debug!("Running CLI command against {}", ctx.config.api.base_url);
    crate::interfaces::cli::run_cli_command(ctx, cmd).await
}

/// Run TUI mode
#[cfg(feature = "tui")]
pub async fn run_tui(ctx: &CliContext) -> color_eyre::Result<()> {
    color_eyre::install()?;
    crate::interfaces::tui::run_tui(ctx).await
}
