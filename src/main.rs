use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use terse_console::cli::Cli;
use terse_console::config::{get_config, init_config_from};
use terse_console::interfaces::cli::CliContext;
use terse_console::runtime::{self, Mode};
use terse_console::system::logging::init_logging;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 配置先于日志加载
    init_config_from(cli.config.as_deref());
    let config = get_config();

    let mode = runtime::detect_mode(&cli.command);
    let _log_guard = match init_logging(&runtime::logging_for(&mode, &config)) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("{}", e.format_colored());
            None
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{} Failed to start runtime: {}", "✗".bold().red(), e);
            return ExitCode::FAILURE;
        }
    };

    let ctx = CliContext::from_config(config);

    match mode {
        #[cfg(feature = "tui")]
        Mode::Tui => {
            if let Err(e) = rt.block_on(runtime::run_tui(&ctx)) {
                eprintln!("{} {:?}", "✗".bold().red(), e);
                return ExitCode::FAILURE;
            }
        }
        Mode::Cli => {
            if let Err(e) = rt.block_on(runtime::run_cli(&ctx, cli.command)) {
                if !e.is_reported() {
                    eprintln!("{}", e.format_colored());
                }
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
