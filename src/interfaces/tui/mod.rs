//! Terminal User Interface (TUI) module
//!
//! Provides an interactive terminal interface over the table controller.
//! Remote actions run as spawned tasks on the current-thread runtime; the
//! draw loop yields between key polls so they make progress.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};

mod app;
mod constants;
mod event_handler;
mod ui;

use app::App;
use ui::ui;

use crate::controller::MemorySurface;
use crate::interfaces::cli::CliContext;

/// Run the TUI application
pub async fn run_tui(ctx: &CliContext) -> color_eyre::Result<()> {
    let surface = Arc::new(MemorySurface::new());
    let controller = Arc::new(ctx.controller(surface.clone()));
    let mut app = App::new(
        controller,
        surface,
        PathBuf::from(&ctx.config.export.dir),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    app.spawn_refresh();
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    app: &mut App,
) -> color_eyre::Result<()> {
    loop {
        app.sync();
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && event_handler::handle_key_event(app, key)
            {
                return Ok(());
            }
        } else {
            // 让出运行时，后台任务在此推进
            tokio::time::sleep(constants::IDLE_TICK).await;
        }
    }
}
