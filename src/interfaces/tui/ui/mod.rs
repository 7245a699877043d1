// UI submodules
mod common;
mod delete_confirm;
mod form;
mod help;
mod main_screen;
mod search;

pub use common::{centered_popup, draw_footer, draw_status_bar, draw_title_bar};
pub use delete_confirm::draw_delete_confirm_screen;
pub use form::draw_form_screen;
pub use help::draw_help_screen;
pub use main_screen::draw_main_screen;
pub use search::draw_search_screen;

use super::app::{App, CurrentScreen};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

/// Main UI rendering entry point
pub fn ui(frame: &mut Frame, app: &mut App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Status
            Constraint::Length(2), // Footer
        ])
        .split(frame.area());

    draw_title_bar(frame, app, main_chunks[0]);

    // 表格始终绘制在底层，弹窗覆盖其上
    match app.current_screen {
        CurrentScreen::Search => draw_search_screen(frame, app, main_chunks[1]),
        _ => draw_main_screen(frame, app, main_chunks[1]),
    }
    match app.current_screen {
        CurrentScreen::Form => draw_form_screen(frame, app, main_chunks[1]),
        CurrentScreen::DeleteConfirm => draw_delete_confirm_screen(frame, app, main_chunks[1]),
        CurrentScreen::Help => draw_help_screen(frame, main_chunks[1]),
        CurrentScreen::Main | CurrentScreen::Search => {}
    }

    draw_status_bar(frame, app, main_chunks[2]);
    draw_footer(frame, app, main_chunks[3]);
}
