use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::controller::Control;
use crate::interfaces::tui::app::{App, CurrentScreen};
use crate::interfaces::tui::constants::PopupSize;

/// Draw title bar with prefix and statistics
pub fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let prefix = app
        .controller
        .prefix()
        .unwrap_or_else(|| "(prefix unknown)".to_string());

    let title_text = vec![Line::from(vec![
        Span::styled(
            "Terse Console",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{} ", prefix), Style::default().fg(Color::Blue)),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Total: {} ", app.controller.row_count()),
            Style::default().fg(Color::Yellow),
        ),
    ])];

    let title = Paragraph::new(title_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(title, area);
}

/// Draw status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let busy = [
        Control::WriteForm,
        Control::DeleteRow,
        Control::DeleteSelected,
        Control::DeleteAll,
        Control::Export,
        Control::Search,
    ]
    .into_iter()
    .find(|c| app.is_busy(*c));

    let (status_text, status_style) = if !app.error_message.is_empty() {
        (
            format!("[ERROR] {}", app.error_message),
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
    } else if let Some(control) = busy {
        (
            format!("[{:?}] {}", app.controller.phase(control), control.as_ref()),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )
    } else if !app.status_message.is_empty() {
        (
            format!("[OK] {}", app.status_message),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("Ready".to_string(), Style::default().fg(Color::Cyan))
    };

    let status = Paragraph::new(status_text)
        .style(status_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .alignment(Alignment::Center);

    frame.render_widget(status, area);
}

/// Draw footer with keyboard shortcuts
pub fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.current_screen {
        CurrentScreen::Main => vec![
            ("Up/Down", "Navigate", Color::Cyan),
            ("Space", "Select", Color::Cyan),
            ("A", "All", Color::Cyan),
            ("a", "Add", Color::Green),
            ("e", "Edit", Color::Yellow),
            ("d", "Delete", Color::Red),
            ("x", "Export", Color::Magenta),
            ("/", "Search", Color::Cyan),
            ("?", "Help", Color::Blue),
            ("q", "Quit", Color::Magenta),
        ],
        CurrentScreen::Form => vec![
            ("Tab", "Next field", Color::Cyan),
            ("Left/Right", "Cycle", Color::Cyan),
            ("Enter", "Submit", Color::Green),
            ("Esc", "Cancel", Color::Red),
        ],
        CurrentScreen::DeleteConfirm => vec![
            ("y", "Confirm", Color::Red),
            ("n/Esc", "Cancel", Color::Green),
        ],
        CurrentScreen::Search => vec![
            ("Enter", "Search", Color::Green),
            ("Esc", "Back", Color::Red),
        ],
        CurrentScreen::Help => vec![("Esc", "Close", Color::Red)],
    };

    let mut spans = Vec::with_capacity(shortcuts.len() * 3);
    for (key, label, color) in shortcuts {
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}  ", label),
            Style::default().fg(Color::Gray),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

/// Clear and frame a centered popup, returning its inner area
pub fn centered_popup(
    frame: &mut Frame,
    area: Rect,
    size: PopupSize,
    title: &str,
    color: Color,
) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - size.height) / 2),
            Constraint::Percentage(size.height),
            Constraint::Percentage((100 - size.height) / 2),
        ])
        .split(area);
    let popup = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - size.width) / 2),
            Constraint::Percentage(size.width),
            Constraint::Percentage((100 - size.width) / 2),
        ])
        .split(vertical[1])[1];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(title.to_string())
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    let inner = block.inner(popup);

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    inner
}
