use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::centered_popup;
use crate::interfaces::tui::constants::popup;

const HELP_ENTRIES: &[(&str, &str)] = &[
    ("Up/Down, j/k", "Move the cursor"),
    ("Space", "Select or unselect the row"),
    ("A", "Select all / clear selection"),
    ("a, n", "New record"),
    ("e, Enter", "Edit the record under the cursor"),
    ("d", "Delete the selection (or the row under the cursor)"),
    ("D", "Delete all data"),
    ("x", "Export the selection (or everything)"),
    ("/", "Search"),
    ("r", "Refresh (clears the selection)"),
    ("q, Esc", "Quit"),
];

pub fn draw_help_screen(frame: &mut Frame, area: Rect) {
    let inner = centered_popup(frame, area, popup::HELP, " Help ", Color::Blue);

    let mut lines = vec![Line::from("")];
    for (key, description) in HELP_ENTRIES {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<16}", key),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(*description, Style::default().fg(Color::White)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
