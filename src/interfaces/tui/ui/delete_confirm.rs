use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::centered_popup;
use crate::interfaces::tui::app::{App, DeleteTarget};
use crate::interfaces::tui::constants::popup;

pub fn draw_delete_confirm_screen(frame: &mut Frame, app: &App, area: Rect) {
    let inner = centered_popup(frame, area, popup::DELETE_CONFIRM, " Confirm Delete ", Color::Red);

    let what = match &app.delete_target {
        Some(DeleteTarget::Row(key)) => format!("Delete '{}'?", key),
        Some(DeleteTarget::Selected(count)) => format!("Delete {} selected record(s)?", count),
        Some(DeleteTarget::All) => "Delete ALL data on the server?".to_string(),
        None => String::new(),
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            what,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "[y]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Yes   "),
            Span::styled(
                "[n]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" No"),
        ]),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}
