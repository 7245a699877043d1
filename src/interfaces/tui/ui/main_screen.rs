use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table},
};

use crate::interfaces::tui::app::App;
use crate::interfaces::tui::constants::{URL_TRUNCATE_LENGTH, truncate};

fn header_cell(name: &str) -> Span<'static> {
    Span::styled(
        name.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

pub fn draw_main_screen(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = app.rows();

    if rows.is_empty() {
        let empty_text = vec![
            Line::from(""),
            Line::from(""),
            Line::from(vec![Span::styled(
                "No shortened URLs found",
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    "[a]",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    " to create one, ",
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    "[r]",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to refresh", Style::default().fg(Color::DarkGray)),
            ]),
        ];

        let empty = Paragraph::new(empty_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title("Shortened URLs")
                    .title_style(Style::default().fg(Color::Cyan)),
            )
            .alignment(Alignment::Center);

        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Span::raw("  "), // Selection indicator column
        header_cell("Shortened URL"),
        header_cell("Original URL"),
        header_cell("Redirect"),
        header_cell("Visits"),
    ])
    .bottom_margin(1);

    let selected_count = rows.iter().filter(|r| r.selected).count();
    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let selection_prefix = if row.selected {
                Span::styled(
                    "● ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw("  ")
            };

            Row::new(vec![
                selection_prefix,
                Span::styled(
                    row.summary.shortened_url.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    truncate(&row.summary.original_url, URL_TRUNCATE_LENGTH),
                    Style::default().fg(Color::Blue),
                ),
                Span::styled(
                    row.summary.redirect_type.to_string(),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    row.summary.visit_count.to_string(),
                    Style::default().fg(Color::Green),
                ),
            ])
        })
        .collect();

    let mut title = format!("Shortened URLs ({})", rows.len());
    if selected_count > 0 {
        title.push_str(&format!(" | Selected: {}", selected_count));
    }

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(2),
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title)
            .title_style(Style::default().fg(Color::Cyan)),
    )
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut app.table_state);
}
