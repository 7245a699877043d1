use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table},
};

use crate::highlight::{HighlightSpan, SEARCH_TABLE_HEADER, highlight_runs};
use crate::interfaces::tui::app::App;

/// Matched runs in bold yellow
pub fn highlighted_line(spans: Vec<HighlightSpan<'_>>) -> Line<'static> {
    Line::from(
        spans
            .into_iter()
            .map(|span| {
                if span.matched {
                    Span::styled(
                        span.text.to_string(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw(span.text.to_string())
                }
            })
            .collect::<Vec<_>>(),
    )
}

pub fn draw_search_screen(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let input = Paragraph::new(format!("{}_", app.search_input)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Search "),
    );
    frame.render_widget(input, chunks[0]);

    let results = app.controller.search_results();
    let header = Row::new(SEARCH_TABLE_HEADER.map(|h| {
        Span::styled(
            h,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    }))
    .bottom_margin(1);

    let rows: Vec<Row> = results
        .iter()
        .flat_map(|table| table.matches.iter())
        .map(|m| {
            Row::new(vec![
                highlighted_line(highlight_runs(&m.line, &m.matched_indexes)),
                Line::from(m.line_numbers_display()),
            ])
        })
        .collect();

    let title = match &results {
        Some(table) => format!(" \"{}\": {} line(s) ", table.query, table.matches.len()),
        None => " Results ".to_string(),
    };

    let table = Table::new(rows, [Constraint::Percentage(75), Constraint::Percentage(25)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        );
    frame.render_widget(table, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlighted_line_preserves_text() {
        let indexes = [2, 3, 4].into();
        let line = highlighted_line(highlight_runs("concatenate", &indexes));
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "cat");
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "concatenate");
    }
}
