use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::centered_popup;
use crate::controller::Control;
use crate::interfaces::tui::app::{App, FormField};
use crate::interfaces::tui::constants::popup;

pub fn draw_form_screen(frame: &mut Frame, app: &App, area: Rect) {
    let submitting = app.is_busy(Control::WriteForm);
    let title = if submitting {
        " Saving... "
    } else {
        " Terse Record "
    };
    let inner = centered_popup(frame, area, popup::FORM, title, Color::Green);

    let mut lines = Vec::with_capacity(FormField::ALL.len() * 2 + 2);
    for field in FormField::ALL {
        let active = field == app.form.field;
        let label_style = if active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut value = app.form.value(field);
        if active && field.is_text() {
            value.push('_');
        }
        lines.push(Line::from(vec![
            Span::styled(if active { "> " } else { "  " }, label_style),
            Span::styled(format!("{:<24}", field.label()), label_style),
            Span::styled(value, Style::default().fg(Color::White)),
        ]));
    }

    lines.push(Line::from(""));
    if !app.form.redirect_type.supports_preview() {
        lines.push(Line::from(Span::styled(
            "Preview fields apply to meta and js redirects only",
            Style::default().fg(Color::DarkGray),
        )));
    }
    if submitting {
        lines.push(Line::from(Span::styled(
            "Submit is disabled until the current save completes",
            Style::default().fg(Color::Yellow),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
