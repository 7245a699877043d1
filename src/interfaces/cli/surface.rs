//! Render surface that prints to the terminal

use colored::Colorize;

use crate::controller::{Notification, NotificationLevel, RenderSurface, TableRow};
use crate::highlight::{Emphasis, SEARCH_TABLE_HEADER, SearchTable, highlight_runs};

/// How much of the table a render prints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowsMode {
    Full,
    /// Only the row count (after a mutation)
    CountOnly,
    Silent,
}

pub struct TerminalSurface {
    emphasis: Emphasis,
    rows: RowsMode,
}

impl TerminalSurface {
    pub fn new(emphasis: Emphasis, rows: RowsMode) -> Self {
        Self { emphasis, rows }
    }
}

/// One table line: `[x] key -> original (redirect) (visits: n)`
pub fn format_row(row: &TableRow) -> String {
    let mark = if row.selected { "[x]" } else { "[ ]" };
    let mut parts = vec![format!(
        "{} {} -> {}",
        mark.dimmed(),
        row.summary.shortened_url.cyan(),
        row.summary.original_url.blue().underline()
    )];
    parts.push(
        format!("({})", row.summary.redirect_type)
            .dimmed()
            .yellow()
            .to_string(),
    );
    if row.summary.visit_count > 0 {
        parts.push(
            format!("(visits: {})", row.summary.visit_count)
                .dimmed()
                .cyan()
                .to_string(),
        );
    }
    parts.join(" ")
}

/// Matched runs in bold through `colored`, so NO_COLOR is honoured
pub fn bold_matches(line: &str, matched: &std::collections::BTreeSet<usize>) -> String {
    highlight_runs(line, matched)
        .into_iter()
        .map(|span| {
            if span.matched {
                span.text.bold().to_string()
            } else {
                span.text.to_string()
            }
        })
        .collect()
}

impl RenderSurface for TerminalSurface {
    fn render_rows(&self, rows: &[TableRow]) {
        match self.rows {
            RowsMode::Silent => {}
            RowsMode::CountOnly => {
                println!(
                    "{} Table now holds {} record(s)",
                    "ℹ".bold().blue(),
                    rows.len().to_string().green()
                );
            }
            RowsMode::Full if rows.is_empty() => {
                println!("{} No shortened URLs found", "ℹ".bold().blue());
            }
            RowsMode::Full => {
                println!("{}", "Shortened URLs:".bold().green());
                println!();
                for row in rows {
                    println!("  {}", format_row(row));
                }
                println!();
                println!(
                    "{} Total {} shortened URLs",
                    "ℹ".bold().blue(),
                    rows.len().to_string().green()
                );
            }
        }
    }

    fn render_search(&self, table: &SearchTable) {
        match self.emphasis {
            Emphasis::Ansi => {
                println!(
                    "{}\t{}",
                    SEARCH_TABLE_HEADER[0].bold().green(),
                    SEARCH_TABLE_HEADER[1].bold().green()
                );
                for m in &table.matches {
                    println!(
                        "{}\t{}",
                        bold_matches(&m.line, &m.matched_indexes),
                        m.line_numbers_display().dimmed()
                    );
                }
                if table.is_empty() {
                    println!("{} No matches for '{}'", "ℹ".bold().blue(), table.query);
                }
            }
            other => println!("{}", table.render(other)),
        }
    }

    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => {
                println!("{} {}", "ℹ".bold().blue(), notification.message)
            }
            NotificationLevel::Success => {
                println!("{} {}", "✓".bold().green(), notification.message)
            }
            NotificationLevel::Error => {
                eprintln!("{} {}", "✗".bold().red(), notification.message.red())
            }
        }
    }
}
