use crate::models::SearchMatch;

use super::{Emphasis, render_with};

/// Fixed header row of the search results table
pub const SEARCH_TABLE_HEADER: [&str; 2] = ["Line", "Appears on these line number(s)"];

/// Search results of one submission, ready to be rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTable {
    pub query: String,
    pub matches: Vec<SearchMatch>,
}

impl SearchTable {
    pub fn new(query: impl Into<String>, matches: Vec<SearchMatch>) -> Self {
        Self {
            query: query.into(),
            matches,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Header cells followed by one `[rendered line, line numbers]` pair per match
    pub fn rows(&self, emphasis: Emphasis) -> Vec<[String; 2]> {
        let mut rows = Vec::with_capacity(self.matches.len() + 1);
        rows.push(SEARCH_TABLE_HEADER.map(String::from));
        for m in &self.matches {
            rows.push([
                render_with(&m.line, &m.matched_indexes, emphasis),
                m.line_numbers_display(),
            ]);
        }
        rows
    }

    /// Render the whole table in the layout that suits the emphasis style:
    /// HTML table rows, a Markdown table, or tab-separated terminal lines.
    /// Only the Markdown layout escapes anything: `|` inside a cell.
    pub fn render(&self, emphasis: Emphasis) -> String {
        let rows = self.rows(emphasis);
        match emphasis {
            Emphasis::Html => rows
                .iter()
                .map(|[line, numbers]| format!("<tr><td>{}</td><td>{}</td></tr>", line, numbers))
                .collect::<Vec<_>>()
                .join("\n"),
            Emphasis::Markdown => {
                let mut out = Vec::with_capacity(rows.len() + 1);
                for (i, [line, numbers]) in rows.iter().enumerate() {
                    out.push(format!(
                        "| {} | {} |",
                        escape_cell(line),
                        escape_cell(numbers)
                    ));
                    if i == 0 {
                        out.push("| --- | --- |".to_string());
                    }
                }
                out.join("\n")
            }
            Emphasis::Ansi => rows
                .iter()
                .map(|[line, numbers]| format!("{}\t{}", line, numbers))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// `|` would end a Markdown cell early
fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}

/// Render search matches as a table, header row first. Zero matches
/// give the header alone.
pub fn render_search_table(matches: &[SearchMatch], emphasis: Emphasis) -> String {
    SearchTable::new("", matches.to_vec()).render(emphasis)
}
