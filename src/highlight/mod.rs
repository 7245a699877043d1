//! Match highlighting
//!
//! Turns a line plus the char offsets a search matched into maximal runs of
//! matched / unmatched text, and renders those runs with emphasis markers.
//!
//! Text is inserted literally: nothing is escaped. The surface that displays
//! the markup owns that boundary; the Markdown table layout only escapes `|`
//! so cells keep their columns.

mod table;

pub use table::{SEARCH_TABLE_HEADER, SearchTable, render_search_table};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A maximal run of characters that are all matched or all unmatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan<'a> {
    pub text: &'a str,
    pub matched: bool,
}

/// Emphasis marker pair wrapped around matched runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    #[default]
    Html,
    Markdown,
    Ansi,
}

impl Emphasis {
    pub fn open(self) -> &'static str {
        match self {
            Emphasis::Html => "<strong>",
            Emphasis::Markdown => "**",
            Emphasis::Ansi => "\x1b[1m",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            Emphasis::Html => "</strong>",
            Emphasis::Markdown => "**",
            Emphasis::Ansi => "\x1b[0m",
        }
    }
}

impl std::str::FromStr for Emphasis {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "markdown" | "md" => Ok(Self::Markdown),
            "ansi" | "terminal" => Ok(Self::Ansi),
            _ => Err(format!(
                "Invalid emphasis style: '{}'. Valid: html, markdown, ansi",
                s
            )),
        }
    }
}

/// Split `line` into maximal runs of constant match membership.
///
/// `matched` holds char offsets; offsets past the end of the line are
/// ignored. Runs borrow from `line`, so concatenating them gives the line
/// back.
pub fn highlight_runs<'a>(line: &'a str, matched: &BTreeSet<usize>) -> Vec<HighlightSpan<'a>> {
    let mut spans = Vec::new();
    // BTreeSet 有序：用游标代替逐字符查找，保持线性
    let mut cursor = matched.iter().copied().peekable();
    let mut run_start = 0usize;
    let mut run_matched: Option<bool> = None;

    for (char_idx, (byte_idx, _)) in line.char_indices().enumerate() {
        while cursor.next_if(|&i| i < char_idx).is_some() {}
        let is_matched = cursor.peek() == Some(&char_idx);

        match run_matched {
            Some(current) if current == is_matched => {}
            Some(current) => {
                spans.push(HighlightSpan {
                    text: &line[run_start..byte_idx],
                    matched: current,
                });
                run_start = byte_idx;
                run_matched = Some(is_matched);
            }
            None => run_matched = Some(is_matched),
        }
    }

    // Flush the trailing run, closing an emphasis that reaches the last char
    if let Some(current) = run_matched {
        spans.push(HighlightSpan {
            text: &line[run_start..],
            matched: current,
        });
    }

    spans
}

/// Render with HTML `<strong>` emphasis.
pub fn render(line: &str, matched: &BTreeSet<usize>) -> String {
    render_with(line, matched, Emphasis::Html)
}

/// Render with the given emphasis markers.
pub fn render_with(line: &str, matched: &BTreeSet<usize>, emphasis: Emphasis) -> String {
    let mut out = String::with_capacity(line.len() + 16);
    for span in highlight_runs(line, matched) {
        if span.matched {
            out.push_str(emphasis.open());
            out.push_str(span.text);
            out.push_str(emphasis.close());
        } else {
            out.push_str(span.text);
        }
    }
    out
}

/// Remove every emphasis marker from rendered markup.
pub fn strip_emphasis(markup: &str, emphasis: Emphasis) -> String {
    let open = emphasis.open();
    let close = emphasis.close();
    if open == close {
        return markup.replace(open, "");
    }
    markup.replace(open, "").replace(close, "")
}
