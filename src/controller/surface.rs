//! Render surfaces the controller writes to
//!
//! The controller never reads back from a surface. Implementations must not
//! call into the controller from inside these methods: they run while the
//! table state is locked.

use std::fmt::Write as _;

use parking_lot::Mutex;

use crate::highlight::{Emphasis, SearchTable};

use super::TableRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Visible message at the point of an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

pub trait RenderSurface: Send + Sync {
    /// Replace the displayed table
    fn render_rows(&self, rows: &[TableRow]);

    /// Replace the displayed search results
    fn render_search(&self, table: &SearchTable);

    fn notify(&self, notification: Notification);
}

// ============ MemorySurface ============

#[derive(Debug, Default, Clone)]
pub struct SurfaceSnapshot {
    pub rows: Vec<TableRow>,
    pub search: Option<SearchTable>,
    pub notifications: Vec<Notification>,
    /// Number of times the table was rendered
    pub row_renders: usize,
}

/// Keeps the last rendered state in memory
#[derive(Debug, Default)]
pub struct MemorySurface {
    inner: Mutex<SurfaceSnapshot>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.inner.lock().clone()
    }

    pub fn rows(&self) -> Vec<TableRow> {
        self.inner.lock().rows.clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.lock().notifications.clone()
    }

    pub fn last_notification(&self) -> Option<Notification> {
        self.inner.lock().notifications.last().cloned()
    }

    /// Drain pending notifications (the TUI shows each one once)
    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.inner.lock().notifications)
    }
}

impl RenderSurface for MemorySurface {
    fn render_rows(&self, rows: &[TableRow]) {
        let mut inner = self.inner.lock();
        inner.rows = rows.to_vec();
        inner.row_renders += 1;
    }

    fn render_search(&self, table: &SearchTable) {
        self.inner.lock().search = Some(table.clone());
    }

    fn notify(&self, notification: Notification) {
        self.inner.lock().notifications.push(notification);
    }
}

// ============ HtmlSurface ============

/// Produces table markup in the layout of the web console
///
/// Cell text is inserted literally (see [`crate::highlight`]).
#[derive(Debug, Default)]
pub struct HtmlSurface {
    table: Mutex<String>,
    search: Mutex<String>,
    notifications: Mutex<Vec<Notification>>,
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_html(&self) -> String {
        self.table.lock().clone()
    }

    pub fn search_html(&self) -> String {
        self.search.lock().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }
}

impl RenderSurface for HtmlSurface {
    fn render_rows(&self, rows: &[TableRow]) {
        let mut html = String::from("<table>\n<tr><th></th><th>Shortened URL</th><th>Original URL</th><th>Redirect Type</th><th>Visits</th></tr>\n");
        for row in rows {
            let key = &row.summary.shortened_url;
            let _ = writeln!(
                html,
                "<tr id=\"{key}\"><td><input type=\"checkbox\" id=\"{key}Checkbox\" value=\"{key}\"{checked}></td><td>{key}</td><td>{original}</td><td>{redirect}</td><td>{visits}</td></tr>",
                key = key,
                checked = if row.selected { " checked" } else { "" },
                original = row.summary.original_url,
                redirect = row.summary.redirect_type,
                visits = row.summary.visit_count,
            );
        }
        html.push_str("</table>");
        *self.table.lock() = html;
    }

    fn render_search(&self, table: &SearchTable) {
        *self.search.lock() = format!("<table>\n{}\n</table>", table.render(Emphasis::Html));
    }

    fn notify(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SearchMatch, TerseSummary};

    fn row(key: &str, selected: bool) -> TableRow {
        TableRow {
            summary: TerseSummary {
                original_url: format!("https://{}.example", key),
                shortened_url: key.to_string(),
                visit_count: 3,
                ..Default::default()
            },
            selected,
        }
    }

    #[test]
    fn test_memory_surface_records() {
        let surface = MemorySurface::new();
        surface.render_rows(&[row("a", false)]);
        surface.notify(Notification::error("boom"));
        let snap = surface.snapshot();
        assert_eq!(snap.rows.len(), 1);
        assert_eq!(snap.row_renders, 1);
        assert!(snap.notifications[0].is_error());
        assert_eq!(surface.take_notifications().len(), 1);
        assert!(surface.notifications().is_empty());
    }

    #[test]
    fn test_html_surface_rows() {
        let surface = HtmlSurface::new();
        surface.render_rows(&[row("abc", true), row("xyz", false)]);
        let html = surface.table_html();
        assert!(html.contains("<tr id=\"abc\">"));
        assert!(html.contains("value=\"abc\" checked>"));
        assert!(html.contains("value=\"xyz\">"));
        assert!(html.ends_with("</table>"));
    }

    #[test]
    fn test_html_surface_search() {
        let surface = HtmlSurface::new();
        surface.render_search(&SearchTable::new(
            "cat",
            vec![SearchMatch::new("concatenate", [2, 3, 4], [7])],
        ));
        assert!(
            surface
                .search_html()
                .contains("<tr><td>con<strong>cat</strong>enate</td><td>7</td></tr>")
        );
    }
}
