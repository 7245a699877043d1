//! Entity table controller
//!
//! Owns the visible table (summary rows plus per-row selection), runs every
//! remote action through a [`SubmitGate`], and rebuilds the table from a
//! fresh summary set after each successful mutation. Nothing is patched
//! optimistically: rows only ever come from the remote store.
//!
//! # Action lifecycle
//!
//! ```text
//! Idle → Submitting ─┬─ success → Refreshing → Idle
//!                    └─ failure → Idle   (notified, table untouched)
//! ```
//!
//! # Refresh ordering
//!
//! Each refresh takes a ticket from a monotonically increasing counter. With
//! [`RefreshOrdering::LastIssuedWins`] a response older than the newest one
//! already applied is discarded; with [`RefreshOrdering::LastResolvedWins`]
//! responses are applied in the order they resolve.

mod export;
mod gate;
mod surface;

pub use export::{DEFAULT_EXPORT_FILENAME, ExportFile, export_filename};
pub use gate::{ActionGuard, Control, ControlPhase, SubmitGate};
pub use surface::{
    HtmlSurface, MemorySurface, Notification, NotificationLevel, RenderSurface, SurfaceSnapshot,
};

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};
use tracing::{debug, info, warn};

use crate::client::{ClientError, TerseApi};
use crate::config::StaticConfig;
use crate::errors::{Result, TerseError};
use crate::highlight::SearchTable;
use crate::models::{
    DeleteFlags, ExportPayload, ExportSelection, PreviewMergePolicy, SummarySet, TerseRecord,
    TerseSummary, WriteOperation,
};

/// Which of two overlapping refreshes ends up on screen
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RefreshOrdering {
    /// Responses older than the newest applied one are discarded
    #[default]
    LastIssuedWins,
    /// Whatever resolves last is shown
    LastResolvedWins,
}

impl std::fmt::Display for RefreshOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for RefreshOrdering {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "last_issued_wins" => Ok(Self::LastIssuedWins),
            "last_resolved_wins" => Ok(Self::LastResolvedWins),
            _ => Err(format!(
                "Invalid refresh ordering: '{}'. Valid: last_issued_wins, last_resolved_wins",
                s
            )),
        }
    }
}

/// One table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub summary: TerseSummary,
    pub selected: bool,
}

impl TableRow {
    pub fn key(&self) -> &str {
        &self.summary.shortened_url
    }
}

/// Sequence number of one refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { rows: usize },
    /// A newer refresh was already on screen
    Stale,
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub refresh_ordering: RefreshOrdering,
    pub delete_flags: DeleteFlags,
    pub merge_policy: PreviewMergePolicy,
    /// Ask the store for the original page's metadata when a preview
    /// inherits from it
    pub fetch_preview_on_write: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            refresh_ordering: RefreshOrdering::default(),
            delete_flags: DeleteFlags::default(),
            merge_policy: PreviewMergePolicy::default(),
            fetch_preview_on_write: true,
        }
    }
}

impl From<&StaticConfig> for ControllerOptions {
    fn from(config: &StaticConfig) -> Self {
        Self {
            refresh_ordering: config.table.refresh_ordering,
            delete_flags: config.table.delete_flags(),
            merge_policy: config.preview.merge_policy,
            fetch_preview_on_write: config.preview.fetch_on_write,
        }
    }
}

#[derive(Debug, Default)]
struct TableState {
    rows: Vec<TableRow>,
    latest_applied: u64,
}

pub struct EntityTableController {
    api: Arc<dyn TerseApi>,
    surface: Arc<dyn RenderSurface>,
    options: ControllerOptions,
    state: Mutex<TableState>,
    refresh_seq: AtomicU64,
    gate: SubmitGate,
    filter: Mutex<Option<BTreeSet<String>>>,
    prefix: Mutex<Option<String>>,
    search: Mutex<Option<SearchTable>>,
}

impl EntityTableController {
    pub fn new(
        api: Arc<dyn TerseApi>,
        surface: Arc<dyn RenderSurface>,
        options: ControllerOptions,
    ) -> Self {
        debug!(
            "Table controller over {} store, ordering={}, merge={}",
            api.name(),
            options.refresh_ordering,
            options.merge_policy
        );
        Self {
            api,
            surface,
            options,
            state: Mutex::new(TableState::default()),
            refresh_seq: AtomicU64::new(0),
            gate: SubmitGate::new(),
            filter: Mutex::new(None),
            prefix: Mutex::new(None),
            search: Mutex::new(None),
        }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    // ============ Table state ============

    pub fn rows(&self) -> Vec<TableRow> {
        self.state.lock().rows.clone()
    }

    pub fn row_count(&self) -> usize {
        self.state.lock().rows.len()
    }

    pub fn phase(&self, control: Control) -> ControlPhase {
        self.gate.phase(control)
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        self.gate.is_enabled(control)
    }

    /// Restrict refreshes to the given keys; `None` shows everything.
    pub fn set_filter(&self, keys: Option<BTreeSet<String>>) {
        *self.filter.lock() = keys;
    }

    pub fn filter(&self) -> Option<BTreeSet<String>> {
        self.filter.lock().clone()
    }

    /// Host prefix loaded by [`Self::load_prefix`]
    pub fn prefix(&self) -> Option<String> {
        self.prefix.lock().clone()
    }

    /// Results of the latest successful search
    pub fn search_results(&self) -> Option<SearchTable> {
        self.search.lock().clone()
    }

    // ============ Refresh ============

    /// Take the next ticket. Call before issuing the summary request.
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Apply (or discard) the response of the refresh holding `ticket`.
    ///
    /// Applying replaces the rows wholesale and clears every selection.
    pub fn complete_refresh(
        &self,
        ticket: RefreshTicket,
        result: std::result::Result<SummarySet, ClientError>,
    ) -> Result<RefreshOutcome> {
        let summaries = match result {
            Ok(summaries) => summaries,
            Err(e) => return Err(self.fail("Refreshing the table", e.into())),
        };

        let mut state = self.state.lock();
        if self.options.refresh_ordering == RefreshOrdering::LastIssuedWins
            && ticket.0 < state.latest_applied
        {
            warn!(
                "Discarding stale refresh #{} (#{} already applied)",
                ticket.0, state.latest_applied
            );
            return Ok(RefreshOutcome::Stale);
        }

        state.rows = project(summaries);
        state.latest_applied = state.latest_applied.max(ticket.0);
        debug!("Refresh #{} applied: {} row(s)", ticket.0, state.rows.len());
        self.surface.render_rows(&state.rows);
        Ok(RefreshOutcome::Applied {
            rows: state.rows.len(),
        })
    }

    /// Fetch the (filtered) summary set and rebuild the table
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let ticket = self.begin_refresh();
        let filter = self.filter();
        let result = self.api.summarize(filter.as_ref()).await;
        self.complete_refresh(ticket, result)
    }

    // ============ Selection ============

    /// Set `selected` on every row
    pub fn toggle_select_all(&self, checked: bool) {
        let state = &mut *self.state.lock();
        for row in state.rows.iter_mut() {
            row.selected = checked;
        }
        self.surface.render_rows(&state.rows);
    }

    /// Flip one row; `None` when the key is not in the table
    pub fn toggle_row(&self, key: &str) -> Option<bool> {
        let state = &mut *self.state.lock();
        let row = state.rows.iter_mut().find(|r| r.key() == key)?;
        row.selected = !row.selected;
        let selected = row.selected;
        self.surface.render_rows(&state.rows);
        Some(selected)
    }

    /// Returns false when the key is not in the table
    pub fn set_selected(&self, key: &str, selected: bool) -> bool {
        let state = &mut *self.state.lock();
        let Some(row) = state.rows.iter_mut().find(|r| r.key() == key) else {
            return false;
        };
        if row.selected != selected {
            row.selected = selected;
            self.surface.render_rows(&state.rows);
        }
        true
    }

    pub fn selected_keys(&self) -> BTreeSet<String> {
        self.state
            .lock()
            .rows
            .iter()
            .filter(|r| r.selected)
            .map(|r| r.summary.shortened_url.clone())
            .collect()
    }

    // ============ Mutations ============

    /// Validate, complete the media preview, write, and refresh on success.
    ///
    /// Returns the shortened URL the store wrote.
    pub async fn write(&self, op: WriteOperation, record: TerseRecord) -> Result<String> {
        self.run_mutation(
            Control::WriteForm,
            &format!("{} {}", capitalize(op.as_ref()), record.original_url),
            async {
                let record = self.prepare_record(record).await?;
                Ok::<_, TerseError>(self.api.write(op, &record).await?)
            },
            |key| format!("Saved {}", key),
        )
        .await
    }

    pub async fn delete_one(&self, key: &str) -> Result<()> {
        self.run_mutation(
            Control::DeleteRow,
            &format!("Deleting {}", key),
            async {
                if key.trim().is_empty() {
                    return Err(TerseError::validation("Shortened URL cannot be empty"));
                }
                Ok(self.api.delete_one(key, self.options.delete_flags).await?)
            },
            |_| format!("Deleted {}", key),
        )
        .await
    }

    pub async fn delete_many(&self, keys: &BTreeSet<String>) -> Result<()> {
        self.delete_keys(Control::DeleteSelected, keys).await
    }

    /// Delete every selected row
    pub async fn delete_selected(&self) -> Result<()> {
        let keys = self.selected_keys();
        self.delete_keys(Control::DeleteSelected, &keys).await
    }

    /// Purge the whole store (Terse and/or Visits data per the delete flags)
    pub async fn delete_all(&self) -> Result<()> {
        let flags = self.options.delete_flags;
        self.run_mutation(
            Control::DeleteAll,
            "Deleting all data",
            async { Ok::<_, TerseError>(self.api.delete_all(flags).await?) },
            |_| "Deleted all data".to_string(),
        )
        .await
    }

    /// Import an export document. With `wipe`, existing data is deleted first.
    pub async fn import(&self, payload: &ExportPayload, wipe: bool) -> Result<usize> {
        let wipe = wipe.then_some(self.options.delete_flags);
        self.run_mutation(
            Control::Import,
            "Importing",
            async {
                if payload.is_empty() {
                    return Err(TerseError::validation("Nothing to import"));
                }
                self.api.import(payload, wipe).await?;
                Ok(payload.len())
            },
            |count| format!("Imported {} record(s)", count),
        )
        .await
    }

    // ============ Queries ============

    /// Fetch export data; the filename follows [`export_filename`].
    pub async fn export(&self, selection: ExportSelection) -> Result<ExportFile> {
        let _guard = self.gate.begin(Control::Export)?;
        match self.api.export(&selection).await {
            Ok(payload) => {
                let file = ExportFile::new(&selection, payload);
                info!(
                    "Export ready: {} ({} record(s))",
                    file.filename,
                    file.payload.len()
                );
                Ok(file)
            }
            Err(e) => Err(self.fail("Exporting", e.into())),
        }
    }

    /// Export the selected rows, or everything when nothing is selected
    pub async fn export_selected(&self) -> Result<ExportFile> {
        let keys = self.selected_keys();
        let selection = if keys.is_empty() {
            ExportSelection::All
        } else {
            ExportSelection::Keys(keys)
        };
        self.export(selection).await
    }

    /// Run a search and render its highlighted results table.
    ///
    /// The previous results are replaced only when the search succeeds.
    pub async fn search(&self, query: &str) -> Result<SearchTable> {
        let _guard = self.gate.begin(Control::Search)?;
        if query.trim().is_empty() {
            return Err(self.fail(
                "Searching",
                TerseError::validation("Search query cannot be empty"),
            ));
        }

        match self.api.search(query).await {
            Ok(matches) => {
                let table = SearchTable::new(query, matches);
                debug!("Search '{}' matched {} line(s)", query, table.matches.len());
                *self.search.lock() = Some(table.clone());
                self.surface.render_search(&table);
                Ok(table)
            }
            Err(e) => Err(self.fail("Searching", e.into())),
        }
    }

    /// Fetch and cache the short-URL host prefix
    pub async fn load_prefix(&self) -> Result<String> {
        match self.api.prefix().await {
            Ok(prefix) => {
                *self.prefix.lock() = Some(prefix.clone());
                Ok(prefix)
            }
            Err(e) => Err(self.fail("Loading the URL prefix", e.into())),
        }
    }

    /// Full record for the edit form
    pub async fn load_record(&self, key: &str) -> Result<TerseRecord> {
        match self.api.read(key).await {
            Ok(mut record) => {
                if record.shortened_url.is_empty() {
                    record.shortened_url = key.to_string();
                }
                Ok(record)
            }
            Err(e) => Err(self.fail(&format!("Loading {}", key), e.into())),
        }
    }

    // ============ Internals ============

    async fn delete_keys(&self, control: Control, keys: &BTreeSet<String>) -> Result<()> {
        self.run_mutation(
            control,
            &format!("Deleting {} record(s)", keys.len()),
            async {
                if keys.is_empty() {
                    return Err(TerseError::validation("No shortened URLs selected"));
                }
                Ok(self.api.delete_many(keys, self.options.delete_flags).await?)
            },
            |_| format!("Deleted {} record(s)", keys.len()),
        )
        .await
    }

    async fn prepare_record(&self, record: TerseRecord) -> Result<TerseRecord> {
        record.validate()?;
        let mut record = record.normalized();

        if self.options.fetch_preview_on_write && record.wants_inherited_preview() {
            match self.api.frontend_meta(&record.original_url).await {
                Ok(extracted) => {
                    if let Some(preview) = record.media_preview.as_mut() {
                        *preview = preview.merge(&extracted, self.options.merge_policy);
                    }
                }
                Err(e) => {
                    // 预览元数据只是尽力而为，不阻塞写入
                    warn!(
                        "Preview metadata for {} unavailable: {}",
                        record.original_url, e
                    );
                    self.surface.notify(Notification::info(format!(
                        "Could not read preview metadata from {}; saving the preview as entered",
                        record.original_url
                    )));
                }
            }
        }
        Ok(record)
    }

    /// Gate, run, and on success notify and refresh. A failure is notified
    /// once and never followed by a refresh.
    async fn run_mutation<T, Fut>(
        &self,
        control: Control,
        action: &str,
        fut: Fut,
        success: impl FnOnce(&T) -> String,
    ) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let guard = self.gate.begin(control)?;

        let value = match fut.await {
            Ok(value) => value,
            Err(e) => return Err(self.fail(action, e)),
        };

        let message = success(&value);
        info!("{}", message);
        self.surface.notify(Notification::success(message));

        guard.refreshing();
        if let Err(e) = self.refresh().await {
            warn!("{} succeeded but the table was not refreshed: {}", action, e);
        }
        Ok(value)
    }

    fn fail(&self, action: &str, err: TerseError) -> TerseError {
        warn!("{} failed: {}", action, err);
        self.surface.notify(Notification::error(format!(
            "{} failed: {}",
            action,
            err.format_simple()
        )));
        err
    }
}

fn project(summaries: SummarySet) -> Vec<TableRow> {
    summaries
        .into_iter()
        .map(|(key, mut summary)| {
            if summary.shortened_url.is_empty() {
                summary.shortened_url = key;
            }
            TableRow {
                summary,
                selected: false,
            }
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
