//! App state definition and basic state management
//!
//! The table, selection and notifications live in the controller and its
//! [`MemorySurface`]; the App only keeps screen-local state (cursor, form,
//! search input) and the channel background actions report back through.

mod form_state;

pub use form_state::{FormField, FormState};

use std::path::PathBuf;
use std::sync::Arc;

use ratatui::widgets::TableState;
use tokio::sync::mpsc;

use crate::controller::{
    Control, EntityTableController, MemorySurface, NotificationLevel, TableRow,
};
use crate::models::{TerseRecord, WriteOperation};

/// 当前屏幕
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentScreen {
    Main,
    Form,
    DeleteConfirm,
    Search,
    Help,
}

/// What a delete confirmation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Row(String),
    Selected(usize),
    All,
}

/// Results of background actions the screen reacts to
#[derive(Debug)]
pub enum AppEvent {
    RecordLoaded(TerseRecord),
    WriteFinished { ok: bool },
    Exported(Result<PathBuf, String>),
}

pub struct App {
    pub controller: Arc<EntityTableController>,
    pub surface: Arc<MemorySurface>,
    pub current_screen: CurrentScreen,
    pub form: FormState,
    pub delete_target: Option<DeleteTarget>,
    pub search_input: String,
    pub table_state: TableState,
    pub status_message: String,
    pub error_message: String,
    pub export_dir: PathBuf,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(
        controller: Arc<EntityTableController>,
        surface: Arc<MemorySurface>,
        export_dir: PathBuf,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut table_state = TableState::default();
        table_state.select(Some(0));
        Self {
            controller,
            surface,
            current_screen: CurrentScreen::Main,
            form: FormState::new(),
            delete_target: None,
            search_input: String::new(),
            table_state,
            status_message: String::new(),
            error_message: String::new(),
            export_dir,
            events_tx,
            events_rx,
        }
    }

    /// Rows as last rendered
    pub fn rows(&self) -> Vec<TableRow> {
        self.surface.rows()
    }

    pub fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Key of the row under the cursor
    pub fn current_key(&self) -> Option<String> {
        self.rows()
            .get(self.selected_index())
            .map(|r| r.key().to_string())
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.controller.row_count();
        if count == 0 {
            self.table_state.select(Some(0));
            return;
        }
        let current = self.selected_index().min(count - 1) as isize;
        let next = (current + delta).clamp(0, count as isize - 1);
        self.table_state.select(Some(next as usize));
    }

    pub fn is_busy(&self, control: Control) -> bool {
        !self.controller.is_enabled(control)
    }

    pub fn clear_messages(&mut self) {
        self.status_message.clear();
        self.error_message.clear();
    }

    /// Pull notifications and finished background actions into screen state.
    pub fn sync(&mut self) {
        for notification in self.surface.take_notifications() {
            match notification.level {
                NotificationLevel::Error => {
                    self.error_message = notification.message;
                    self.status_message.clear();
                }
                NotificationLevel::Info | NotificationLevel::Success => {
                    self.status_message = notification.message;
                    self.error_message.clear();
                }
            }
        }

        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::RecordLoaded(record) => {
                    self.form = FormState::from_record(&record);
                    self.current_screen = CurrentScreen::Form;
                }
                AppEvent::WriteFinished { ok } => {
                    // 失败时保留表单，便于修改后重新提交
                    if ok && self.current_screen == CurrentScreen::Form {
                        self.current_screen = CurrentScreen::Main;
                    }
                }
                AppEvent::Exported(Ok(path)) => {
                    self.status_message = format!("Exported to {}", path.display());
                    self.error_message.clear();
                }
                AppEvent::Exported(Err(message)) => {
                    self.error_message = message;
                    self.status_message.clear();
                }
            }
        }

        let count = self.controller.row_count();
        if self.selected_index() >= count && count > 0 {
            self.table_state.select(Some(count - 1));
        }
    }

    // ============ Background actions ============

    pub fn spawn_refresh(&self) {
        let controller = self.controller.clone();
        tokio::spawn(async move {
            let _ = controller.load_prefix().await;
            let _ = controller.refresh().await;
        });
    }

    pub fn spawn_edit(&self, key: String) {
        let controller = self.controller.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            if let Ok(record) = controller.load_record(&key).await {
                let _ = tx.send(AppEvent::RecordLoaded(record));
            }
        });
    }

    pub fn spawn_write(&self, op: WriteOperation, record: TerseRecord) {
        let controller = self.controller.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let ok = controller.write(op, record).await.is_ok();
            let _ = tx.send(AppEvent::WriteFinished { ok });
        });
    }

    pub fn spawn_delete(&self, target: DeleteTarget) {
        let controller = self.controller.clone();
        tokio::spawn(async move {
            let _ = match target {
                DeleteTarget::Row(key) => controller.delete_one(&key).await,
                DeleteTarget::Selected(_) => controller.delete_selected().await,
                DeleteTarget::All => controller.delete_all().await,
            };
        });
    }

    pub fn spawn_export(&self) {
        let controller = self.controller.clone();
        let tx = self.events_tx.clone();
        let dir = self.export_dir.clone();
        tokio::spawn(async move {
            let Ok(file) = controller.export_selected().await else {
                return;
            };
            let saved = file.save(&dir).map_err(|e| {
                tracing::warn!("Saving export failed: {}", e);
                e.format_simple()
            });
            let _ = tx.send(AppEvent::Exported(saved));
        });
    }

    pub fn spawn_search(&self, query: String) {
        let controller = self.controller.clone();
        tokio::spawn(async move {
            let _ = controller.search(&query).await;
        });
    }
}
