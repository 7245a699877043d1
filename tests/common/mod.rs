//! In-memory store shared by the integration tests

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use terse_console::client::{ClientError, TerseApi};
use terse_console::models::{
    DeleteFlags, ExportEntry, ExportPayload, ExportSelection, MediaPreview, RedirectType,
    SearchMatch, SummarySet, TerseRecord, TerseSummary, WriteOperation,
};

/// Scripted fake of the remote store
#[derive(Default)]
pub struct FakeApi {
    records: Mutex<BTreeMap<String, TerseRecord>>,
    visits: Mutex<BTreeMap<String, u64>>,
    failures: Mutex<HashMap<&'static str, ClientError>>,
    calls: Mutex<Vec<String>>,
    held_writes: Mutex<Option<oneshot::Receiver<()>>>,
    meta: Mutex<Option<MediaPreview>>,
    written: Mutex<Vec<TerseRecord>>,
    generated: Mutex<u32>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `https://{key}.example` records
    pub fn seeded(keys: &[&str]) -> Self {
        let api = Self::new();
        for key in keys {
            api.insert(TerseRecord::new(format!("https://{}.example", key), *key));
        }
        api
    }

    pub fn insert(&self, record: TerseRecord) {
        self.records
            .lock()
            .insert(record.shortened_url.clone(), record);
    }

    pub fn set_visits(&self, key: &str, count: u64) {
        self.visits.lock().insert(key.to_string(), count);
    }

    /// Every later call of `op` fails with `err`
    pub fn fail(&self, op: &'static str, err: ClientError) {
        self.failures.lock().insert(op, err);
    }

    pub fn recover(&self, op: &'static str) {
        self.failures.lock().remove(op);
    }

    /// The next write waits until the returned sender fires
    pub fn hold_next_write(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.held_writes.lock() = Some(rx);
        tx
    }

    pub fn set_meta(&self, meta: MediaPreview) {
        *self.meta.lock() = Some(meta);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == op).count()
    }

    pub fn written(&self) -> Vec<TerseRecord> {
        self.written.lock().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.records.lock().keys().cloned().collect()
    }

    fn enter(&self, op: &'static str) -> Result<(), ClientError> {
        self.calls.lock().push(op.to_string());
        match self.failures.lock().get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn summary_of(&self, record: &TerseRecord) -> TerseSummary {
        TerseSummary {
            original_url: record.original_url.clone(),
            shortened_url: record.shortened_url.clone(),
            redirect_type: record.redirect_type,
            visit_count: self
                .visits
                .lock()
                .get(&record.shortened_url)
                .copied()
                .unwrap_or(0),
        }
    }
}

fn not_found() -> ClientError {
    ClientError::Rejected {
        status: 400,
        message: "Shortened URL not found.".to_string(),
    }
}

#[async_trait]
impl TerseApi for FakeApi {
    async fn summarize(&self, keys: Option<&BTreeSet<String>>) -> Result<SummarySet, ClientError> {
        self.enter("summarize")?;
        let records = self.records.lock().clone();
        Ok(records
            .values()
            .filter(|r| keys.is_none_or(|k| k.contains(&r.shortened_url)))
            .map(|r| (r.shortened_url.clone(), self.summary_of(r)))
            .collect())
    }

    async fn read(&self, key: &str) -> Result<TerseRecord, ClientError> {
        self.enter("read")?;
        self.records.lock().get(key).cloned().ok_or_else(not_found)
    }

    async fn write(
        &self,
        op: WriteOperation,
        record: &TerseRecord,
    ) -> Result<String, ClientError> {
        let held = self.held_writes.lock().take();
        if let Some(rx) = held {
            let _ = rx.await;
        }
        self.enter("write")?;
        self.written.lock().push(record.clone());

        let mut record = record.clone();
        if record.shortened_url.is_empty() {
            let mut n = self.generated.lock();
            *n += 1;
            record.shortened_url = format!("gen{}", *n);
        }
        let key = record.shortened_url.clone();

        let mut records = self.records.lock();
        match (op, records.contains_key(&key)) {
            (WriteOperation::Insert, true) => Err(ClientError::Rejected {
                status: 409,
                message: "Shortened URL already exists.".to_string(),
            }),
            (WriteOperation::Update, false) => Err(not_found()),
            _ => {
                records.insert(key.clone(), record);
                Ok(key)
            }
        }
    }

    async fn delete_one(&self, key: &str, _flags: DeleteFlags) -> Result<(), ClientError> {
        self.enter("delete_one")?;
        self.records.lock().remove(key).map(|_| ()).ok_or_else(not_found)
    }

    async fn delete_many(
        &self,
        keys: &BTreeSet<String>,
        _flags: DeleteFlags,
    ) -> Result<(), ClientError> {
        self.enter("delete_many")?;
        let mut records = self.records.lock();
        for key in keys {
            records.remove(key);
        }
        Ok(())
    }

    async fn delete_all(&self, flags: DeleteFlags) -> Result<(), ClientError> {
        self.enter("delete_all")?;
        if flags.terse {
            self.records.lock().clear();
        }
        if flags.visits {
            self.visits.lock().clear();
        }
        Ok(())
    }

    async fn export(&self, selection: &ExportSelection) -> Result<ExportPayload, ClientError> {
        self.enter("export")?;
        let records = self.records.lock();
        let entries = records
            .values()
            .filter(|r| match selection {
                ExportSelection::All => true,
                ExportSelection::Keys(keys) => keys.contains(&r.shortened_url),
            })
            .map(|r| ExportEntry {
                terse: r.clone(),
                visits: Vec::new(),
            })
            .collect();
        Ok(ExportPayload(entries))
    }

    async fn import(
        &self,
        payload: &ExportPayload,
        wipe: Option<DeleteFlags>,
    ) -> Result<(), ClientError> {
        self.enter("import")?;
        let mut records = self.records.lock();
        if wipe.is_some_and(|f| f.terse) {
            records.clear();
        }
        for (key, entry) in payload.keyed() {
            records.insert(key, entry.terse);
        }
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchMatch>, ClientError> {
        self.enter("search")?;
        let records = self.records.lock();
        Ok(records
            .values()
            .enumerate()
            .filter_map(|(line_no, r)| {
                let line = &r.original_url;
                let byte_start = line.find(query)?;
                let start = line[..byte_start].chars().count();
                let len = query.chars().count();
                Some(SearchMatch::new(
                    line.clone(),
                    start..start + len,
                    [line_no as u64 + 1],
                ))
            })
            .collect())
    }

    async fn prefix(&self) -> Result<String, ClientError> {
        self.enter("prefix")?;
        Ok("https://t.example/".to_string())
    }

    async fn frontend_meta(&self, _original_url: &str) -> Result<MediaPreview, ClientError> {
        self.enter("frontend_meta")?;
        self.meta
            .lock()
            .clone()
            .ok_or_else(|| ClientError::Transport("page unreachable".to_string()))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Record with a preview that asks to inherit from the original page
pub fn inheriting_record(key: &str, title: &str) -> TerseRecord {
    TerseRecord {
        original_url: format!("https://{}.example", key),
        shortened_url: key.to_string(),
        redirect_type: RedirectType::Meta,
        javascript_tracking: false,
        media_preview: Some(MediaPreview {
            title: title.to_string(),
            inherit_from_original: true,
            ..Default::default()
        }),
    }
}
