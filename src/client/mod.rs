//! Client layer for the remote Terse store
//!
//! Every remote operation the console needs goes through [`TerseApi`]. The
//! table controller only ever sees this trait, so the HTTP transport can be
//! swapped for an in-memory fake in tests.
//!
//! # Architecture
//!
//! ```text
//! CLI/TUI → EntityTableController → TerseApi ──→ HttpTerseApi (ureq, spawn_blocking)
//!                                            └→ test doubles
//! ```
//!
//! # Failure Policy
//!
//! - No retries at this layer. A failed call is reported once and the user resubmits.
//! - `ClientError::Transport` → the request never produced an HTTP response
//! - `ClientError::Rejected` → the store answered with a non-2xx status
//! - `ClientError::Malformed` → 2xx, but the body did not have the expected shape

mod http;
pub mod wire;

pub use http::HttpTerseApi;

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;

use crate::models::{
    DeleteFlags, ExportPayload, ExportSelection, MediaPreview, SearchMatch, SummarySet,
    TerseRecord, WriteOperation,
};

// ============ ClientError ============

/// Errors from the client layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Network failure: connect, timeout, broken body
    Transport(String),
    /// Remote-side rejection (validation, not-found, conflict, server error)
    Rejected { status: u16, message: String },
    /// Unexpected response shape
    Malformed(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ClientError::Rejected { status, message } => {
                write!(f, "Rejected (HTTP {}): {}", status, message)
            }
            ClientError::Malformed(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

// ============ TerseApi ============

/// Remote operations consumed by the console.
#[async_trait]
pub trait TerseApi: Send + Sync {
    /// Summaries for the given keys, or for everything when `keys` is `None`
    async fn summarize(&self, keys: Option<&BTreeSet<String>>) -> Result<SummarySet, ClientError>;

    /// Full record of one shortened URL
    async fn read(&self, key: &str) -> Result<TerseRecord, ClientError>;

    /// Write a record; returns the shortened URL affected (server-assigned
    /// when the record carried none)
    async fn write(&self, op: WriteOperation, record: &TerseRecord)
    -> Result<String, ClientError>;

    async fn delete_one(&self, key: &str, flags: DeleteFlags) -> Result<(), ClientError>;

    async fn delete_many(
        &self,
        keys: &BTreeSet<String>,
        flags: DeleteFlags,
    ) -> Result<(), ClientError>;

    /// Purge all Terse and/or Visits data
    async fn delete_all(&self, flags: DeleteFlags) -> Result<(), ClientError>;

    async fn export(&self, selection: &ExportSelection) -> Result<ExportPayload, ClientError>;

    /// Import previously exported data. With `wipe` set, the matching data is
    /// deleted before importing.
    async fn import(
        &self,
        payload: &ExportPayload,
        wipe: Option<DeleteFlags>,
    ) -> Result<(), ClientError>;

    async fn search(&self, query: &str) -> Result<Vec<SearchMatch>, ClientError>;

    /// Host prefix every shortened URL is served under
    async fn prefix(&self) -> Result<String, ClientError>;

    /// Best-effort preview metadata extracted from the original page
    async fn frontend_meta(&self, original_url: &str) -> Result<MediaPreview, ClientError>;

    fn name(&self) -> &'static str;
}
