//! Request and response shaping for the HTTP API
//!
//! Pure functions, kept apart from the transport so they can be tested
//! without a server.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::models::{DeleteFlags, ExportPayload, MediaPreview, WriteOperation};

use super::ClientError;

pub const SUMMARY_PATH: &str = "/api/summary";
pub const DELETE_SOME_PATH: &str = "/api/delete/some";
pub const DELETE_ALL_PATH: &str = "/api/delete";
pub const EXPORT_ALL_PATH: &str = "/api/export";
pub const EXPORT_SOME_PATH: &str = "/api/export/some";
pub const IMPORT_PATH: &str = "/api/import";
pub const PREFIX_PATH: &str = "/api/prefix";

pub fn write_path(op: WriteOperation) -> String {
    format!("/api/write/{}", op)
}

pub fn read_path(key: &str) -> String {
    format!("/api/terse/{}", urlencoding::encode(key))
}

pub fn search_path(query: &str) -> String {
    format!("/api/search?q={}", urlencoding::encode(query))
}

pub fn frontend_meta_path(original_url: &str) -> String {
    format!(
        "/api/frontend/meta?originalURL={}",
        urlencoding::encode(original_url)
    )
}

/// `null` asks for every summary
pub fn summary_body(keys: Option<&BTreeSet<String>>) -> Value {
    match keys {
        Some(keys) => json!(keys),
        None => Value::Null,
    }
}

pub fn delete_some_body(keys: &BTreeSet<String>, flags: DeleteFlags) -> Value {
    json!({
        "delete": flags,
        "shortenedURLs": keys,
    })
}

pub fn export_some_body(keys: &BTreeSet<String>) -> Value {
    json!(keys)
}

pub fn import_body(payload: &ExportPayload, wipe: Option<DeleteFlags>) -> Value {
    let mut body = json!({ "import": payload.keyed() });
    if let Some(flags) = wipe {
        body["delete"] = json!(flags);
    }
    body
}

/// Decode a 2xx body.
pub fn parse_json<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, ClientError> {
    serde_json::from_str(body)
        .map_err(|e| ClientError::Malformed(format!("{}: {}", what, e)))
}

/// The write call answers with the affected shortened URL as a JSON string.
pub fn parse_written_key(body: &str, requested: &str) -> Result<String, ClientError> {
    if body.trim().is_empty() {
        if requested.is_empty() {
            return Err(ClientError::Malformed(
                "write response carried no shortened URL".to_string(),
            ));
        }
        return Ok(requested.to_string());
    }
    parse_json::<String>(body, "write response")
}

#[derive(Deserialize)]
struct MetaResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    og: Option<BTreeMap<String, String>>,
    #[serde(default)]
    twitter: Option<BTreeMap<String, String>>,
}

/// Extracted metadata may be partial: every field is optional.
pub fn parse_frontend_meta(body: &str) -> Result<MediaPreview, ClientError> {
    let meta: MetaResponse = parse_json(body, "frontend meta response")?;
    let og = meta.og.unwrap_or_default();
    // 页面本身没有 title 时退回 og:title
    let title = meta
        .title
        .filter(|t| !t.is_empty())
        .or_else(|| og.get("og:title").cloned())
        .unwrap_or_default();
    Ok(MediaPreview {
        title,
        og,
        twitter: meta.twitter.unwrap_or_default(),
        inherit_from_original: false,
    })
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Turn a non-2xx answer into a rejection. The store reports errors as
/// `{"code": int, "message": string}`; anything else is passed through.
pub fn rejection(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.to_string()
            }
        });
    ClientError::Rejected { status, message }
}
