//! HTTP implementation of [`TerseApi`]
//!
//! 使用 ureq 同步请求，通过 spawn_blocking 包装为异步调用

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace};
use ureq::Agent;

use crate::config::ApiConfig;
use crate::models::{
    DeleteFlags, ExportPayload, ExportSelection, MediaPreview, SearchMatch, SummarySet,
    TerseRecord, WriteOperation,
};

use super::wire;
use super::{ClientError, TerseApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// Terse store reached over its JSON HTTP API
pub struct HttpTerseApi {
    base_url: String,
    agent: Agent,
}

impl HttpTerseApi {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            // 非 2xx 响应也要读取 body，错误信息在里面
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn execute_sync(
        agent: &Agent,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<String, ClientError> {
        let result = match (method, body) {
            (Method::Get, _) => agent.get(url).call(),
            (Method::Post, Some(body)) => agent.post(url).send_json(&body),
            (Method::Post, None) => agent.post(url).send_empty(),
            (Method::Delete, Some(body)) => agent.delete(url).force_send_body().send_json(&body),
            (Method::Delete, None) => agent.delete(url).call(),
        };

        let mut resp = result
            .map_err(|e| ClientError::Transport(format!("{} {}: {}", method.as_str(), url, e)))?;
        let status = resp.status().as_u16();
        let text = resp
            .body_mut()
            .read_to_string()
            .map_err(|e| ClientError::Transport(format!("reading body of {}: {}", url, e)))?;

        trace!("{} {} -> {} ({} bytes)", method.as_str(), url, status, text.len());

        if (200..300).contains(&status) {
            Ok(text)
        } else {
            Err(wire::rejection(status, &text))
        }
    }

    async fn call(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> Result<String, ClientError> {
        let agent = self.agent.clone();
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method.as_str(), url);

        tokio::task::spawn_blocking(move || Self::execute_sync(&agent, method, &url, body))
            .await
            .map_err(|e| ClientError::Transport(format!("request task failed: {}", e)))?
    }
}

#[async_trait]
impl TerseApi for HttpTerseApi {
    async fn summarize(&self, keys: Option<&BTreeSet<String>>) -> Result<SummarySet, ClientError> {
        let body = self
            .call(
                Method::Post,
                wire::SUMMARY_PATH.to_string(),
                Some(wire::summary_body(keys)),
            )
            .await?;
        wire::parse_json(&body, "summary response")
    }

    async fn read(&self, key: &str) -> Result<TerseRecord, ClientError> {
        let body = self.call(Method::Get, wire::read_path(key), None).await?;
        wire::parse_json(&body, "terse response")
    }

    async fn write(
        &self,
        op: WriteOperation,
        record: &TerseRecord,
    ) -> Result<String, ClientError> {
        let payload = serde_json::to_value(record)
            .map_err(|e| ClientError::Malformed(format!("encoding record: {}", e)))?;
        let body = self
            .call(Method::Post, wire::write_path(op), Some(payload))
            .await?;
        wire::parse_written_key(&body, &record.shortened_url)
    }

    async fn delete_one(&self, key: &str, flags: DeleteFlags) -> Result<(), ClientError> {
        let keys = BTreeSet::from([key.to_string()]);
        self.delete_many(&keys, flags).await
    }

    async fn delete_many(
        &self,
        keys: &BTreeSet<String>,
        flags: DeleteFlags,
    ) -> Result<(), ClientError> {
        self.call(
            Method::Delete,
            wire::DELETE_SOME_PATH.to_string(),
            Some(wire::delete_some_body(keys, flags)),
        )
        .await?;
        Ok(())
    }

    async fn delete_all(&self, flags: DeleteFlags) -> Result<(), ClientError> {
        let payload = serde_json::to_value(flags)
            .map_err(|e| ClientError::Malformed(format!("encoding delete flags: {}", e)))?;
        self.call(Method::Delete, wire::DELETE_ALL_PATH.to_string(), Some(payload))
            .await?;
        Ok(())
    }

    async fn export(&self, selection: &ExportSelection) -> Result<ExportPayload, ClientError> {
        let body = match selection {
            ExportSelection::All => {
                self.call(Method::Get, wire::EXPORT_ALL_PATH.to_string(), None)
                    .await?
            }
            ExportSelection::Keys(keys) => {
                self.call(
                    Method::Post,
                    wire::EXPORT_SOME_PATH.to_string(),
                    Some(wire::export_some_body(keys)),
                )
                .await?
            }
        };
        wire::parse_json(&body, "export response")
    }

    async fn import(
        &self,
        payload: &ExportPayload,
        wipe: Option<DeleteFlags>,
    ) -> Result<(), ClientError> {
        self.call(
            Method::Post,
            wire::IMPORT_PATH.to_string(),
            Some(wire::import_body(payload, wipe)),
        )
        .await?;
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchMatch>, ClientError> {
        let body = self.call(Method::Get, wire::search_path(query), None).await?;
        wire::parse_json(&body, "search response")
    }

    async fn prefix(&self) -> Result<String, ClientError> {
        let body = self
            .call(Method::Get, wire::PREFIX_PATH.to_string(), None)
            .await?;
        wire::parse_json(&body, "prefix response")
    }

    async fn frontend_meta(&self, original_url: &str) -> Result<MediaPreview, ClientError> {
        let body = self
            .call(Method::Get, wire::frontend_meta_path(original_url), None)
            .await?;
        wire::parse_frontend_meta(&body)
    }

    fn name(&self) -> &'static str {
        "HTTP"
    }
}
