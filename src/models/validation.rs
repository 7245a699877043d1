//! 记录验证
//!
//! 写入前检查原始 URL 与短码，阻止危险协议

use url::Url;

/// Record validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
    InvalidShortKey(String),
}

impl std::fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "Original URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => write!(f, "Dangerous protocol blocked: {}", proto),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::InvalidShortKey(key) => write!(
                f,
                "Invalid shortened URL '{}': must not contain '/', '?', '#' or whitespace",
                key
            ),
        }
    }
}

impl std::error::Error for RecordValidationError {}

impl From<RecordValidationError> for crate::errors::TerseError {
    fn from(err: RecordValidationError) -> Self {
        crate::errors::TerseError::validation(err.to_string())
    }
}

/// 危险协议列表
const DANGEROUS_SCHEMES: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

/// Validate the redirect target of a record.
pub fn validate_original_url(raw: &str) -> Result<(), RecordValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RecordValidationError::EmptyUrl);
    }

    let scheme = raw
        .split_once(':')
        .map(|(scheme, _)| scheme.to_ascii_lowercase())
        .unwrap_or_default();
    if DANGEROUS_SCHEMES.contains(&scheme.as_str()) {
        return Err(RecordValidationError::DangerousProtocol(format!("{}:", scheme)));
    }

    let parsed = Url::parse(raw).map_err(|e| RecordValidationError::InvalidFormat(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(RecordValidationError::InvalidProtocol(format!("{}:", other))),
    }
}

/// Validate a user-supplied short key. It ends up as a URL path segment.
pub fn validate_short_key(key: &str) -> Result<(), RecordValidationError> {
    if key
        .chars()
        .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace())
    {
        return Err(RecordValidationError::InvalidShortKey(key.to_string()));
    }
    Ok(())
}
