use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

use super::preview::MediaPreview;
use super::validation::{RecordValidationError, validate_original_url, validate_short_key};

/// How the redirect for a shortened URL is served
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RedirectType {
    /// Plain HTTP redirect. The remote store reports these as "301"/"302".
    #[default]
    #[serde(alias = "301", alias = "302")]
    Direct,
    /// Interstitial page with HTML meta refresh
    Meta,
    /// Interstitial page redirecting through JavaScript
    Js,
}

impl RedirectType {
    /// Interstitial redirects are the only ones that can carry a media preview.
    pub fn supports_preview(self) -> bool {
        matches!(self, Self::Meta | Self::Js)
    }
}

impl std::fmt::Display for RedirectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for RedirectType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" | "301" | "302" => Ok(Self::Direct),
            "meta" => Ok(Self::Meta),
            "js" => Ok(Self::Js),
            _ => Err(format!(
                "Invalid redirect type: '{}'. Valid: direct, meta, js",
                s
            )),
        }
    }
}

/// A shortened-URL entity
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TerseRecord {
    #[serde(rename = "originalURL")]
    pub original_url: String,
    #[serde(rename = "shortenedURL", default)]
    pub shortened_url: String,
    #[serde(rename = "redirectType", default)]
    pub redirect_type: RedirectType,
    #[serde(rename = "javascriptTracking", default)]
    pub javascript_tracking: bool,
    #[serde(
        rename = "mediaPreview",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub media_preview: Option<MediaPreview>,
}

impl TerseRecord {
    pub fn new(original_url: impl Into<String>, shortened_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            shortened_url: shortened_url.into(),
            ..Default::default()
        }
    }

    /// Check the fields a write needs before anything is sent.
    ///
    /// An empty `shortened_url` is allowed: the remote store assigns one.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_original_url(&self.original_url)?;
        if !self.shortened_url.is_empty() {
            validate_short_key(&self.shortened_url)?;
        }
        Ok(())
    }

    /// Drop a media preview that the redirect type cannot serve.
    pub fn normalized(mut self) -> Self {
        if !self.redirect_type.supports_preview() && self.media_preview.is_some() {
            tracing::debug!(
                "Dropping media preview for '{}': redirect type {} has no interstitial page",
                self.shortened_url,
                self.redirect_type
            );
            self.media_preview = None;
        }
        self
    }

    /// Whether the write path should ask the remote store for the original
    /// page's own preview metadata.
    pub fn wants_inherited_preview(&self) -> bool {
        self.redirect_type.supports_preview()
            && self
                .media_preview
                .as_ref()
                .is_some_and(|p| p.inherit_from_original)
    }
}

/// Remote write semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WriteOperation {
    /// Fails if the shortened URL already exists
    Insert,
    /// Fails if the shortened URL does not exist
    Update,
    /// Writes whether or not the shortened URL exists
    Upsert,
}

impl WriteOperation {
    /// Cycle through operations (used by the TUI form)
    pub fn next(self) -> Self {
        match self {
            Self::Insert => Self::Update,
            Self::Update => Self::Upsert,
            Self::Upsert => Self::Insert,
        }
    }
}

impl std::fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for WriteOperation {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "upsert" => Ok(Self::Upsert),
            _ => Err(format!(
                "Invalid write operation: '{}'. Valid: insert, update, upsert",
                s
            )),
        }
    }
}

/// Which associated data a delete purges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFlags {
    #[serde(default = "default_true")]
    pub terse: bool,
    #[serde(default = "default_true")]
    pub visits: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DeleteFlags {
    fn default() -> Self {
        Self {
            terse: true,
            visits: true,
        }
    }
}
