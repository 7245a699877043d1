//! 表单状态管理
//!
//! 新建/编辑 Terse 记录的表单字段与光标

use std::collections::BTreeMap;

use crate::cli::parse_pair;
use crate::models::{MediaPreview, RedirectType, TerseRecord, WriteOperation};

/// 表单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Operation,
    OriginalUrl,
    ShortenedUrl,
    RedirectType,
    JsTracking,
    Title,
    Og,
    Twitter,
    Inherit,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Operation,
        FormField::OriginalUrl,
        FormField::ShortenedUrl,
        FormField::RedirectType,
        FormField::JsTracking,
        FormField::Title,
        FormField::Og,
        FormField::Twitter,
        FormField::Inherit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Operation => "Operation",
            FormField::OriginalUrl => "Original URL",
            FormField::ShortenedUrl => "Shortened URL",
            FormField::RedirectType => "Redirect",
            FormField::JsTracking => "JS tracking",
            FormField::Title => "Preview title",
            FormField::Og => "OpenGraph (k=v; k=v)",
            FormField::Twitter => "Twitter (k=v; k=v)",
            FormField::Inherit => "Inherit from original",
        }
    }

    /// Free-text fields accept typed characters
    pub fn is_text(self) -> bool {
        matches!(
            self,
            FormField::OriginalUrl
                | FormField::ShortenedUrl
                | FormField::Title
                | FormField::Og
                | FormField::Twitter
        )
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub field: FormField,
    pub operation: WriteOperation,
    pub original_url: String,
    pub shortened_url: String,
    pub redirect_type: RedirectType,
    pub js_tracking: bool,
    pub title: String,
    pub og: String,
    pub twitter: String,
    pub inherit: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            field: FormField::OriginalUrl,
            operation: WriteOperation::Insert,
            original_url: String::new(),
            shortened_url: String::new(),
            redirect_type: RedirectType::Direct,
            js_tracking: false,
            title: String::new(),
            og: String::new(),
            twitter: String::new(),
            inherit: false,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from a loaded record; edits default to update
    pub fn from_record(record: &TerseRecord) -> Self {
        let preview = record.media_preview.clone().unwrap_or_default();
        Self {
            field: FormField::OriginalUrl,
            operation: WriteOperation::Update,
            original_url: record.original_url.clone(),
            shortened_url: record.shortened_url.clone(),
            redirect_type: record.redirect_type,
            js_tracking: record.javascript_tracking,
            title: preview.title,
            og: join_pairs(&preview.og),
            twitter: join_pairs(&preview.twitter),
            inherit: preview.inherit_from_original,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::OriginalUrl => Some(&mut self.original_url),
            FormField::ShortenedUrl => Some(&mut self.shortened_url),
            FormField::Title => Some(&mut self.title),
            FormField::Og => Some(&mut self.og),
            FormField::Twitter => Some(&mut self.twitter),
            _ => None,
        }
    }

    /// Left/Right/Space on a non-text field
    pub fn cycle(&mut self) {
        match self.field {
            FormField::Operation => self.operation = self.operation.next(),
            FormField::RedirectType => {
                self.redirect_type = match self.redirect_type {
                    RedirectType::Direct => RedirectType::Meta,
                    RedirectType::Meta => RedirectType::Js,
                    RedirectType::Js => RedirectType::Direct,
                }
            }
            FormField::JsTracking => self.js_tracking = !self.js_tracking,
            FormField::Inherit => self.inherit = !self.inherit,
            _ => {}
        }
    }

    pub fn value(&self, field: FormField) -> String {
        let flag = |b: bool| if b { "[x]" } else { "[ ]" }.to_string();
        match field {
            FormField::Operation => format!("< {} >", self.operation),
            FormField::OriginalUrl => self.original_url.clone(),
            FormField::ShortenedUrl => self.shortened_url.clone(),
            FormField::RedirectType => format!("< {} >", self.redirect_type),
            FormField::JsTracking => flag(self.js_tracking),
            FormField::Title => self.title.clone(),
            FormField::Og => self.og.clone(),
            FormField::Twitter => self.twitter.clone(),
            FormField::Inherit => flag(self.inherit),
        }
    }

    /// Collect the record; full validation happens in the controller
    pub fn to_record(&self) -> Result<TerseRecord, String> {
        let og = split_pairs(&self.og)?;
        let twitter = split_pairs(&self.twitter)?;
        let has_preview =
            !self.title.trim().is_empty() || !og.is_empty() || !twitter.is_empty() || self.inherit;

        let media_preview = (has_preview && self.redirect_type.supports_preview()).then(|| {
            MediaPreview {
                title: self.title.trim().to_string(),
                og,
                twitter,
                inherit_from_original: self.inherit,
            }
        });

        Ok(TerseRecord {
            original_url: self.original_url.trim().to_string(),
            shortened_url: self.shortened_url.trim().to_string(),
            redirect_type: self.redirect_type,
            javascript_tracking: self.js_tracking,
            media_preview,
        })
    }
}

fn split_pairs(raw: &str) -> Result<BTreeMap<String, String>, String> {
    raw.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(parse_pair)
        .collect()
}

fn join_pairs(map: &BTreeMap<String, String>) -> String {
    map.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("; ")
}
