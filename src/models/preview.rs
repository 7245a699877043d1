use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

/// Open Graph / Twitter-card metadata shown on interstitial redirect pages
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaPreview {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub og: BTreeMap<String, String>,
    #[serde(default)]
    pub twitter: BTreeMap<String, String>,
    #[serde(rename = "inheritFromOriginal", default)]
    pub inherit_from_original: bool,
}

/// How a user-entered preview combines with the metadata extracted from the
/// original page when `inherit_from_original` is set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PreviewMergePolicy {
    /// Every empty field falls back to the extracted value
    #[default]
    PerField,
    /// The extracted preview replaces an empty user preview wholesale;
    /// any user content keeps the user preview untouched
    AllOrNothing,
}

impl std::fmt::Display for PreviewMergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for PreviewMergePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "per_field" => Ok(Self::PerField),
            "all_or_nothing" => Ok(Self::AllOrNothing),
            _ => Err(format!(
                "Invalid preview merge policy: '{}'. Valid: per_field, all_or_nothing",
                s
            )),
        }
    }
}

impl MediaPreview {
    /// No title and no metadata entries
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.og.is_empty() && self.twitter.is_empty()
    }

    /// Combine this (user-entered) preview with `extracted`.
    ///
    /// Without `inherit_from_original` the user preview is returned as-is.
    /// User values always win over extracted ones.
    pub fn merge(&self, extracted: &MediaPreview, policy: PreviewMergePolicy) -> MediaPreview {
        if !self.inherit_from_original {
            return self.clone();
        }

        match policy {
            PreviewMergePolicy::AllOrNothing => {
                if self.is_blank() {
                    MediaPreview {
                        inherit_from_original: self.inherit_from_original,
                        ..extracted.clone()
                    }
                } else {
                    self.clone()
                }
            }
            PreviewMergePolicy::PerField => {
                let title = if self.title.is_empty() {
                    extracted.title.clone()
                } else {
                    self.title.clone()
                };
                MediaPreview {
                    title,
                    og: fill_missing(&self.og, &extracted.og),
                    twitter: fill_missing(&self.twitter, &extracted.twitter),
                    inherit_from_original: self.inherit_from_original,
                }
            }
        }
    }
}

fn fill_missing(
    user: &BTreeMap<String, String>,
    extracted: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = user.clone();
    for (key, value) in extracted {
        match merged.get(key) {
            Some(existing) if !existing.is_empty() => {}
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}
