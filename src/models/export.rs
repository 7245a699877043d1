use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::record::TerseRecord;

/// A single recorded visit of a shortened URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub accessed: DateTime<Utc>,
    pub ip: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, Vec<String>>,
}

/// Exported data of one shortened URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub terse: TerseRecord,
    #[serde(default)]
    pub visits: Vec<Visit>,
}

/// Export document: an array of entries.
///
/// The remote store answers with an object keyed by shortened URL; both
/// shapes are accepted on input, the array shape is always written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ExportPayload(pub Vec<ExportEntry>);

impl<'de> Deserialize<'de> for ExportPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            List(Vec<ExportEntry>),
            Keyed(BTreeMap<String, ExportEntry>),
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::List(entries) => ExportPayload(entries),
            Shape::Keyed(map) => ExportPayload(
                map.into_iter()
                    .map(|(key, mut entry)| {
                        if entry.terse.shortened_url.is_empty() {
                            entry.terse.shortened_url = key;
                        }
                        entry
                    })
                    .collect(),
            ),
        })
    }
}

impl ExportPayload {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries keyed by shortened URL, the shape the import call expects
    pub fn keyed(&self) -> BTreeMap<String, ExportEntry> {
        self.0
            .iter()
            .map(|entry| (entry.terse.shortened_url.clone(), entry.clone()))
            .collect()
    }
}

/// What an export (or delete) request targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSelection {
    All,
    Keys(BTreeSet<String>),
}

impl ExportSelection {
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExportSelection::Keys(keys.into_iter().map(Into::into).collect())
    }

    /// The single key when exactly one is selected
    pub fn single(&self) -> Option<&str> {
        match self {
            ExportSelection::Keys(keys) if keys.len() == 1 => keys.iter().next().map(String::as_str),
            _ => None,
        }
    }
}
