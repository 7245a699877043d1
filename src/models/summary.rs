use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

use super::record::RedirectType;

/// Read-model projection of a Terse record plus its visit count
///
/// Accepts the flat shape and the nested
/// `{"terse": {...}, "visits": {"visitCount": n}}` shape the store also uses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TerseSummary {
    #[serde(rename = "originalURL")]
    pub original_url: String,
    #[serde(rename = "shortenedURL")]
    pub shortened_url: String,
    #[serde(rename = "redirectType")]
    pub redirect_type: RedirectType,
    #[serde(rename = "visitCount")]
    pub visit_count: u64,
}

#[derive(Deserialize)]
struct FlatSummary {
    #[serde(rename = "originalURL", default)]
    original_url: String,
    #[serde(rename = "shortenedURL", default)]
    shortened_url: String,
    #[serde(rename = "redirectType", default)]
    redirect_type: RedirectType,
    #[serde(rename = "visitCount", default, deserialize_with = "null_as_zero")]
    visit_count: u64,
}

#[derive(Deserialize)]
struct VisitsSummary {
    #[serde(rename = "visitCount", default, deserialize_with = "null_as_zero")]
    visit_count: u64,
}

#[derive(Deserialize)]
struct NestedSummary {
    terse: FlatSummary,
    #[serde(default)]
    visits: Option<VisitsSummary>,
}

impl<'de> Deserialize<'de> for TerseSummary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            // 嵌套形式必须先尝试：扁平形式的字段全部可缺省
            Nested(NestedSummary),
            Flat(FlatSummary),
        }

        let (flat, visits) = match Shape::deserialize(deserializer)? {
            Shape::Nested(nested) => (nested.terse, nested.visits.map(|v| v.visit_count)),
            Shape::Flat(flat) => (flat, None),
        };
        Ok(TerseSummary {
            original_url: flat.original_url,
            shortened_url: flat.shortened_url,
            redirect_type: flat.redirect_type,
            visit_count: visits.unwrap_or(flat.visit_count),
        })
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

/// Summaries keyed by shortened URL, as returned by the summarize call
pub type SummarySet = BTreeMap<String, TerseSummary>;

/// One line of a searched corpus with the character offsets that matched
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchMatch {
    pub line: String,
    /// Char offsets into `line`
    #[serde(rename = "matchedIndexes", default)]
    pub matched_indexes: BTreeSet<usize>,
    /// Every source line number sharing this text
    #[serde(rename = "lineNumbers", default)]
    pub line_numbers: Vec<u64>,
}

impl SearchMatch {
    pub fn new(
        line: impl Into<String>,
        matched_indexes: impl IntoIterator<Item = usize>,
        line_numbers: impl IntoIterator<Item = u64>,
    ) -> Self {
        Self {
            line: line.into(),
            matched_indexes: matched_indexes.into_iter().collect(),
            line_numbers: line_numbers.into_iter().collect(),
        }
    }

    /// Line numbers joined for display: `"3,17,42"`
    pub fn line_numbers_display(&self) -> String {
        self.line_numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}
