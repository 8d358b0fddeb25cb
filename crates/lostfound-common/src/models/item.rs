use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

/// Backend-assigned item identifier. Some deployments emit integers,
/// others UUID strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// An item as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteItem {
    pub id: ItemId,

    pub image_url: String,

    pub location_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_detail: Option<String>,

    pub time_frame: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created_at: String,
}

impl RemoteItem {
    /// Best label for the item: the title, else the description, else the id.
    pub fn label(&self) -> String {
        self.title
            .as_deref()
            .or(self.description.as_deref())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("item {}", self.id))
    }

    /// Parse `created_at`. Accepts RFC 3339 and offset-less ISO timestamps
    /// (interpreted as UTC).
    pub fn created_at_utc(&self) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.created_at) {
            return Some(dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}

/// A candidate match returned by the backend for a submitted item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub item: RemoteItem,
    pub similarity: f64,
}

impl MatchResult {
    /// Reject similarity values that are not a fraction in [0, 1].
    pub fn validate(&self) -> CommonResult<()> {
        if self.similarity.is_finite() && (0.0..=1.0).contains(&self.similarity) {
            Ok(())
        } else {
            Err(CommonError::SimilarityOutOfRange {
                item: self.item.id.to_string(),
                value: self.similarity,
            })
        }
    }
}
