use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};
use crate::image_url::build_image_url;
use crate::models::{MatchResult, RemoteItem};

/// Minimum similarity for a match to be shown at all.
pub const MATCH_THRESHOLD: f64 = 0.5;

/// Minimum similarity for a shown match to be labelled high confidence.
pub const HIGH_MATCH_THRESHOLD: f64 = 0.85;

/// Confidence tier of a visible match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    High,
    Possible,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::High => f.write_str("high"),
            MatchStatus::Possible => f.write_str("possible"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(rename = "match", default = "default_match")]
    pub visible: f64,

    #[serde(default = "default_high")]
    pub high: f64,
}

fn default_match() -> f64 {
    MATCH_THRESHOLD
}

fn default_high() -> f64 {
    HIGH_MATCH_THRESHOLD
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            visible: MATCH_THRESHOLD,
            high: HIGH_MATCH_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Both values must lie in [0, 1] and the visibility threshold may not
    /// exceed the high threshold.
    pub fn validate(&self) -> CommonResult<()> {
        for (name, value) in [("match", self.visible), ("high", self.high)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CommonError::InvalidThresholds(format!(
                    "{name} threshold must be within [0, 1], got {value}"
                )));
            }
        }
        if self.visible > self.high {
            return Err(CommonError::InvalidThresholds(format!(
                "match threshold {} exceeds high threshold {}",
                self.visible, self.high
            )));
        }
        Ok(())
    }
}

/// A match ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub item: RemoteItem,
    pub image_url: String,
    pub status: MatchStatus,
    pub similarity: f64,
    pub percent: u32,
}

/// Keep the results at or above `match_threshold`, in backend order.
pub fn filter_visible(results: &[MatchResult], match_threshold: f64) -> Vec<&MatchResult> {
    results
        .iter()
        .filter(|r| r.similarity >= match_threshold)
        .collect()
}

pub fn classify(similarity: f64, high_threshold: f64) -> MatchStatus {
    if similarity >= high_threshold {
        MatchStatus::High
    } else {
        MatchStatus::Possible
    }
}

/// Similarity as a whole percentage, rounding halves up.
///
/// The scaled value is snapped to nine decimals first so that products such
/// as `0.575 * 100 = 57.49999999999999` round like their decimal value.
pub fn display_percent(similarity: f64) -> u32 {
    let scaled = ((similarity * 100.0) * 1e9).round() / 1e9;
    (scaled + 0.5).floor().max(0.0) as u32
}

/// Filter, label and resolve image URLs for a list of backend results.
pub fn to_display(results: &[MatchResult], thresholds: &Thresholds, base_url: &str) -> Vec<Match> {
    filter_visible(results, thresholds.visible)
        .into_iter()
        .map(|r| Match {
            image_url: build_image_url(base_url, &r.item.image_url),
            status: classify(r.similarity, thresholds.high),
            similarity: r.similarity,
            percent: display_percent(r.similarity),
            item: r.item.clone(),
        })
        .collect()
}
