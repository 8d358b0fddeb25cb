use serde::{Deserialize, Serialize};

use crate::error::CommonResult;
use crate::models::{ItemId, MatchResult, RemoteItem, ReportKind};

/// Response from the LOST and FOUND endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub matches: Vec<MatchResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmitResponse {
    /// Id the backend assigned to the new report. `item_id` wins when both
    /// keys are present.
    pub fn assigned_id(&self) -> Option<&ItemId> {
        self.item_id.as_ref().or(self.id.as_ref())
    }

    pub fn validate(&self) -> CommonResult<()> {
        self.matches.iter().try_for_each(MatchResult::validate)
    }
}

/// One previously submitted report with the matches found for it
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub item: RemoteItem,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ReportKind>,

    #[serde(default)]
    pub matches: Vec<MatchResult>,
}

/// Response from the HISTORY endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub items: Vec<HistoryEntry>,
}

impl HistoryResponse {
    pub fn validate(&self) -> CommonResult<()> {
        self.items
            .iter()
            .flat_map(|entry| entry.matches.iter())
            .try_for_each(MatchResult::validate)
    }
}

/// Response from the RESET endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub message: String,
}

/// Response from the HEALTH endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBMIT_BODY: &str = r#"{
        "item_id": 12,
        "matches": [
            {
                "item": {
                    "id": 3,
                    "image_url": "uploads\\found\\3.jpg",
                    "location_type": "outdoor",
                    "location_detail": "park bench",
                    "time_frame": "yesterday",
                    "description": "red umbrella",
                    "created_at": "2024-05-01T10:00:00"
                },
                "similarity": 0.91
            }
        ]
    }"#;

    #[test]
    fn submit_response_decodes_backend_shape() {
        let resp: SubmitResponse = serde_json::from_str(SUBMIT_BODY).unwrap();
        assert_eq!(resp.assigned_id(), Some(&ItemId::Number(12)));
        assert_eq!(resp.matches.len(), 1);
        assert_eq!(resp.matches[0].item.location_detail.as_deref(), Some("park bench"));
        assert!(resp.validate().is_ok());
    }

    #[test]
    fn submit_response_accepts_plain_id() {
        let resp: SubmitResponse =
            serde_json::from_str(r#"{"id": "abc", "matches": []}"#).unwrap();
        assert_eq!(resp.assigned_id(), Some(&ItemId::Text("abc".to_string())));
    }

    #[test]
    fn submit_response_with_both_id_keys_decodes() {
        let resp: SubmitResponse =
            serde_json::from_str(r#"{"id": 1, "item_id": 2, "matches": []}"#).unwrap();
        assert_eq!(resp.assigned_id(), Some(&ItemId::Number(2)));
        assert!(resp.matches.is_empty());
    }

    #[test]
    fn submit_response_without_matches_is_a_decode_error() {
        assert!(serde_json::from_str::<SubmitResponse>(r#"{"item_id": 1}"#).is_err());
    }

    #[test]
    fn history_entry_flattens_item_fields() {
        let body = r#"{
            "items": [
                {
                    "id": 5,
                    "image_url": "/uploads/5.png",
                    "location_type": "indoor",
                    "time_frame": "today",
                    "title": "Keys",
                    "created_at": "2024-05-02T08:00:00Z",
                    "item_type": "lost"
                }
            ]
        }"#;
        let resp: HistoryResponse = serde_json::from_str(body).unwrap();
        let entry = &resp.items[0];
        assert_eq!(entry.item.id, ItemId::Number(5));
        assert_eq!(entry.item_type, Some(ReportKind::Lost));
        assert!(entry.matches.is_empty());
        assert!(resp.validate().is_ok());
    }

    #[test]
    fn history_validate_reports_out_of_range_similarity() {
        let body = r#"{
            "items": [
                {
                    "id": 5,
                    "image_url": "",
                    "location_type": "indoor",
                    "time_frame": "today",
                    "created_at": "2024-05-02T08:00:00Z",
                    "matches": [
                        {
                            "item": {
                                "id": 9,
                                "image_url": "",
                                "location_type": "indoor",
                                "time_frame": "today",
                                "created_at": "2024-05-02T08:00:00Z"
                            },
                            "similarity": 1.7
                        }
                    ]
                }
            ]
        }"#;
        let resp: HistoryResponse = serde_json::from_str(body).unwrap();
        let err = resp.validate().unwrap_err();
        assert!(err.to_string().contains("item 9"));
    }

    #[test]
    fn health_response_tolerates_missing_metadata() {
        let resp: HealthResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert_eq!(resp.status, "ok");
        assert!(resp.version.is_none());
    }
}
