use thiserror::Error;

use lostfound_common::CommonError;

/// Failures of a single backend call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure: no response was received.
    #[error("network error: {0}")]
    Network(String),

    #[error("request failed with status {status}: {body}")]
    Request { status: u16, body: String },

    #[error("backend unreachable")]
    Unreachable,

    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error("request cancelled by a newer submission")]
    Cancelled,

    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status of a rejected request, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<CommonError> for ApiError {
    fn from(err: CommonError) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum LostFoundError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, LostFoundError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_message_carries_status_and_body() {
        let err = ApiError::Request {
            status: 500,
            body: "boom".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("boom"));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn network_and_unreachable_have_no_status() {
        assert_eq!(ApiError::Network("refused".to_string()).status(), None);
        assert_eq!(ApiError::Unreachable.status(), None);
    }

    #[test]
    fn api_errors_pass_through_unchanged() {
        let err: LostFoundError = ApiError::Unreachable.into();
        assert_eq!(err.to_string(), "backend unreachable");
    }
}
