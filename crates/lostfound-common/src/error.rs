use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommonError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Similarity out of range for item {item}: {value}")]
    SimilarityOutOfRange { item: String, value: f64 },

    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),
}

pub type CommonResult<T> = std::result::Result<T, CommonError>;
