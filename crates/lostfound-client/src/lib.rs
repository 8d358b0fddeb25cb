pub mod api_client;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod submission;

pub use api_client::ApiClient;
pub use error::{ApiError, LostFoundError, Result};
