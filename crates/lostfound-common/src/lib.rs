pub mod api;
pub mod error;
pub mod image_url;
pub mod matching;
pub mod models;

pub use error::{CommonError, CommonResult};
pub use matching::{Match, MatchStatus, Thresholds};
pub use models::{ItemId, MatchResult, RemoteItem, ReportKind, SubmitItemPayload, UploadFile};
