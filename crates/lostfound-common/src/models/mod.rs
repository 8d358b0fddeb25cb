mod item;
mod report;

pub use item::{ItemId, MatchResult, RemoteItem};
pub use report::{ReportKind, SubmitItemPayload, UploadFile};
