use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which side of the service a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Lost,
    Found,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Lost => f.write_str("lost"),
            ReportKind::Found => f.write_str("found"),
        }
    }
}

/// Image attached to a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub uri: PathBuf,
    pub name: String,
    pub mime_type: String,
}

impl UploadFile {
    /// Build an upload from a local path, deriving the file name and
    /// MIME type from it.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let uri = path.into();
        let name = uri
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_guess::from_path(&uri)
            .first_or_octet_stream()
            .to_string();
        Self { uri, name, mime_type }
    }
}

/// One lost or found report, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitItemPayload {
    pub file: UploadFile,
    pub title: String,
    pub description: Option<String>,
    pub location_type: String,
    pub location_detail: Option<String>,
    pub time_frame: String,
}

impl SubmitItemPayload {
    /// Text fields as they appear on the wire, in submission order.
    /// `None` optionals are skipped.
    pub fn wire_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("title", self.title.as_str())];
        if let Some(description) = &self.description {
            fields.push(("description", description.as_str()));
        }
        fields.push(("location_type", self.location_type.as_str()));
        if let Some(detail) = &self.location_detail {
            fields.push(("location_detail", detail.as_str()));
        }
        fields.push(("time_frame", self.time_frame.as_str()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SubmitItemPayload {
        SubmitItemPayload {
            file: UploadFile::from_path("/tmp/photos/Wallet.JPG"),
            title: "Wallet".to_string(),
            description: None,
            location_type: "transit".to_string(),
            location_detail: Some("bus 42".to_string()),
            time_frame: "this_week".to_string(),
        }
    }

    #[test]
    fn upload_file_from_path_derives_name_and_mime() {
        let file = UploadFile::from_path("/tmp/photos/Wallet.JPG");
        assert_eq!(file.name, "Wallet.JPG");
        assert_eq!(file.mime_type, "image/jpeg");

        for (name, expected) in [
            ("scan.tiff", "image/tiff"),
            ("photo.webp", "image/webp"),
            ("shot.svg", "image/svg+xml"),
            ("pic.png", "image/png"),
        ] {
            assert_eq!(UploadFile::from_path(name).mime_type, expected, "{name}");
        }

        let unknown = UploadFile::from_path("scan.unknownext");
        assert_eq!(unknown.mime_type, "application/octet-stream");
    }

    #[test]
    fn wire_fields_use_snake_case_and_skip_missing_optionals() {
        let p = payload();
        assert_eq!(
            p.wire_fields(),
            vec![
                ("title", "Wallet"),
                ("location_type", "transit"),
                ("location_detail", "bus 42"),
                ("time_frame", "this_week"),
            ]
        );
    }

    #[test]
    fn report_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ReportKind::Found).unwrap(), "\"found\"");
        let kind: ReportKind = serde_json::from_str("\"lost\"").unwrap();
        assert_eq!(kind, ReportKind::Lost);
    }
}
