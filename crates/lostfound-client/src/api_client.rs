use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;

use lostfound_common::api::{HealthResponse, HistoryResponse, ResetResponse, SubmitResponse};
use lostfound_common::image_url::build_image_url;
use lostfound_common::{ReportKind, SubmitItemPayload};

use crate::config::{Config, Endpoints};
use crate::error::ApiError;

/// Body reported when a failed response carries no readable text.
pub const UNKNOWN_ERROR_BODY: &str = "Unknown error";

/// HTTP client for the matching backend.
///
/// Every call is a single attempt with no retry and no client-side timeout.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    endpoints: Endpoints,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, endpoints: Endpoints) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoints,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.server_url, config.endpoints.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Resolve an image path returned by the backend against this client's
    /// base URL.
    pub fn build_image_url(&self, path: &str) -> String {
        build_image_url(&self.base_url, path)
    }

    pub async fn submit_lost_item(
        &self,
        payload: &SubmitItemPayload,
    ) -> Result<SubmitResponse, ApiError> {
        self.submit(ReportKind::Lost, payload).await
    }

    pub async fn submit_found_item(
        &self,
        payload: &SubmitItemPayload,
    ) -> Result<SubmitResponse, ApiError> {
        self.submit(ReportKind::Found, payload).await
    }

    /// Upload a report as multipart form data and decode the suggested
    /// matches.
    #[tracing::instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn submit(
        &self,
        kind: ReportKind,
        payload: &SubmitItemPayload,
    ) -> Result<SubmitResponse, ApiError> {
        let path = match kind {
            ReportKind::Lost => &self.endpoints.lost,
            ReportKind::Found => &self.endpoints.found,
        };
        let url = self.url(path);
        let form = build_form(payload).await?;

        tracing::debug!(%url, "POST report");
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let body: SubmitResponse = decode(check_status(resp).await?).await?;
        body.validate()?;
        tracing::info!(matches = body.matches.len(), "report submitted");
        Ok(body)
    }

    pub async fn fetch_history(&self) -> Result<HistoryResponse, ApiError> {
        let url = self.url(&self.endpoints.history);
        tracing::debug!(%url, "GET history");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let body: HistoryResponse = decode(check_status(resp).await?).await?;
        body.validate()?;
        Ok(body)
    }

    /// Wipe all reports on the backend. Callers are responsible for
    /// confirming with the user first.
    pub async fn reset_database(&self) -> Result<ResetResponse, ApiError> {
        let url = self.url(&self.endpoints.reset);
        tracing::debug!(%url, "DELETE reset");
        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        decode(check_status(resp).await?).await
    }

    /// Connectivity probe. Any failure is reported as `Unreachable`; the
    /// response body is never forwarded.
    pub async fn check_health(&self) -> Result<HealthResponse, ApiError> {
        let url = self.url(&self.endpoints.health);
        tracing::debug!(%url, "GET health");
        let resp = self.client.get(&url).send().await.map_err(|e| {
            tracing::debug!(error = %e, "health probe failed");
            ApiError::Unreachable
        })?;

        if !resp.status().is_success() {
            tracing::debug!(status = resp.status().as_u16(), "health probe rejected");
            return Err(ApiError::Unreachable);
        }

        resp.json::<HealthResponse>()
            .await
            .map_err(|_| ApiError::Unreachable)
    }
}

async fn build_form(payload: &SubmitItemPayload) -> Result<Form, ApiError> {
    let bytes = tokio::fs::read(&payload.file.uri).await?;
    let file = Part::bytes(bytes)
        .file_name(payload.file.name.clone())
        .mime_str(&payload.file.mime_type)
        .map_err(|e| ApiError::InvalidUpload(format!("{}: {e}", payload.file.mime_type)))?;

    let form = payload
        .wire_fields()
        .into_iter()
        .fold(Form::new().part("file", file), |form, (key, value)| {
            form.text(key, value.to_string())
        });
    Ok(form)
}

async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = match resp.text().await {
        Ok(text) if !text.trim().is_empty() => text,
        _ => UNKNOWN_ERROR_BODY.to_string(),
    };
    tracing::warn!(status = status.as_u16(), %body, "backend rejected request");
    Err(ApiError::Request {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
