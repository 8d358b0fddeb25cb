use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;

use lostfound_common::api::SubmitResponse;
use lostfound_common::{ReportKind, SubmitItemPayload, UploadFile};

use crate::api_client::ApiClient;
use crate::config::Config;
use crate::error::{ApiError, LostFoundError, Result};
use crate::render::Render;
use crate::submission::{SubmissionSlot, Ticket};

/// Form values for a lost or found report, as entered by the user.
#[derive(Debug, Clone)]
pub struct ReportForm {
    pub image: PathBuf,
    pub title: String,
    pub description: Option<String>,
    pub location_type: String,
    pub location_detail: Option<String>,
    pub time_frame: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ReportForm {
    /// Validate the form and turn it into an upload payload.
    pub fn into_payload(self) -> Result<SubmitItemPayload> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(LostFoundError::InvalidInput("title is required".to_string()));
        }
        let location_type = self.location_type.trim().to_string();
        if location_type.is_empty() {
            return Err(LostFoundError::InvalidInput(
                "location type is required".to_string(),
            ));
        }
        let time_frame = self.time_frame.trim().to_string();
        if time_frame.is_empty() {
            return Err(LostFoundError::InvalidInput(
                "time frame is required".to_string(),
            ));
        }
        if !self.image.is_file() {
            return Err(LostFoundError::InvalidInput(format!(
                "image not found: {}",
                self.image.display()
            )));
        }

        Ok(SubmitItemPayload {
            file: UploadFile::from_path(self.image),
            title,
            description: non_blank(self.description),
            location_type,
            location_detail: non_blank(self.location_detail),
            time_frame,
        })
    }
}

/// Submit a report and show the suggested matches. Ctrl-C cancels the
/// upload.
pub async fn report(config: &Config, kind: ReportKind, form: ReportForm) -> Result<()> {
    let payload = form.into_payload()?;
    let client = ApiClient::from_config(config);
    let slot: Arc<SubmissionSlot<Arc<SubmitResponse>>> = Arc::new(SubmissionSlot::new());

    let ticket = slot.begin();
    let interrupt = {
        let slot = Arc::clone(&slot);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                slot.cancel();
            }
        })
    };

    println!("{}", format!("Submitting {kind} item report...").dimmed());
    let result = slot.run(&ticket, client.submit(kind, &payload)).await;
    interrupt.abort();

    match settle(&slot, &ticket, result)? {
        Some(resp) => Render::new(config).display_submission(kind, &resp),
        None => println!("{}", "Submission cancelled.".yellow()),
    }
    Ok(())
}

/// Publish a finished submission. `None` means it was cancelled, either
/// while in flight or after the response arrived.
fn settle(
    slot: &SubmissionSlot<Arc<SubmitResponse>>,
    ticket: &Ticket,
    result: std::result::Result<SubmitResponse, ApiError>,
) -> Result<Option<Arc<SubmitResponse>>> {
    let resp = match result {
        Ok(resp) => Arc::new(resp),
        Err(ApiError::Cancelled) => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    if slot.publish(ticket, Arc::clone(&resp)) {
        Ok(Some(resp))
    } else {
        Ok(None)
    }
}

/// Show previously submitted reports and their matches.
pub async fn history(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(config);
    let resp = client.fetch_history().await?;
    Render::new(config).display_history(&resp.items);
    Ok(())
}

fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Delete every report on the server after asking the user.
pub async fn reset(config: &Config, yes: bool) -> Result<()> {
    if !yes {
        let stdin = io::stdin();
        let confirmed = confirm(
            &format!(
                "This permanently deletes all reports on {}. Continue?",
                config.server_url
            ),
            &mut stdin.lock(),
            &mut io::stdout(),
        )?;
        if !confirmed {
            println!("{}", "Reset aborted.".dimmed());
            return Ok(());
        }
    }

    let client = ApiClient::from_config(config);
    let resp = client.reset_database().await?;
    println!("{}", resp.message.green());
    Ok(())
}

pub async fn health(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(config);
    let resp = client.check_health().await?;
    Render::new(config).display_health(&resp);
    Ok(())
}

/// Show the configuration, or update the server URL when one is given.
pub fn configure(config: &mut Config, server: Option<String>) -> Result<()> {
    if let Some(server) = server {
        config.set_server_url(&server)?;
        println!("{}", format!("Server set to {}", config.server_url).green());
    }
    Render::new(config).display_config(config);
    Ok(())
}
