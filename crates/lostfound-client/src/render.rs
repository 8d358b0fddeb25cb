use colored::{ColoredString, Colorize};

use lostfound_common::api::{HealthResponse, HistoryEntry, SubmitResponse};
use lostfound_common::matching::{to_display, Match, MatchStatus};
use lostfound_common::{ReportKind, Thresholds};

use crate::config::Config;

pub struct Render {
    base_url: String,
    thresholds: Thresholds,
}

impl Render {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.server_url.trim_end_matches('/').to_string(),
            thresholds: config.thresholds,
        }
    }

    pub fn format_match(&self, m: &Match) -> Vec<String> {
        let created = m
            .item
            .created_at_utc()
            .map(|dt| dt.format("%a %b %d %Y").to_string())
            .unwrap_or_else(|| m.item.created_at.clone());

        let mut lines = vec![format!(
            "  {} {} {}",
            percent_label(m),
            status_badge(m.status),
            m.item.label()
        )];
        lines.push(format!(
            "       {}",
            format!(
                "{} · {} · {}",
                location(&m.item.location_type, m.item.location_detail.as_deref()),
                m.item.time_frame,
                created
            )
            .dimmed()
        ));
        if !m.image_url.is_empty() {
            lines.push(format!("       {}", m.image_url.dimmed().underline()));
        }
        lines
    }

    fn display_matches(&self, matches: &[Match]) {
        for m in matches {
            for line in self.format_match(m) {
                println!("{line}");
            }
        }
    }

    pub fn display_submission(&self, kind: ReportKind, resp: &SubmitResponse) {
        let matches = to_display(&resp.matches, &self.thresholds, &self.base_url);

        let reference = resp
            .assigned_id()
            .map(|id| format!(" (#{id})"))
            .unwrap_or_default();
        println!();
        println!(
            "  {}{}",
            format!("Your {kind} item report was submitted").green().bold(),
            reference.dimmed()
        );
        if let Some(message) = &resp.message {
            println!("  {}", message.dimmed());
        }
        println!();

        if matches.is_empty() {
            println!("  {}", "No matches yet. We'll keep looking.".dimmed());
            println!();
            return;
        }

        let high = matches
            .iter()
            .filter(|m| m.status == MatchStatus::High)
            .count();
        println!(
            "  {} {}",
            format!("{} potential matches", matches.len()).underline(),
            format!("[{high} high confidence]").dimmed()
        );
        self.display_matches(&matches);
        println!();
    }

    pub fn display_history(&self, entries: &[HistoryEntry]) {
        if entries.is_empty() {
            println!();
            println!("  {}", "No reports yet".dimmed());
            println!();
            return;
        }

        for entry in entries {
            let kind = match entry.item_type {
                Some(ReportKind::Lost) => "lost ".red(),
                Some(ReportKind::Found) => "found".cyan(),
                None => "     ".normal(),
            };
            println!();
            println!(
                "  {} {} {}",
                kind,
                entry.item.label().bold(),
                format!("#{}", entry.item.id).dimmed()
            );

            let matches = to_display(&entry.matches, &self.thresholds, &self.base_url);
            if matches.is_empty() {
                println!("    {}", "no visible matches".dimmed());
            } else {
                self.display_matches(&matches);
            }
        }
        println!();
    }

    pub fn display_health(&self, health: &HealthResponse) {
        let status = if health.status.eq_ignore_ascii_case("ok")
            || health.status.eq_ignore_ascii_case("healthy")
        {
            health.status.green().bold()
        } else {
            health.status.yellow().bold()
        };
        println!("Server:  {}", self.base_url);
        println!("Status:  {status}");
        if let Some(version) = &health.version {
            println!("Version: {version}");
        }
        if let Some(timestamp) = &health.timestamp {
            println!("Time:    {}", timestamp.dimmed());
        }
    }

    pub fn display_config(&self, config: &Config) {
        println!("Server:     {}", config.server_url);
        println!(
            "Thresholds: match {} · high {}",
            config.thresholds.visible, config.thresholds.high
        );
        println!("Endpoints:");
        for (name, path) in [
            ("lost", &config.endpoints.lost),
            ("found", &config.endpoints.found),
            ("history", &config.endpoints.history),
            ("reset", &config.endpoints.reset),
            ("health", &config.endpoints.health),
        ] {
            println!("  {:<8}{}", name, path.dimmed());
        }
    }
}

fn status_badge(status: MatchStatus) -> ColoredString {
    match status {
        MatchStatus::High => "HIGH".green().bold(),
        MatchStatus::Possible => "POSSIBLE".yellow(),
    }
}

fn percent_label(m: &Match) -> ColoredString {
    let text = format!("{:>3}%", m.percent);
    match m.status {
        MatchStatus::High => text.green(),
        MatchStatus::Possible => text.yellow(),
    }
}

fn location(location_type: &str, detail: Option<&str>) -> String {
    match detail.filter(|d| !d.trim().is_empty()) {
        Some(detail) => format!("{location_type} · {detail}"),
        None => location_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lostfound_common::{ItemId, RemoteItem};

    fn display_match(status: MatchStatus, image_url: &str) -> Match {
        Match {
            item: RemoteItem {
                id: ItemId::Number(4),
                image_url: "uploads/4.jpg".to_string(),
                location_type: "transit".to_string(),
                location_detail: Some("line 6".to_string()),
                time_frame: "this_week".to_string(),
                title: Some("Blue backpack".to_string()),
                description: None,
                created_at: "2024-05-03T12:00:00Z".to_string(),
            },
            image_url: image_url.to_string(),
            status,
            similarity: 0.745,
            percent: 75,
        }
    }

    #[test]
    fn format_match_includes_percent_label_and_metadata() {
        colored::control::set_override(false);
        let render = Render::new(&Config::default());
        let lines = render.format_match(&display_match(
            MatchStatus::Possible,
            "http://localhost:8000/uploads/4.jpg",
        ));

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(" 75%"));
        assert!(lines[0].contains("POSSIBLE"));
        assert!(lines[0].contains("Blue backpack"));
        assert!(lines[1].contains("transit · line 6"));
        assert!(lines[1].contains("Fri May 03 2024"));
        assert!(lines[2].contains("http://localhost:8000/uploads/4.jpg"));
    }

    #[test]
    fn location_skips_blank_detail() {
        assert_eq!(location("indoor", Some("  ")), "indoor");
        assert_eq!(location("indoor", None), "indoor");
        assert_eq!(location("indoor", Some("library")), "indoor · library");
    }

    #[test]
    fn format_match_skips_empty_image_url() {
        colored::control::set_override(false);
        let render = Render::new(&Config::default());
        let lines = render.format_match(&display_match(MatchStatus::High, ""));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("HIGH"));
    }
}
