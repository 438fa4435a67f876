use std::path::Path;
use std::sync::Arc;

use crate::core::{MailConfig, ShowtimesResult};
use crate::metrics;
use crate::models::{NotificationEmail, Report};
use crate::templates::ShowtimesRenderer;

pub fn subject_for(today: &str, end_date: &str) -> String {
    format!("Repertuar nowych filmów na {} - {}", today, end_date)
}

/// Reads one address per line. Blank lines are skipped; a missing file means
/// nobody to notify.
pub fn load_recipients(path: &Path) -> ShowtimesResult<Vec<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("Recipients file not found: {:?}", path);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Builds notification messages from reports. Sending them is left to the
/// caller.
pub struct EmailComposer {
    renderer: Arc<ShowtimesRenderer>,
    sender: String,
    recipients: Vec<String>,
}

impl EmailComposer {
    pub fn new(renderer: Arc<ShowtimesRenderer>, sender: impl Into<String>, recipients: Vec<String>) -> Self {
        EmailComposer {
            renderer,
            sender: sender.into(),
            recipients,
        }
    }

    pub fn from_config(renderer: Arc<ShowtimesRenderer>, config: &MailConfig) -> ShowtimesResult<Self> {
        let recipients = load_recipients(&config.recipients_file)?;
        tracing::info!(
            "Loaded {} recipient(s) from {:?}",
            recipients.len(),
            config.recipients_file
        );
        Ok(Self::new(renderer, config.sender_email.clone(), recipients))
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    pub fn compose(&self, report: &Report) -> ShowtimesResult<NotificationEmail> {
        if self.recipients.is_empty() {
            tracing::warn!("Composing a notification with no recipients");
        }

        let html = match self.renderer.render(report) {
            Ok(html) => html,
            Err(e) => {
                metrics::record_compose("error");
                return Err(e);
            }
        };
        metrics::record_compose("ok");

        Ok(NotificationEmail {
            from: self.sender.clone(),
            to: self.recipients.clone(),
            subject: subject_for(&report.today, &report.end_date),
            html,
        })
    }

    /// Like [`compose`](Self::compose), but yields nothing when the report has
    /// no movies: there is nothing new to announce.
    pub fn compose_if_any(&self, report: &Report) -> ShowtimesResult<Option<NotificationEmail>> {
        if report.is_empty() {
            tracing::info!("No new movies between {} and {}", report.today, report.end_date);
            metrics::record_compose("skipped");
            return Ok(None);
        }
        self.compose(report).map(Some)
    }
}
