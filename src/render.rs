use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use showtimes_mailer::core::AppConfig;
use showtimes_mailer::models::{date_range, Report};
use showtimes_mailer::notification::EmailComposer;
use showtimes_mailer::templates::ShowtimesRenderer;
use tracing_subscriber::EnvFilter;

/// Render a showtimes report (JSON) into the notification HTML
#[derive(Parser, Debug)]
#[command(name = "render", version, about)]
struct Args {
    /// Report JSON file (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (writes stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace the report's date range with N days starting today
    /// (DAYS_AHEAD when given without a value)
    #[arg(short, long, num_args = 0..=1)]
    days: Option<Option<u32>>,

    /// Emit the composed notification as JSON instead of bare HTML
    #[arg(long)]
    email: bool,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout stays clean for the document
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env()?;

    let raw = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read report: {:?}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read report from stdin")?;
            buf
        }
    };

    let mut report = Report::from_json_str(&raw)?;

    if let Some(days) = args.days {
        let days = days.unwrap_or(config.mail.days_ahead);
        let (today, end_date) = date_range(chrono::Local::now().date_naive(), days)?;
        report.today = today.format("%Y-%m-%d").to_string();
        report.end_date = end_date.format("%Y-%m-%d").to_string();
    }

    let renderer = Arc::new(ShowtimesRenderer::new(config.render.clone())?);

    let document = if args.email {
        let composer = EmailComposer::from_config(renderer, &config.mail)?;
        serde_json::to_string_pretty(&composer.compose(&report)?)?
    } else {
        renderer.render(&report)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Wrote {} bytes to {:?}", document.len(), path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(document.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}
