use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Client configuration loaded from environment variables.
/// Every variable has a default; only malformed values are rejected.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the scoring service, without a trailing slash.
    pub api_url: String,
    pub request_timeout: Duration,
    /// Where downloaded PDF reports are written.
    pub report_dir: PathBuf,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            report_dir: PathBuf::from("."),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_url = std::env::var("COACH_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_secs = match std::env::var("COACH_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)
                .context("COACH_REQUEST_TIMEOUT_SECS must be a positive number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_url: normalize_url(&api_url),
            request_timeout: Duration::from_secs(timeout_secs),
            report_dir: std::env::var("COACH_REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Replaces the service URL, e.g. from a command-line flag.
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = normalize_url(url);
        self
    }

    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    let secs = raw.trim().parse::<u64>()?;
    if secs == 0 {
        bail!("timeout of 0 seconds would fail every request");
    }
    Ok(secs)
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
