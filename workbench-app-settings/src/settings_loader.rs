use std::env;
use std::fs;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::settings_structs::{AppSettings, DEFAULT_API_TIMEOUT_MS};

pub const API_BASE_URL_ENV: &str = "WORKBENCH_API_BASE_URL";

const SETTINGS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

impl AppSettings {
    /// Loads the settings document from a file path or an `http(s)://` URL.
    ///
    /// Never fails: an unreachable or malformed document, or one without an
    /// `api.baseUrl`, falls back to the built-in defaults. The
    /// `WORKBENCH_API_BASE_URL` environment variable overrides the base URL
    /// afterwards.
    pub async fn load(source: &str) -> AppSettings {
        info!("Settings source: {source}");

        let settings = match Self::read_source(source).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings from {source}, using built-in defaults: {e:#}");
                AppSettings::default()
            }
        };

        settings.with_base_url_override(env::var(API_BASE_URL_ENV).ok())
    }

    /// Parses a settings document, requiring a non-empty `api.baseUrl`.
    pub fn from_json(content: &str) -> Result<AppSettings> {
        let settings: AppSettings =
            serde_json::from_str(content).context("Malformed settings document")?;

        if settings.api.base_url.trim().is_empty() {
            bail!("api.baseUrl missing in settings document");
        }

        Ok(settings)
    }

    pub fn with_base_url_override(mut self, base_url: Option<String>) -> AppSettings {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            info!("Overriding api.baseUrl with {base_url}");
            self.api.base_url = base_url;
        }
        self
    }

    /// A timeout of 0 means "not set" and uses the default.
    pub fn request_timeout(&self) -> Duration {
        match self.api.timeout {
            0 => Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
            timeout => Duration::from_millis(timeout),
        }
    }

    async fn read_source(source: &str) -> Result<AppSettings> {
        let content = if source.starts_with("http://") || source.starts_with("https://") {
            let response = reqwest::Client::builder()
                .timeout(SETTINGS_FETCH_TIMEOUT)
                .build()
                .context("Failed to create HTTP client")?
                .get(source)
                .send()
                .await
                .context("Failed to fetch settings document")?;

            let status = response.status();
            if !status.is_success() {
                bail!("HTTP {status}");
            }
            response
                .text()
                .await
                .context("Failed to read settings document")?
        } else {
            fs::read_to_string(source).with_context(|| format!("Failed to read {source}"))?
        };

        Self::from_json(&content)
    }
}
