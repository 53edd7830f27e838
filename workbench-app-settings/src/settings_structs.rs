use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_APP_NAME: &str = "Data Anonymization System";
pub const DEFAULT_APP_VERSION: &str = "1.0.0";
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 50;
pub const DEFAULT_ACCEPTED_FORMATS: [&str; 3] = [".csv", ".xlsx", ".xls"];

/// Runtime settings document, read once at startup.
#[cfg_attr(test, derive(PartialEq))]
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AppSettings {
    pub api: ApiSettings,
    #[serde(default)]
    pub app: AppInfo,
    #[serde(default)]
    pub upload: UploadSettings,
}

#[cfg_attr(test, derive(PartialEq))]
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    #[serde(default)]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

#[cfg_attr(test, derive(PartialEq))]
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

#[cfg_attr(test, derive(PartialEq))]
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadSettings {
    #[serde(rename = "maxFileSizeMB")]
    pub max_file_size_mb: u64,
    pub accepted_formats: Vec<String>,
}

fn default_timeout() -> u64 {
    DEFAULT_API_TIMEOUT_MS
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_API_TIMEOUT_MS,
        }
    }
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            version: DEFAULT_APP_VERSION.to_string(),
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            accepted_formats: DEFAULT_ACCEPTED_FORMATS
                .iter()
                .map(|format| format.to_string())
                .collect(),
        }
    }
}
