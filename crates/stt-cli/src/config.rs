//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use stt_core::{Settings, SubmissionTarget};

/// Application configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display and break-time settings.
    pub display: Settings,
    /// HR service credentials and booking target.
    pub hr: HrConfig,
}

/// HR service settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HrConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Previously issued token; refreshed before each use when credentials are set.
    pub access_token: String,
    pub user_id: String,
    pub project_id: String,
    pub category_id: String,
    /// Tracking status sent with submissions (`REQUESTED` or `EDITABLE`).
    pub status: String,
}

impl Default for HrConfig {
    fn default() -> Self {
        Self {
            base_url: stt_hr::DEFAULT_BASE_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            access_token: String::new(),
            user_id: String::new(),
            project_id: String::new(),
            category_id: String::new(),
            status: "REQUESTED".to_string(),
        }
    }
}

impl HrConfig {
    /// Where submitted time is booked.
    pub fn target(&self) -> SubmissionTarget {
        SubmissionTarget {
            status: self.status.clone(),
            project_id: self.project_id.clone(),
            category_id: self.category_id.clone(),
        }
    }
}

impl fmt::Debug for HrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &str| if value.is_empty() { "" } else { "[REDACTED]" };
        f.debug_struct("HrConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("access_token", &redact(&self.access_token))
            .field("user_id", &self.user_id)
            .field("project_id", &self.project_id)
            .field("category_id", &self.category_id)
            .field("status", &self.status)
            .finish()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("display", &self.display)
            .field("hr", &self.hr)
            .finish()
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (STT_DISPLAY__CSV_DELIMITER, STT_HR__USER_ID, ...)
        figment = figment.merge(Env::prefixed("STT_").split("__"));

        let mut config: Self = figment.extract()?;
        config.display = config.display.normalized();
        Ok(config)
    }
}

/// Returns the platform-specific config directory for stt.
///
/// On Linux: `~/.config/stt`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("stt"))
}
