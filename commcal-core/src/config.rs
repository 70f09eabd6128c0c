//! Client configuration.
//!
//! Loaded from `~/.config/commcal/config.toml`, then overridden by
//! `COMMCAL_*` environment variables (e.g. `COMMCAL_API_BASE_URL`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CalendarError, CalendarResult};

static DEFAULT_API_BASE_URL: &str = "https://community-calendar-backend-4uff.onrender.com/api";
static DEFAULT_SHARE_BASE_URL: &str = "https://community-calendar.example/";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STARTUP_PROBE_DELAY_MS: u64 = 200;
const DEFAULT_VISIBLE_EVENTS_PER_DAY: usize = 3;

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_share_base_url() -> String {
    DEFAULT_SHARE_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_startup_probe_delay_ms() -> u64 {
    DEFAULT_STARTUP_PROBE_DELAY_MS
}

fn default_visible_events_per_day() -> usize {
    DEFAULT_VISIBLE_EVENTS_PER_DAY
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommcalConfig {
    /// REST API root, e.g. `https://host/api`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Page that share links point at.
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long the first connection attempt may take before the service is
    /// reported as waking up.
    #[serde(default = "default_startup_probe_delay_ms")]
    pub startup_probe_delay_ms: u64,

    /// Events listed per day cell before collapsing into "+N more".
    #[serde(default = "default_visible_events_per_day")]
    pub visible_events_per_day: usize,
}

impl Default for CommcalConfig {
    fn default() -> Self {
        CommcalConfig {
            api_base_url: default_api_base_url(),
            share_base_url: default_share_base_url(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            startup_probe_delay_ms: DEFAULT_STARTUP_PROBE_DELAY_MS,
            visible_events_per_day: DEFAULT_VISIBLE_EVENTS_PER_DAY,
        }
    }
}

impl CommcalConfig {
    pub fn config_path() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("commcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, creating a commented-out default file on
    /// first use.
    pub fn load() -> CalendarResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may not exist) plus the environment.
    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        let config: CommcalConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("COMMCAL").try_parsing(true))
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = format!(
            "\
# commcal configuration

# Calendar service API:
# api_base_url = \"{}\"

# Page that shared event links open:
# share_base_url = \"{}\"

# Give up on a request after this many seconds:
# request_timeout_secs = {}

# Show a \"waking up\" notice if the first connection takes longer than this:
# startup_probe_delay_ms = {}

# Events shown per day in the month view:
# visible_events_per_day = {}
",
            DEFAULT_API_BASE_URL,
            DEFAULT_SHARE_BASE_URL,
            DEFAULT_REQUEST_TIMEOUT_SECS,
            DEFAULT_STARTUP_PROBE_DELAY_MS,
            DEFAULT_VISIBLE_EVENTS_PER_DAY,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn api_base_url(&self) -> CalendarResult<Url> {
        parse_url("api_base_url", &self.api_base_url)
    }

    pub fn share_base_url(&self) -> CalendarResult<Url> {
        parse_url("share_base_url", &self.share_base_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn startup_probe_delay(&self) -> Duration {
        Duration::from_millis(self.startup_probe_delay_ms)
    }
}

fn parse_url(key: &str, value: &str) -> CalendarResult<Url> {
    Url::parse(value).map_err(|e| CalendarError::Config(format!("Invalid {key} '{value}': {e}")))
}
