use crate::status::LifecycleStatus;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DashboardConfig {
    pub notices: NoticeConfig,
    pub pager: PagerConfig,
    pub service: ServiceConfig,
    pub system: SystemConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NoticeConfig {
    /// Check for deprecation notices when the connection becomes active
    #[serde(default = "default_notices_enabled")]
    pub enabled: bool,

    /// Path of the JSON document the notice client reads
    #[serde(default = "default_notice_source_path")]
    pub source_path: String,

    /// What to do with delivered notices
    #[serde(default = "default_notice_presentation")]
    pub presentation: NoticePresentation,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PagerConfig {
    /// Hide the tab strip until the first activation
    #[serde(default = "default_pager_start_disabled")]
    pub start_disabled: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Simulated delay between Starting and Started
    #[serde(default = "default_start_delay_ms")]
    pub start_delay_ms: u64,

    /// Simulated delay between Stopping and Stopped
    #[serde(default = "default_stop_delay_ms")]
    pub stop_delay_ms: u64,

    /// Status reported before the service is touched (stopped, started, ...)
    #[serde(default = "default_initial_status")]
    pub initial_status: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemConfig {
    /// Capacity of the status broadcast channel
    #[serde(default = "default_status_channel_capacity")]
    pub status_channel_capacity: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticePresentation {
    /// Consume the notices without showing them
    Drain,
    /// Write each notice to the log
    Log,
}

impl DashboardConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("dashboard.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("notices.enabled", default_notices_enabled())?
            .set_default("notices.source_path", default_notice_source_path())?
            .set_default("notices.presentation", "drain")?
            .set_default("pager.start_disabled", default_pager_start_disabled())?
            .set_default("service.start_delay_ms", default_start_delay_ms())?
            .set_default("service.stop_delay_ms", default_stop_delay_ms())?
            .set_default("service.initial_status", default_initial_status())?
            .set_default(
                "system.status_channel_capacity",
                default_status_channel_capacity() as i64,
            )?
            .add_source(File::with_name(&path_str).required(false))
            .add_source(
                Environment::with_prefix("DASHBOARD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: DashboardConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.system.status_channel_capacity == 0 {
            return Err(ConfigError::Message(
                "Status channel capacity must be greater than 0".to_string(),
            ));
        }

        if self.notices.enabled && self.notices.source_path.trim().is_empty() {
            return Err(ConfigError::Message(
                "Notice source path must not be empty when notices are enabled".to_string(),
            ));
        }

        self.initial_status()?;

        Ok(())
    }

    /// Parsed `service.initial_status`
    pub fn initial_status(&self) -> Result<LifecycleStatus, ConfigError> {
        self.service
            .initial_status
            .parse::<LifecycleStatus>()
            .map_err(|e| ConfigError::Message(format!("Invalid initial status: {}", e)))
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            notices: NoticeConfig {
                enabled: default_notices_enabled(),
                source_path: default_notice_source_path(),
                presentation: default_notice_presentation(),
            },
            pager: PagerConfig {
                start_disabled: default_pager_start_disabled(),
            },
            service: ServiceConfig {
                start_delay_ms: default_start_delay_ms(),
                stop_delay_ms: default_stop_delay_ms(),
                initial_status: default_initial_status(),
            },
            system: SystemConfig {
                status_channel_capacity: default_status_channel_capacity(),
            },
        }
    }
}

fn default_notices_enabled() -> bool {
    true
}
fn default_notice_source_path() -> String {
    "./notices.json".to_string()
}
fn default_notice_presentation() -> NoticePresentation {
    NoticePresentation::Drain
}

fn default_pager_start_disabled() -> bool {
    true
}

fn default_start_delay_ms() -> u64 {
    500
}
fn default_stop_delay_ms() -> u64 {
    300
}
fn default_initial_status() -> String {
    "stopped".to_string()
}

fn default_status_channel_capacity() -> usize {
    32
}
