//! Configuration loading — TOML file with environment variable overrides.
//!
//! The file defaults to `vsure.toml` in the working directory. When it does
//! not exist a template is written in its place and loading fails, so the
//! user can fill it in and re-run. Credentials can be supplied through the
//! environment instead of the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use vsure_adapter_domoticz::{DomoticzConfig, DomoticzError, HubTimezone};
use vsure_adapter_imap::EmailConfig;
use vsure_adapter_verisure::VerisureConfig;
use vsure_domain::error::ValidationError;
use vsure_domain::sensor_index::{SensorIndex, SensorIndexMap};

/// Written when the configuration file is missing.
pub const TEMPLATE: &str = r#"[domoticz]
protocol = "http"
host = "localhost"
port = 8080
# username = ""
# password = ""

[verisure]
username = ""
password = ""

[global]
# debug, info, warning, error or critical
loglevel = "warning"
# "local" or an IANA zone name such as "Europe/Brussels"
timezone = "local"

# Only needed for `vsure watch`.
[email]
host = ""
port = 993
ssl = true
folder = "INBOX"
username = ""
password = ""

# Device label = Domoticz device index. "sms count" and "arm state" are
# mandatory.
[sensorindex]
"sms count" = "XX"
"arm state" = "XX"
"AAAA BBBB" = "XX"
"#;

/// Top-level configuration. Every section but `[email]` must be present;
/// keys inside a section fall back to their defaults.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub domoticz: DomoticzConfig,
    pub verisure: VerisureConfig,
    pub global: GlobalConfig,
    /// Device label to hub sensor index.
    pub sensorindex: HashMap<String, SensorIndex>,
    /// Mailbox settings, only required by the watch mode.
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub loglevel: LogLevel,
    /// Zone of the hub's wall-clock timestamps.
    pub timezone: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            loglevel: LogLevel::Warning,
            timezone: "local".to_string(),
        }
    }
}

/// Log levels accepted on the command line and in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// `tracing` level name; `critical` has no equivalent and maps to `error`.
    #[must_use]
    pub fn as_tracing(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }

    /// Filter directives enabling this level for every workspace crate.
    #[must_use]
    pub fn directives(self) -> String {
        const TARGETS: [&str; 6] = [
            "vsure",
            "vsure_app",
            "vsure_domain",
            "vsure_adapter_domoticz",
            "vsure_adapter_verisure",
            "vsure_adapter_imap",
        ];
        let level = self.as_tracing();
        TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Config {
    /// Load `path`, apply environment overrides and validate.
    ///
    /// `needs_mailbox` makes the `[email]` section mandatory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TemplateWritten`] if the file did not exist,
    /// or any parse / validation error.
    pub fn load(path: &Path, needs_mailbox: bool) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate(needs_mailbox)?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                std::fs::write(path, TEMPLATE).map_err(ConfigError::Io)?;
                Err(ConfigError::TemplateWritten(path.to_path_buf()))
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("VSURE_VERISURE_USERNAME") {
            self.verisure.username = val;
        }
        if let Some(val) = lookup("VSURE_VERISURE_PASSWORD") {
            self.verisure.password = val;
        }
        if let Some(val) = lookup("VSURE_DOMOTICZ_PASSWORD") {
            self.domoticz.password = Some(val);
        }
        if let (Some(val), Some(email)) = (lookup("VSURE_EMAIL_PASSWORD"), self.email.as_mut()) {
            email.password = val;
        }
    }

    fn validate(&self, needs_mailbox: bool) -> Result<(), ConfigError> {
        require("domoticz", "protocol", &self.domoticz.protocol)?;
        require("domoticz", "host", &self.domoticz.host)?;
        if self.domoticz.port == 0 {
            return Err(ConfigError::Validation(
                "domoticz port must be non-zero".to_string(),
            ));
        }
        require("verisure", "username", &self.verisure.username)?;
        require("verisure", "password", &self.verisure.password)?;
        self.hub_timezone()?;
        self.sensor_index_map()?;

        if needs_mailbox {
            let email = self
                .email
                .as_ref()
                .ok_or(ConfigError::MissingSection("email"))?;
            require("email", "host", &email.host)?;
            require("email", "folder", &email.folder)?;
            require("email", "username", &email.username)?;
            require("email", "password", &email.password)?;
            if email.port == 0 {
                return Err(ConfigError::Validation(
                    "email port must be non-zero".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The validated sensor index map.
    ///
    /// # Errors
    ///
    /// Fails when a mandatory label is missing or an index is empty or still
    /// the template placeholder.
    pub fn sensor_index_map(&self) -> Result<SensorIndexMap, ConfigError> {
        Ok(SensorIndexMap::new(self.sensorindex.clone())?)
    }

    /// # Errors
    ///
    /// Fails when the timezone is neither `local` nor a known IANA name.
    pub fn hub_timezone(&self) -> Result<HubTimezone, ConfigError> {
        self.global
            .timezone
            .parse()
            .map_err(ConfigError::Timezone)
    }
}

fn require(section: &'static str, key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyKey { section, key });
    }
    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[source] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read or write config file")]
    Io(#[source] std::io::Error),
    /// No file existed; a template was written in its place.
    #[error("config file not found, a template was written to {}", .0.display())]
    TemplateWritten(PathBuf),
    #[error("section [{0}] is missing")]
    MissingSection(&'static str),
    #[error("mandatory key {key} is empty in section [{section}]")]
    EmptyKey {
        section: &'static str,
        key: &'static str,
    },
    #[error("invalid sensor index configuration")]
    SensorIndex(#[from] ValidationError),
    #[error("invalid timezone")]
    Timezone(#[source] DomoticzError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
