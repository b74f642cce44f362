//! Domoticz connection configuration.

use serde::Deserialize;

/// Where the hub's JSON API lives and how to authenticate against it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DomoticzConfig {
    /// `http` or `https`.
    pub protocol: String,
    /// Hostname or IP address of the hub.
    pub host: String,
    pub port: u16,
    /// Basic-auth user, when the hub has authentication enabled.
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for DomoticzConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 8080,
            username: None,
            password: None,
        }
    }
}

impl DomoticzConfig {
    /// The JSON API endpoint every query is appended to.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}/json.htm", self.protocol, self.host, self.port)
    }
}
