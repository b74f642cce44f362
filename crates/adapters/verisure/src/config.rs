//! Verisure account configuration.

use serde::Deserialize;

/// The two API hosts the provider load-balances between.
pub const DEFAULT_BASE_URLS: [&str; 2] = [
    "https://e-api01.verisure.com/xbn/2",
    "https://e-api02.verisure.com/xbn/2",
];

/// Credentials and endpoints for the alarm provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerisureConfig {
    /// Account e-mail address.
    pub username: String,
    pub password: String,
    /// API roots, tried in order until one accepts the login.
    pub base_urls: Vec<String>,
}

impl Default for VerisureConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            base_urls: DEFAULT_BASE_URLS.iter().map(ToString::to_string).collect(),
        }
    }
}
