//! Mailbox configuration.

use std::time::Duration;

use serde::Deserialize;

/// Connection settings of the mailbox receiving the alarm's alert mails.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS. When `false`, STARTTLS is attempted on the plain
    /// connection.
    pub ssl: bool,
    /// Folder watched read-only.
    pub folder: String,
    pub username: String,
    pub password: String,
    pub connect_timeout_secs: u64,
    /// Servers drop idle connections after 30 minutes; IDLE is re-issued
    /// before that.
    pub idle_timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 993,
            ssl: true,
            folder: "INBOX".to_string(),
            username: String::new(),
            password: String::new(),
            connect_timeout_secs: 15,
            idle_timeout_secs: 29 * 60,
        }
    }
}

impl EmailConfig {
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = EmailConfig::default();
        assert_eq!(config.port, 993);
        assert!(config.ssl);
        assert_eq!(config.folder, "INBOX");
        assert_eq!(config.connect_timeout(), Duration::from_secs(15));
        assert_eq!(config.idle_timeout(), Duration::from_secs(1740));
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            host = "imap.example.com"
            port = 143
            ssl = false
            folder = "Alarm"
            username = "someone"
            password = "secret"
        "#;
        let config: EmailConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.host, "imap.example.com");
        assert_eq!(config.port, 143);
        assert!(!config.ssl);
        assert_eq!(config.folder, "Alarm");
        assert_eq!(config.connect_timeout_secs, 15);
    }
}
