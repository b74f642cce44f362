//! # vsure-adapter-domoticz
//!
//! Domoticz adapter — the automation hub side of the bridge.
//!
//! ## Responsibilities
//! - Ask the hub when a sensor was last updated (`type=devices&rid=..`)
//! - Push values through the `udevice` and `switchlight` commands
//! - Convert the hub's naive wall-clock timestamps to UTC
//!
//! Every call goes through [`DomoticzClient::execute`], which performs a
//! single GET and decodes the `{"status": .., "result": ..}` envelope. There
//! is no retry: a failure is logged with the offending URL and surfaced.
//!
//! ## Dependency rule
//! Depends on `vsure-app` (for the [`HubGateway`] port) and `vsure-domain`.

pub mod config;
pub mod envelope;
pub mod error;
pub mod request;
pub mod timezone;

use vsure_app::ports::{HubGateway, LastUpdate};
use vsure_domain::command::HubCommand;
use vsure_domain::error::VsureError;
use vsure_domain::sensor_index::SensorIndex;

pub use self::config::DomoticzConfig;
pub use self::envelope::HubResponse;
pub use self::error::DomoticzError;
pub use self::timezone::HubTimezone;

/// HTTP client for the hub's JSON API.
#[derive(Debug, Clone)]
pub struct DomoticzClient {
    http: reqwest::Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    timezone: HubTimezone,
}

impl DomoticzClient {
    /// Create a client for the hub described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DomoticzError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &DomoticzConfig, timezone: HubTimezone) -> Result<Self, DomoticzError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(DomoticzError::Client)?;
        Ok(Self {
            http,
            base_url: config.base_url(),
            username: config.username.clone().filter(|name| !name.is_empty()),
            password: config.password.clone(),
            timezone,
        })
    }

    fn url(&self, query: &str) -> String {
        format!("{}?{query}", self.base_url)
    }

    /// Perform one GET against the JSON API and decode the envelope.
    ///
    /// A [`HubResponse::Failure`] is returned as a value; callers decide what
    /// a non-OK status means for them.
    ///
    /// # Errors
    ///
    /// Returns [`DomoticzError::Transport`] when no answer came back,
    /// [`DomoticzError::HttpStatus`] for an HTTP error without an envelope and
    /// [`DomoticzError::Decode`] when a successful answer is not an envelope.
    pub async fn execute(&self, query: &str) -> Result<HubResponse, DomoticzError> {
        let url = self.url(query);
        tracing::debug!(%url, "querying hub");

        let mut request = self.http.get(&url);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let transport = |source: reqwest::Error| {
            tracing::error!(%url, error = %source, "hub did not answer");
            DomoticzError::Transport {
                url: url.clone(),
                source,
            }
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        // An envelope is honoured whatever the HTTP status; anything else on an
        // error status means the hub refused to serve us at all.
        let response = HubResponse::decode(&body).map_err(|source| {
            if status.is_success() {
                tracing::error!(%url, error = %source, "hub answer is not valid JSON");
                DomoticzError::Decode {
                    url: url.clone(),
                    source,
                }
            } else {
                tracing::error!(%url, %status, "hub answered with an HTTP error");
                DomoticzError::HttpStatus {
                    url: url.clone(),
                    status: status.as_u16(),
                }
            }
        })?;

        if let HubResponse::Failure { status } = &response {
            tracing::error!(%url, %status, "hub rejected request");
        }
        Ok(response)
    }

    async fn fetch_last_update(&self, idx: &SensorIndex) -> Result<LastUpdate, DomoticzError> {
        let query = request::device_info(idx);
        let response = self.execute(&query).await?;
        if let HubResponse::Failure { status } = response {
            return Err(DomoticzError::Rejected {
                url: self.url(&query),
                status,
            });
        }
        match response.last_update() {
            Some(raw) => self.timezone.parse_last_update(raw).map(LastUpdate::At),
            None => Ok(LastUpdate::NotFound),
        }
    }

    async fn apply(&self, command: &HubCommand) -> Result<(), DomoticzError> {
        let query = request::command(command);
        match self.execute(&query).await? {
            HubResponse::Record(_) | HubResponse::Empty => Ok(()),
            HubResponse::Failure { status } => Err(DomoticzError::Rejected {
                url: self.url(&query),
                status,
            }),
        }
    }
}

impl HubGateway for DomoticzClient {
    async fn last_update(&self, idx: &SensorIndex) -> Result<LastUpdate, VsureError> {
        self.fetch_last_update(idx)
            .await
            .map_err(DomoticzError::into_domain)
    }

    async fn send_command(&self, command: &HubCommand) -> Result<(), VsureError> {
        self.apply(command).await.map_err(DomoticzError::into_domain)
    }
}
