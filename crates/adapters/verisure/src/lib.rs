//! # vsure-adapter-verisure
//!
//! Verisure adapter — the alarm-provider side of the bridge.
//!
//! Every [`AlarmProvider::fetch_overview`] call opens a fresh session:
//! login, installation lookup, overview retrieval, logout. Nothing is kept
//! between passes.
//!
//! ## Dependency rule
//! Depends on `vsure-app` (for the [`AlarmProvider`] port) and
//! `vsure-domain`.

pub mod config;
pub mod error;
pub mod models;

use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use vsure_app::ports::AlarmProvider;
use vsure_domain::error::{ProviderOperation, VsureError};
use vsure_domain::overview::Overview;

pub use self::config::VerisureConfig;
pub use self::error::VerisureError;

use self::models::{CookieResponse, Installation, OverviewResponse};

const ACCEPT_JSON: &str = "application/json, text/javascript, */*; q=0.01";

/// An authenticated session against one API host.
#[derive(Debug)]
struct Session {
    base_url: String,
    cookie: String,
}

impl Session {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(ACCEPT, ACCEPT_JSON)
            .header(COOKIE, format!("vid={}", self.cookie))
    }
}

/// HTTP client for the provider's cloud API.
#[derive(Debug, Clone)]
pub struct VerisureClient {
    http: reqwest::Client,
    config: VerisureConfig,
}

impl VerisureClient {
    /// Create a client for the account described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`VerisureError::Client`] if the HTTP client cannot be built.
    pub fn new(config: VerisureConfig) -> Result<Self, VerisureError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(VerisureError::Client)?;
        Ok(Self { http, config })
    }

    /// Log in, trying each API host in turn while they are unreachable.
    async fn login(&self) -> Result<Session, VerisureError> {
        let mut last_error = None;
        for base_url in &self.config.base_urls {
            let url = format!("{base_url}/cookie");
            let request = self
                .http
                .post(&url)
                .header(ACCEPT, ACCEPT_JSON)
                .basic_auth(
                    format!("CPE/{}", self.config.username),
                    Some(&self.config.password),
                );
            match request.send().await {
                Ok(response) => {
                    let answer: CookieResponse = decode(url, response).await?;
                    tracing::debug!(%base_url, "logged in");
                    return Ok(Session {
                        base_url: base_url.clone(),
                        cookie: answer.cookie,
                    });
                }
                Err(source) => {
                    tracing::warn!(%url, error = %source, "API host unreachable, trying next one");
                    last_error = Some(VerisureError::Transport { url, source });
                }
            }
        }
        Err(last_error.unwrap_or(VerisureError::NoBaseUrl))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, VerisureError> {
        let url = session.url(path);
        let response = session
            .authorize(self.http.get(&url).query(query))
            .send()
            .await
            .map_err(|source| VerisureError::Transport {
                url: url.clone(),
                source,
            })?;
        decode(url, response).await
    }

    /// Installation lookup followed by the overview itself.
    async fn retrieve(&self, session: &Session) -> Result<OverviewResponse, VerisureError> {
        let installations: Vec<Installation> = self
            .get_json(
                session,
                "/installation/search",
                &[("email", self.config.username.as_str())],
            )
            .await?;
        let giid = installations
            .into_iter()
            .next()
            .map(|installation| installation.giid)
            .ok_or(VerisureError::NoInstallation)?;
        tracing::debug!(%giid, "installation found");

        self.get_json(session, &format!("/installation/{giid}/overview"), &[])
            .await
    }

    async fn logout(&self, session: &Session) -> Result<(), VerisureError> {
        let url = session.url("/cookie");
        let response = session
            .authorize(self.http.delete(&url))
            .send()
            .await
            .map_err(|source| VerisureError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(VerisureError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(url: String, response: Response) -> Result<T, VerisureError> {
    let status = response.status();
    if !status.is_success() {
        return Err(VerisureError::Status {
            url,
            status: status.as_u16(),
        });
    }
    let body = response
        .bytes()
        .await
        .map_err(|source| VerisureError::Transport {
            url: url.clone(),
            source,
        })?;
    serde_json::from_slice(&body).map_err(|source| VerisureError::Decode { url, source })
}

impl AlarmProvider for VerisureClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_overview(&self) -> Result<Overview, VsureError> {
        let session = self.login().await.map_err(|err| {
            tracing::error!(error = %err, "login failed, check the username and password");
            err.into_domain(ProviderOperation::Login)
        })?;

        let retrieved = self.retrieve(&session).await;
        let logged_out = self.logout(&session).await;

        let wire = match retrieved {
            Ok(wire) => wire,
            Err(err) => {
                tracing::error!(error = %err, "failed to retrieve the overview");
                if let Err(logout_err) = logged_out {
                    tracing::warn!(error = %logout_err, "logout after failed retrieval also failed");
                }
                return Err(err.into_domain(ProviderOperation::Overview));
            }
        };
        logged_out.map_err(|err| {
            tracing::error!(error = %err, "logout failed");
            err.into_domain(ProviderOperation::Logout)
        })?;

        let overview = Overview::from(wire);
        tracing::debug!(?overview, "overview retrieved");
        Ok(overview)
    }
}
