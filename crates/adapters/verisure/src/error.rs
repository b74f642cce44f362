//! Verisure adapter error types.

use vsure_domain::error::{ProviderOperation, VsureError};

/// Errors specific to the Verisure adapter.
#[derive(Debug, thiserror::Error)]
pub enum VerisureError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// No API host is configured.
    #[error("no API base URL configured")]
    NoBaseUrl,

    /// The request never got an answer.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("{url} answered with HTTP status {status}")]
    Status { url: String, status: u16 },

    /// The body did not match the expected shape.
    #[error("unexpected response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The account has no installation attached.
    #[error("no installation found for this account")]
    NoInstallation,
}

impl VerisureError {
    /// Convert into a [`VsureError::Provider`] tagged with the session step
    /// that failed.
    pub fn into_domain(self, operation: ProviderOperation) -> VsureError {
        VsureError::Provider {
            operation,
            source: Box::new(self),
        }
    }
}
