//! IMAP adapter error types.

use vsure_domain::error::VsureError;

/// Errors specific to the IMAP adapter.
#[derive(Debug, thiserror::Error)]
pub enum ImapError {
    #[error("could not connect to {host}:{port}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("connection to {host}:{port} timed out after {secs}s")]
    ConnectTimeout { host: String, port: u16, secs: u64 },

    #[error("TLS handshake failed")]
    Tls(#[source] async_native_tls::Error),

    /// STARTTLS was offered but the upgrade was refused.
    #[error("STARTTLS failed")]
    StartTls(#[source] async_imap::error::Error),

    #[error("failed to read CAPABILITY response")]
    CapabilityResponse(#[source] std::io::Error),

    #[error("failed to read server greeting")]
    Greeting(#[source] std::io::Error),

    #[error("server closed the connection before greeting")]
    NoGreeting,

    #[error("login rejected")]
    Login(#[source] async_imap::error::Error),

    /// A command after login failed.
    #[error("{command} failed")]
    Command {
        command: &'static str,
        #[source]
        source: async_imap::error::Error,
    },

    #[error("server does not support IDLE")]
    IdleUnsupported,

    /// A previous IDLE failed and took the session with it.
    #[error("mailbox session lost")]
    SessionLost,
}

impl ImapError {
    /// Convert into a [`VsureError::Mailbox`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> VsureError {
        VsureError::Mailbox(Box::new(self))
    }
}

impl From<ImapError> for VsureError {
    fn from(err: ImapError) -> Self {
        err.into_domain()
    }
}
