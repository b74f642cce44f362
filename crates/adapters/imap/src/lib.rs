//! # vsure-adapter-imap
//!
//! IMAP adapter — turns new mail in a folder into synchronization triggers.
//!
//! ## Responsibilities
//! - Connect with implicit TLS, or upgrade a plain connection with STARTTLS
//! - Log in and make sure the server supports IDLE
//! - Open the watched folder read-only and IDLE on it
//!
//! ## Dependency rule
//! Depends on `vsure-app` (for the [`MailboxNotifier`] port) and
//! `vsure-domain`.

pub mod config;
pub mod error;

use std::fmt;

use async_imap::extensions::idle::IdleResponse;
use async_imap::imap_proto::{Capability, Response, Status};
use async_imap::{Client, Session};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use vsure_app::ports::MailboxNotifier;
use vsure_domain::error::VsureError;

pub use self::config::EmailConfig;
pub use self::error::ImapError;

/// Plain or TLS-wrapped transport, chosen at connect time.
pub trait ImapStream: AsyncRead + AsyncWrite + Unpin + Send + fmt::Debug {}

impl<T> ImapStream for T where T: AsyncRead + AsyncWrite + Unpin + Send + fmt::Debug {}

type ImapSession = Session<Box<dyn ImapStream>>;

/// A logged-in session with the watched folder open read-only.
pub struct ImapNotifier {
    session: Option<ImapSession>,
    folder: String,
    idle_timeout: std::time::Duration,
}

impl fmt::Debug for ImapNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImapNotifier")
            .field("folder", &self.folder)
            .field("connected", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl ImapNotifier {
    /// Connect, log in, check for IDLE support and open the folder.
    ///
    /// # Errors
    ///
    /// Every step is fatal: unreachable server, TLS failure, rejected
    /// credentials, missing IDLE capability, unknown folder.
    #[tracing::instrument(skip(config), fields(host = %config.host, port = config.port))]
    pub async fn connect(config: &EmailConfig) -> Result<Self, ImapError> {
        let client = open_client(config).await?;

        let mut session = client
            .login(&config.username, &config.password)
            .await
            .map_err(|(err, _client)| ImapError::Login(err))?;
        tracing::debug!("logged in");

        let capabilities = session
            .capabilities()
            .await
            .map_err(|source| ImapError::Command {
                command: "CAPABILITY",
                source,
            })?;
        if !capabilities.has_str("IDLE") {
            return Err(ImapError::IdleUnsupported);
        }

        session
            .examine(&config.folder)
            .await
            .map_err(|source| ImapError::Command {
                command: "EXAMINE",
                source,
            })?;
        tracing::info!(folder = %config.folder, "watching mailbox folder");

        Ok(Self {
            session: Some(session),
            folder: config.folder.clone(),
            idle_timeout: config.idle_timeout(),
        })
    }

    async fn idle_until_new_data(&mut self) -> Result<(), ImapError> {
        loop {
            let session = self.session.take().ok_or(ImapError::SessionLost)?;
            let mut idle = session.idle();
            idle.init().await.map_err(|source| ImapError::Command {
                command: "IDLE",
                source,
            })?;

            let (wait, _interrupt) = idle.wait_with_timeout(self.idle_timeout);
            let response = wait.await.map_err(|source| ImapError::Command {
                command: "IDLE",
                source,
            })?;

            let session = idle.done().await.map_err(|source| ImapError::Command {
                command: "DONE",
                source,
            })?;
            self.session = Some(session);

            match response {
                IdleResponse::NewData(_) => {
                    tracing::info!(folder = %self.folder, "mailbox changed");
                    return Ok(());
                }
                IdleResponse::Timeout => {
                    tracing::debug!("IDLE timed out, re-issuing");
                }
                IdleResponse::ManualInterrupt => {
                    tracing::debug!("IDLE interrupted, re-issuing");
                }
            }
        }
    }
}

impl MailboxNotifier for ImapNotifier {
    async fn wait_for_change(&mut self) -> Result<(), VsureError> {
        self.idle_until_new_data()
            .await
            .map_err(ImapError::into_domain)
    }
}

async fn open_client(config: &EmailConfig) -> Result<Client<Box<dyn ImapStream>>, ImapError> {
    let address = (config.host.as_str(), config.port);
    let tcp = tokio::time::timeout(config.connect_timeout(), TcpStream::connect(address))
        .await
        .map_err(|_| ImapError::ConnectTimeout {
            host: config.host.clone(),
            port: config.port,
            secs: config.connect_timeout_secs,
        })?
        .map_err(|source| ImapError::Connect {
            host: config.host.clone(),
            port: config.port,
            source,
        })?;

    if config.ssl {
        let tls = tls_wrap(&config.host, tcp).await?;
        let mut client = Client::new(tls);
        read_greeting(&mut client).await?;
        return Ok(client);
    }

    let stream: Box<dyn ImapStream> = Box::new(tcp);
    let mut client = Client::new(stream);
    read_greeting(&mut client).await?;

    if !pre_auth_capabilities(&mut client)
        .await?
        .iter()
        .any(|capability| capability.eq_ignore_ascii_case("STARTTLS"))
    {
        tracing::warn!("server does not offer STARTTLS, continuing unencrypted");
        return Ok(client);
    }

    client
        .run_command_and_check_ok("STARTTLS", None)
        .await
        .map_err(ImapError::StartTls)?;
    let tls = tls_wrap(&config.host, client.into_inner()).await?;
    tracing::debug!("connection upgraded with STARTTLS");
    Ok(Client::new(tls))
}

async fn tls_wrap<S>(host: &str, stream: S) -> Result<Box<dyn ImapStream>, ImapError>
where
    S: ImapStream + 'static,
{
    let tls = async_native_tls::TlsConnector::new()
        .connect(host, stream)
        .await
        .map_err(ImapError::Tls)?;
    Ok(Box::new(tls))
}

/// `CAPABILITY` before login; only sessions expose a parsed variant.
async fn pre_auth_capabilities(
    client: &mut Client<Box<dyn ImapStream>>,
) -> Result<Vec<String>, ImapError> {
    client
        .run_command("CAPABILITY")
        .await
        .map_err(|source| ImapError::Command {
            command: "CAPABILITY",
            source,
        })?;

    let mut capabilities = Vec::new();
    loop {
        let response = match client.read_response().await {
            Some(Ok(response)) => response,
            Some(Err(err)) => return Err(ImapError::CapabilityResponse(err)),
            None => {
                return Err(ImapError::CapabilityResponse(
                    std::io::ErrorKind::UnexpectedEof.into(),
                ));
            }
        };
        match response.parsed() {
            Response::Capabilities(list) => {
                capabilities.extend(list.iter().filter_map(|capability| match capability {
                    Capability::Atom(name) => Some(name.to_string()),
                    _ => None,
                }));
            }
            Response::Done { status, .. } => {
                if !matches!(status, Status::Ok) {
                    tracing::warn!(?status, "CAPABILITY refused before login");
                }
                return Ok(capabilities);
            }
            _ => {}
        }
    }
}

async fn read_greeting(client: &mut Client<Box<dyn ImapStream>>) -> Result<(), ImapError> {
    match client.read_response().await {
        Some(Ok(_greeting)) => Ok(()),
        Some(Err(err)) => Err(ImapError::Greeting(err)),
        None => Err(ImapError::NoGreeting),
    }
}
