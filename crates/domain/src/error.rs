//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`VsureError`]
//! when crossing a port boundary. Adapter errors travel as boxed sources so
//! the full chain stays available for logging.

use std::fmt;

/// Boxed error used to carry adapter-specific sources across ports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for every fallible operation in the bridge.
#[derive(Debug, thiserror::Error)]
pub enum VsureError {
    /// A step of the alarm-provider session failed.
    #[error("alarm provider {operation} failed")]
    Provider {
        operation: ProviderOperation,
        #[source]
        source: BoxError,
    },

    /// The hub could not be reached at all.
    #[error("automation hub unreachable")]
    HubUnreachable(#[source] BoxError),

    /// The hub answered but the query did not succeed.
    #[error("automation hub query failed")]
    HubQuery(#[source] BoxError),

    /// The mailbox trigger failed.
    #[error("mailbox error")]
    Mailbox(#[source] BoxError),
}

impl VsureError {
    /// Whether this error must abort the whole synchronization pass.
    ///
    /// Hub query failures only affect the device being processed; everything
    /// else means the pass cannot produce trustworthy results.
    #[must_use]
    pub fn is_fatal_for_pass(&self) -> bool {
        !matches!(self, Self::HubQuery(_))
    }
}

/// Step of the alarm-provider session that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOperation {
    Login,
    Overview,
    Logout,
}

impl fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::Overview => f.write_str("overview retrieval"),
            Self::Logout => f.write_str("logout"),
        }
    }
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A sensor index was empty.
    #[error("sensor index for {label:?} is empty")]
    EmptySensorIndex { label: String },

    /// A sensor index still carries the template placeholder.
    #[error("sensor index for {label:?} is still the placeholder {placeholder:?}")]
    PlaceholderSensorIndex {
        label: String,
        placeholder: &'static str,
    },

    /// One of the mandatory synthetic labels has no sensor index.
    #[error("mandatory sensor index {0:?} is missing")]
    MissingMandatoryLabel(&'static str),
}

/// Problems found while turning an overview into actionable devices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// Smart plugs and control plugs are paired by position and must line up.
    #[error("{smart} smart plugs cannot be paired with {control} control plugs")]
    PlugCountMismatch { smart: usize, control: usize },
}
