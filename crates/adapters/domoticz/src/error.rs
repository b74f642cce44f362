//! Domoticz adapter error types.

use vsure_domain::error::VsureError;

/// Errors specific to the Domoticz adapter.
#[derive(Debug, thiserror::Error)]
pub enum DomoticzError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request never got an answer (connection refused, DNS, timeout).
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// An HTTP error status (401, 5xx, ...) without an envelope.
    #[error("hub answered {url} with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    /// The answer was not a JSON envelope.
    #[error("response from {url} is not a valid envelope")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope carried a status other than `OK`.
    #[error("hub answered {url} with status {status:?}")]
    Rejected { url: String, status: String },

    /// `LastUpdate` did not follow the expected format.
    #[error("last update {raw:?} is not a valid hub timestamp")]
    TimestampFormat {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    /// `LastUpdate` names a wall-clock time that does not exist in the zone.
    #[error("last update {raw:?} does not exist in timezone {timezone}")]
    NonexistentLocalTime { raw: String, timezone: String },

    /// The configured timezone is neither `local` nor an IANA name.
    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),
}

impl DomoticzError {
    /// Convert into a [`VsureError`] for propagation across port boundaries.
    ///
    /// Transport failures and bare HTTP errors mean the hub is unusable;
    /// everything else is a failed query.
    pub fn into_domain(self) -> VsureError {
        match self {
            Self::Transport { .. } | Self::HttpStatus { .. } => {
                VsureError::HubUnreachable(Box::new(self))
            }
            other => VsureError::HubQuery(Box::new(other)),
        }
    }
}

impl From<DomoticzError> for VsureError {
    fn from(err: DomoticzError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_rejected_status_with_url() {
        let err = DomoticzError::Rejected {
            url: "http://hub:8080/json.htm?type=devices&rid=7".to_string(),
            status: "ERR".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "hub answered http://hub:8080/json.htm?type=devices&rid=7 with status \"ERR\""
        );
    }

    #[test]
    fn should_convert_rejected_to_hub_query() {
        let err: VsureError = DomoticzError::Rejected {
            url: String::new(),
            status: "ERR".to_string(),
        }
        .into();
        assert!(matches!(err, VsureError::HubQuery(_)));
        assert!(!err.is_fatal_for_pass());
    }

    #[test]
    fn should_convert_decode_error_to_hub_query() {
        let source = serde_json::from_str::<serde_json::Value>("{{bad").unwrap_err();
        let err: VsureError = DomoticzError::Decode {
            url: String::new(),
            source,
        }
        .into();
        assert!(matches!(err, VsureError::HubQuery(_)));
    }

    #[test]
    fn should_convert_http_status_to_unreachable_hub() {
        let err: VsureError = DomoticzError::HttpStatus {
            url: String::new(),
            status: 401,
        }
        .into();
        assert!(matches!(err, VsureError::HubUnreachable(_)));
    }

    #[test]
    fn should_convert_bad_timestamp_to_hub_query() {
        let err: VsureError = DomoticzError::NonexistentLocalTime {
            raw: "2024-03-31 02:30:00".to_string(),
            timezone: "Europe/Brussels".to_string(),
        }
        .into();
        assert!(matches!(err, VsureError::HubQuery(_)));
    }
}
