//! The `{"status": .., "result": [..]}` envelope wrapped around every answer.

use serde::Deserialize;
use serde_json::Value;

/// A decoded hub answer.
#[derive(Debug, Clone, PartialEq)]
pub enum HubResponse {
    /// `status` is `OK` and `result` holds at least one record; the first one.
    Record(Value),
    /// `status` is `OK` with no record attached (typical for commands).
    Empty,
    /// Any other status, including a missing one.
    Failure { status: String },
}

#[derive(Deserialize)]
struct Envelope {
    status: Option<String>,
    result: Option<Value>,
}

impl HubResponse {
    /// Decode a response body. The HTTP status code is not consulted: the
    /// hub reports failures inside the envelope.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the body is not an envelope.
    pub fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_slice(body)?;
        if envelope.status.as_deref() != Some("OK") {
            return Ok(Self::Failure {
                status: envelope.status.unwrap_or_else(|| "missing".to_string()),
            });
        }
        let record = match envelope.result {
            Some(Value::Array(items)) => items.into_iter().next(),
            Some(record @ Value::Object(_)) => Some(record),
            _ => None,
        };
        Ok(record.map_or(Self::Empty, Self::Record))
    }

    /// `LastUpdate` field of the record, if any.
    #[must_use]
    pub fn last_update(&self) -> Option<&str> {
        match self {
            Self::Record(record) => record.get("LastUpdate").and_then(Value::as_str),
            Self::Empty | Self::Failure { .. } => None,
        }
    }
}
