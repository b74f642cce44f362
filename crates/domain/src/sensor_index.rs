//! Sensor indices — the hub's identifiers for the virtual devices we feed.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Label under which the SMS counter's sensor index is configured.
pub const SMS_COUNT_LABEL: &str = "sms count";
/// Label under which the arm state's sensor index is configured.
pub const ARM_STATE_LABEL: &str = "arm state";
/// Value the configuration template ships with for every index.
pub const PLACEHOLDER_INDEX: &str = "XX";

/// Identifier of one hub virtual device (`idx` in the hub API).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SensorIndex(String);

impl SensorIndex {
    /// Wrap a raw identifier without validation.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(&self, label: &str) -> Result<(), ValidationError> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySensorIndex {
                label: label.to_string(),
            });
        }
        if trimmed.eq_ignore_ascii_case(PLACEHOLDER_INDEX) {
            return Err(ValidationError::PlaceholderSensorIndex {
                label: label.to_string(),
                placeholder: PLACEHOLDER_INDEX,
            });
        }
        Ok(())
    }
}

impl fmt::Display for SensorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Config files write indices either as `"7"` or `7`.
impl<'de> Deserialize<'de> for SensorIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(value) => Self(value.to_string()),
            Raw::Text(value) => Self(value.trim().to_string()),
        })
    }
}

/// Device label → hub sensor index.
///
/// Labels are matched case-sensitively. The two synthetic labels
/// [`SMS_COUNT_LABEL`] and [`ARM_STATE_LABEL`] are mandatory.
#[derive(Debug, Clone)]
pub struct SensorIndexMap {
    sms_count: SensorIndex,
    arm_state: SensorIndex,
    entries: HashMap<String, SensorIndex>,
}

impl SensorIndexMap {
    /// Build the map, checking every index and the mandatory labels.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingMandatoryLabel`] when `"sms count"`
    /// or `"arm state"` is absent, and an index error when any value is
    /// empty or still the template placeholder.
    pub fn new(entries: HashMap<String, SensorIndex>) -> Result<Self, ValidationError> {
        for (label, index) in &entries {
            index.validate(label)?;
        }
        let sms_count = entries
            .get(SMS_COUNT_LABEL)
            .cloned()
            .ok_or(ValidationError::MissingMandatoryLabel(SMS_COUNT_LABEL))?;
        let arm_state = entries
            .get(ARM_STATE_LABEL)
            .cloned()
            .ok_or(ValidationError::MissingMandatoryLabel(ARM_STATE_LABEL))?;
        Ok(Self {
            sms_count,
            arm_state,
            entries,
        })
    }

    /// Look up the index configured for a device label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&SensorIndex> {
        self.entries.get(label)
    }

    #[must_use]
    pub fn sms_count(&self) -> &SensorIndex {
        &self.sms_count
    }

    #[must_use]
    pub fn arm_state(&self) -> &SensorIndex {
        &self.arm_state
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<HashMap<String, SensorIndex>> for SensorIndexMap {
    type Error = ValidationError;

    fn try_from(entries: HashMap<String, SensorIndex>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}
