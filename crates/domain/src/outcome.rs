//! Outcomes of a synchronization pass.

use std::fmt;

use crate::device::DeviceKind;
use crate::error::MappingError;
use crate::sensor_index::SensorIndex;

/// Final state of one device after the update engine processed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceOutcome {
    Skipped(SkipReason),
    Updated,
    Failed(FailureReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The hub already holds data at least as recent.
    NotNewer,
    /// The hub has no device with the configured index.
    UnknownToHub,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Reading the hub's last update failed.
    HubQuery,
    /// The update request was not acknowledged.
    HubWrite,
    /// The provider reported a state value with no hub mapping.
    UnrecognizedState(String),
}

impl fmt::Display for DeviceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped(SkipReason::NotNewer) => f.write_str("skipped (hub up to date)"),
            Self::Skipped(SkipReason::UnknownToHub) => f.write_str("skipped (unknown to hub)"),
            Self::Updated => f.write_str("updated"),
            Self::Failed(FailureReason::HubQuery) => f.write_str("failed (hub query)"),
            Self::Failed(FailureReason::HubWrite) => f.write_str("failed (hub write)"),
            Self::Failed(FailureReason::UnrecognizedState(raw)) => {
                write!(f, "failed (unrecognized state {raw:?})")
            }
        }
    }
}

/// Outcome of one device, tagged with what it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReport {
    pub kind: DeviceKind,
    pub label: String,
    pub sensor_index: SensorIndex,
    pub outcome: DeviceOutcome,
}

/// Summary of a full synchronization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub devices: Vec<DeviceReport>,
    pub issues: Vec<MappingError>,
}

impl PassReport {
    #[must_use]
    pub fn updated(&self) -> usize {
        self.count(|outcome| matches!(outcome, DeviceOutcome::Updated))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, DeviceOutcome::Skipped(_)))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, DeviceOutcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&DeviceOutcome) -> bool) -> usize {
        self.devices
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}
