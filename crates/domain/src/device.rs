//! Device — the unit the update engine operates on.
//!
//! Every data point of an [`Overview`](crate::overview::Overview) that can be
//! pushed to the hub becomes one [`Device`] variant carrying only the fields
//! relevant to its kind.

use std::borrow::Cow;
use std::fmt;

use crate::overview::{ArmStatus, DoorWindowState};
use crate::sensor_index::SensorIndex;
use crate::time::Timestamp;

/// Type tag of a [`Device`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Climate,
    DoorWindow,
    SmsCount,
    ArmState,
    Ethernet,
    SwitchPlug,
}

impl DeviceKind {
    /// Lowercase type name, as used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Climate => "climate",
            Self::DoorWindow => "doorwindow",
            Self::SmsCount => "smscount",
            Self::ArmState => "armstate",
            Self::Ethernet => "ethstate",
            Self::SwitchPlug => "switchstate",
        }
    }

    /// Label given to devices the provider did not name.
    #[must_use]
    pub fn synthetic_label(self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single data point to synchronize, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Device {
    Climate {
        label: Option<String>,
        temperature: f64,
        humidity: Option<f64>,
    },
    DoorWindow {
        label: Option<String>,
        state: DoorWindowState,
    },
    SmsCount {
        total: u32,
    },
    ArmState {
        status: ArmStatus,
    },
    Ethernet {
        label: Option<String>,
        connected: bool,
    },
    /// A smart plug paired with its control plug.
    SwitchPlug {
        label: Option<String>,
        current_state: String,
    },
}

impl Device {
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Climate { .. } => DeviceKind::Climate,
            Self::DoorWindow { .. } => DeviceKind::DoorWindow,
            Self::SmsCount { .. } => DeviceKind::SmsCount,
            Self::ArmState { .. } => DeviceKind::ArmState,
            Self::Ethernet { .. } => DeviceKind::Ethernet,
            Self::SwitchPlug { .. } => DeviceKind::SwitchPlug,
        }
    }

    /// Label reported by the provider, if any.
    #[must_use]
    pub fn raw_label(&self) -> Option<&str> {
        match self {
            Self::Climate { label, .. }
            | Self::DoorWindow { label, .. }
            | Self::Ethernet { label, .. }
            | Self::SwitchPlug { label, .. } => label.as_deref(),
            Self::SmsCount { .. } | Self::ArmState { .. } => None,
        }
    }

    /// Label used for logging and sensor lookups.
    ///
    /// Falls back to the upper-cased kind name when the provider gave none.
    #[must_use]
    pub fn label(&self) -> Cow<'_, str> {
        match self.raw_label() {
            Some(label) => Cow::Borrowed(label),
            None => Cow::Owned(self.kind().synthetic_label()),
        }
    }
}

/// A device matched to its hub sensor, ready for the staleness gate.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionableDevice {
    pub sensor_index: SensorIndex,
    /// When the alarm provider last updated this data point.
    pub observed_at: Timestamp,
    pub device: Device,
}

impl ActionableDevice {
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.device.kind()
    }
}
