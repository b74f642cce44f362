//! Overview — one consolidated snapshot of the alarm-provider account.
//!
//! Fetched fresh for every synchronization pass and discarded afterwards.

use std::fmt;

use crate::time::Timestamp;

/// Snapshot of everything the alarm provider reports for one installation.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub climate: Vec<ClimateReading>,
    pub door_windows: Vec<DoorWindow>,
    /// Total SMS messages sent by the alarm; carries no timestamp of its own.
    pub sms_count: u32,
    pub arm_state: ArmState,
    pub ethernet: EthernetStatus,
    pub smart_plugs: Vec<Plug>,
    pub control_plugs: Vec<Plug>,
}

/// Temperature (and optionally humidity) reported by one climate sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateReading {
    pub label: Option<String>,
    pub temperature: f64,
    pub humidity: Option<f64>,
    pub time: Timestamp,
}

/// One door/window contact.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorWindow {
    pub label: Option<String>,
    pub state: DoorWindowState,
    pub report_time: Timestamp,
}

/// Contact state as reported by the alarm provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoorWindowState {
    Open,
    Close,
    /// Anything the provider sends that we have no mapping for.
    Unrecognized(String),
}

impl DoorWindowState {
    /// Parse the provider's wire value (`OPEN` / `CLOSE`).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "OPEN" => Self::Open,
            "CLOSE" => Self::Close,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for DoorWindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("OPEN"),
            Self::Close => f.write_str("CLOSE"),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// Alarm arm state and when it last changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmState {
    pub status: ArmStatus,
    pub date: Timestamp,
}

/// Arm status as reported by the alarm provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArmStatus {
    Disarmed,
    ArmedHome,
    ArmedAway,
    /// Anything the provider sends that we have no mapping for.
    Unrecognized(String),
}

impl ArmStatus {
    /// Parse the provider's wire value (`DISARMED`, `ARMED_HOME`, `ARMED_AWAY`).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "DISARMED" => Self::Disarmed,
            "ARMED_HOME" => Self::ArmedHome,
            "ARMED_AWAY" => Self::ArmedAway,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for ArmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disarmed => f.write_str("DISARMED"),
            Self::ArmedHome => f.write_str("ARMED_HOME"),
            Self::ArmedAway => f.write_str("ARMED_AWAY"),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// Result of the alarm's latest ethernet connectivity test.
#[derive(Debug, Clone, PartialEq)]
pub struct EthernetStatus {
    pub label: Option<String>,
    pub connected: bool,
    pub test_date: Timestamp,
}

/// A smart plug or control plug entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plug {
    pub label: Option<String>,
    pub area: Option<String>,
    /// Raw state string, forwarded to the hub untouched.
    pub current_state: String,
}
