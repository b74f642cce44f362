//! Hub commands — the update requests the automation hub understands.

use std::fmt;

use crate::sensor_index::SensorIndex;

/// Selector level the hub uses for "disarmed".
pub const LEVEL_DISARMED: u8 = 0;
/// Selector level the hub uses for "armed home".
pub const LEVEL_ARMED_HOME: u8 = 10;
/// Selector level the hub uses for "armed away".
pub const LEVEL_ARMED_AWAY: u8 = 20;

/// A write request for one hub virtual device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubCommand {
    /// Numeric/text sensor update (`udevice`).
    UpdateValue { idx: SensorIndex, svalue: String },
    /// Binary switch update (`switchlight`).
    Switch {
        idx: SensorIndex,
        command: SwitchCommand,
    },
    /// Selector switch level (`switchlight` + `Set Level`).
    SetLevel { idx: SensorIndex, level: u8 },
}

impl fmt::Display for HubCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateValue { idx, svalue } => write!(f, "set idx {idx} to {svalue:?}"),
            Self::Switch { idx, command } => write!(f, "switch idx {idx} {command}"),
            Self::SetLevel { idx, level } => write!(f, "set idx {idx} to level {level}"),
        }
    }
}

/// Target state of a binary switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchCommand {
    On,
    Off,
    /// State forwarded exactly as the alarm provider reported it.
    Verbatim(String),
}

impl From<bool> for SwitchCommand {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl fmt::Display for SwitchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("On"),
            Self::Off => f.write_str("Off"),
            Self::Verbatim(raw) => f.write_str(raw),
        }
    }
}

/// Hub `svalue` for a climate reading: `temp` or `temp;humidity;0`.
#[must_use]
pub fn climate_svalue(temperature: f64, humidity: Option<f64>) -> String {
    match humidity {
        Some(humidity) => format!("{temperature};{humidity};0"),
        None => temperature.to_string(),
    }
}
