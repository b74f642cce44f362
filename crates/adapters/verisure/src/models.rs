//! Wire types of the provider API and their conversion into the domain
//! [`Overview`].

use serde::Deserialize;
use vsure_domain::overview::{
    ArmState, ArmStatus, ClimateReading, DoorWindow, DoorWindowState, EthernetStatus, Overview,
    Plug,
};
use vsure_domain::time::Timestamp;

/// Answer of `POST /cookie`.
#[derive(Debug, Deserialize)]
pub struct CookieResponse {
    pub cookie: String,
}

/// One entry of `GET /installation/search`.
#[derive(Debug, Deserialize)]
pub struct Installation {
    pub giid: String,
}

/// Answer of `GET /installation/{giid}/overview`, restricted to the fields
/// the bridge uses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    #[serde(default)]
    pub climate_values: Vec<ClimateValue>,
    #[serde(default)]
    pub door_window: DoorWindowGroup,
    pub total_sms_count: u32,
    pub arm_state: ArmStateValue,
    pub latest_ethernet_status: EthernetValue,
    #[serde(default, alias = "smartplugs")]
    pub smart_plugs: Vec<PlugValue>,
    #[serde(default, alias = "controlplugs")]
    pub control_plugs: Vec<PlugValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateValue {
    pub device_label: Option<String>,
    pub temperature: f64,
    pub humidity: Option<f64>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub time: Timestamp,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorWindowGroup {
    #[serde(default)]
    pub door_window_device: Vec<DoorWindowValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorWindowValue {
    pub device_label: Option<String>,
    pub state: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub report_time: Timestamp,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmStateValue {
    pub status_type: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub date: Timestamp,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthernetValue {
    pub device_label: Option<String>,
    pub latest_ethernet_test_result: bool,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub test_date: Timestamp,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlugValue {
    pub device_label: Option<String>,
    pub area: Option<String>,
    pub current_state: String,
}

impl From<PlugValue> for Plug {
    fn from(value: PlugValue) -> Self {
        Self {
            label: value.device_label,
            area: value.area,
            current_state: value.current_state,
        }
    }
}

impl From<OverviewResponse> for Overview {
    fn from(value: OverviewResponse) -> Self {
        Self {
            climate: value
                .climate_values
                .into_iter()
                .map(|item| ClimateReading {
                    label: item.device_label,
                    temperature: item.temperature,
                    humidity: item.humidity,
                    time: item.time,
                })
                .collect(),
            door_windows: value
                .door_window
                .door_window_device
                .into_iter()
                .map(|item| DoorWindow {
                    label: item.device_label,
                    state: DoorWindowState::parse(&item.state),
                    report_time: item.report_time,
                })
                .collect(),
            sms_count: value.total_sms_count,
            arm_state: ArmState {
                status: ArmStatus::parse(&value.arm_state.status_type),
                date: value.arm_state.date,
            },
            ethernet: EthernetStatus {
                label: value.latest_ethernet_status.device_label,
                connected: value.latest_ethernet_status.latest_ethernet_test_result,
                test_date: value.latest_ethernet_status.test_date,
            },
            smart_plugs: value.smart_plugs.into_iter().map(Plug::from).collect(),
            control_plugs: value.control_plugs.into_iter().map(Plug::from).collect(),
        }
    }
}

/// Provider timestamps: RFC 3339, or a naive ISO date-time taken as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {raw:?}")))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
