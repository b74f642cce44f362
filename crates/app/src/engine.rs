//! Staleness-gated update engine.
//!
//! For each actionable device the engine asks the hub when the matching
//! sensor was last updated, and only when the alarm provider's data is
//! strictly newer does it translate the device into a hub command and send
//! it. Failures stay local to the device, except a hub that cannot be reached
//! at all, which aborts the pass.

use vsure_domain::command::{
    HubCommand, LEVEL_ARMED_AWAY, LEVEL_ARMED_HOME, LEVEL_DISARMED, SwitchCommand, climate_svalue,
};
use vsure_domain::device::{ActionableDevice, Device, DeviceKind};
use vsure_domain::error::VsureError;
use vsure_domain::outcome::{DeviceOutcome, FailureReason, SkipReason};
use vsure_domain::overview::{ArmStatus, DoorWindowState};
use vsure_domain::sensor_index::SensorIndex;
use vsure_domain::time;

use crate::ports::{HubGateway, LastUpdate};

/// A provider state value the hub has no representation for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no hub mapping for {kind} state {raw:?}")]
pub struct UnmappedState {
    pub kind: DeviceKind,
    pub raw: String,
}

/// Applies the staleness gate and sends updates through a [`HubGateway`].
pub struct UpdateEngine<H> {
    hub: H,
}

impl<H: HubGateway> UpdateEngine<H> {
    /// Create a new engine writing to the given hub.
    pub fn new(hub: H) -> Self {
        Self { hub }
    }

    /// The hub this engine writes to.
    pub fn hub(&self) -> &H {
        &self.hub
    }

    /// Process one device: `PENDING` → skipped, updated or failed.
    ///
    /// # Errors
    ///
    /// Only errors that must stop the whole pass are returned, i.e. a hub
    /// that could not be reached while reading the last update. Everything
    /// else is logged and folded into the returned [`DeviceOutcome`].
    #[tracing::instrument(
        skip(self, action),
        fields(
            kind = %action.kind(),
            label = %action.device.label(),
            sensor_index = %action.sensor_index,
        )
    )]
    pub async fn maybe_update(
        &self,
        action: &ActionableDevice,
    ) -> Result<DeviceOutcome, VsureError> {
        tracing::info!("processing device");

        let hub_time = match self.hub.last_update(&action.sensor_index).await {
            Ok(LastUpdate::At(ts)) => ts,
            Ok(LastUpdate::NotFound) => {
                tracing::warn!("device does not exist in the hub, check the sensor index configuration");
                return Ok(DeviceOutcome::Skipped(SkipReason::UnknownToHub));
            }
            Err(err) if err.is_fatal_for_pass() => return Err(err),
            Err(err) => {
                tracing::error!(error = ?err, "no valid response from the hub");
                return Ok(DeviceOutcome::Failed(FailureReason::HubQuery));
            }
        };

        tracing::info!(
            hub_last_update = %hub_time,
            provider_last_update = %action.observed_at,
            "comparing update times"
        );

        if !time::is_newer(action.observed_at, hub_time) {
            tracing::info!("hub is up to date, not updating");
            return Ok(DeviceOutcome::Skipped(SkipReason::NotNewer));
        }

        let command = match build_command(&action.sensor_index, &action.device) {
            Ok(command) => command,
            Err(err) => {
                tracing::error!(error = %err, "update not sent");
                return Ok(DeviceOutcome::Failed(FailureReason::UnrecognizedState(
                    err.raw,
                )));
            }
        };

        tracing::info!(%command, "updating hub");
        match self.hub.send_command(&command).await {
            Ok(()) => {
                tracing::info!("update sent successfully");
                Ok(DeviceOutcome::Updated)
            }
            Err(err) => {
                tracing::error!(error = ?err, "update not sent to the hub");
                Ok(DeviceOutcome::Failed(FailureReason::HubWrite))
            }
        }
    }
}

/// Translate a device into the hub command for sensor `idx`.
///
/// # Errors
///
/// Returns [`UnmappedState`] when the device carries a state value with no
/// hub equivalent; no default is guessed.
pub fn build_command(idx: &SensorIndex, device: &Device) -> Result<HubCommand, UnmappedState> {
    let idx = idx.clone();
    let command = match device {
        Device::Climate {
            temperature,
            humidity,
            ..
        } => HubCommand::UpdateValue {
            idx,
            svalue: climate_svalue(*temperature, *humidity),
        },
        Device::DoorWindow { state, .. } => {
            let command = match state {
                DoorWindowState::Close => SwitchCommand::Off,
                DoorWindowState::Open => SwitchCommand::On,
                DoorWindowState::Unrecognized(raw) => {
                    return Err(UnmappedState {
                        kind: DeviceKind::DoorWindow,
                        raw: raw.clone(),
                    });
                }
            };
            HubCommand::Switch { idx, command }
        }
        Device::SmsCount { total } => HubCommand::UpdateValue {
            idx,
            svalue: total.to_string(),
        },
        Device::ArmState { status } => {
            let level = match status {
                ArmStatus::Disarmed => LEVEL_DISARMED,
                ArmStatus::ArmedHome => LEVEL_ARMED_HOME,
                ArmStatus::ArmedAway => LEVEL_ARMED_AWAY,
                ArmStatus::Unrecognized(raw) => {
                    return Err(UnmappedState {
                        kind: DeviceKind::ArmState,
                        raw: raw.clone(),
                    });
                }
            };
            HubCommand::SetLevel { idx, level }
        }
        Device::Ethernet { connected, .. } => HubCommand::Switch {
            idx,
            command: SwitchCommand::from(*connected),
        },
        Device::SwitchPlug { current_state, .. } => HubCommand::Switch {
            idx,
            command: SwitchCommand::Verbatim(current_state.clone()),
        },
    };
    Ok(command)
}
