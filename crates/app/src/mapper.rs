//! Device mapper — turns an overview into the ordered list of devices to sync.
//!
//! Order is fixed: climate sensors, door/window contacts, SMS count, arm
//! state, ethernet status, switch plugs. Devices whose label has no sensor
//! index are dropped without error.

use vsure_domain::device::{ActionableDevice, Device};
use vsure_domain::error::MappingError;
use vsure_domain::overview::{Overview, Plug};
use vsure_domain::sensor_index::SensorIndexMap;
use vsure_domain::time::Timestamp;

/// Devices to process in order, plus anything worth reporting about the
/// overview that did not prevent mapping the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionablePlan {
    pub devices: Vec<ActionableDevice>,
    pub issues: Vec<MappingError>,
}

/// Enumerate the actionable devices of `overview`.
///
/// `now` stamps the data points that carry no time of their own (SMS count
/// and plug states).
#[must_use]
pub fn enumerate_actionable(
    overview: &Overview,
    sensors: &SensorIndexMap,
    now: Timestamp,
) -> ActionablePlan {
    let mut plan = ActionablePlan::default();

    for reading in &overview.climate {
        let device = Device::Climate {
            label: reading.label.clone(),
            temperature: reading.temperature,
            humidity: reading.humidity,
        };
        push_if_mapped(&mut plan.devices, sensors, device, reading.time);
    }

    for contact in &overview.door_windows {
        let device = Device::DoorWindow {
            label: contact.label.clone(),
            state: contact.state.clone(),
        };
        push_if_mapped(&mut plan.devices, sensors, device, contact.report_time);
    }

    plan.devices.push(ActionableDevice {
        sensor_index: sensors.sms_count().clone(),
        observed_at: now,
        device: Device::SmsCount {
            total: overview.sms_count,
        },
    });

    plan.devices.push(ActionableDevice {
        sensor_index: sensors.arm_state().clone(),
        observed_at: overview.arm_state.date,
        device: Device::ArmState {
            status: overview.arm_state.status.clone(),
        },
    });

    let ethernet = Device::Ethernet {
        label: overview.ethernet.label.clone(),
        connected: overview.ethernet.connected,
    };
    push_if_mapped(
        &mut plan.devices,
        sensors,
        ethernet,
        overview.ethernet.test_date,
    );

    match pair_plugs(&overview.smart_plugs, &overview.control_plugs) {
        Ok(pairs) => {
            for (smart, control) in pairs {
                let device = Device::SwitchPlug {
                    label: smart.label.clone().or_else(|| control.label.clone()),
                    current_state: smart.current_state.clone(),
                };
                push_if_mapped(&mut plan.devices, sensors, device, now);
            }
        }
        Err(issue) => {
            tracing::error!(error = %issue, "switch plugs not synchronized");
            plan.issues.push(issue);
        }
    }

    plan
}

/// Pair smart plug *i* with control plug *i*.
///
/// # Errors
///
/// Returns [`MappingError::PlugCountMismatch`] when the lists differ in
/// length, since positional pairing would then be meaningless.
pub fn pair_plugs<'a>(
    smart: &'a [Plug],
    control: &'a [Plug],
) -> Result<Vec<(&'a Plug, &'a Plug)>, MappingError> {
    if smart.len() != control.len() {
        return Err(MappingError::PlugCountMismatch {
            smart: smart.len(),
            control: control.len(),
        });
    }
    Ok(smart.iter().zip(control).collect())
}

fn push_if_mapped(
    devices: &mut Vec<ActionableDevice>,
    sensors: &SensorIndexMap,
    device: Device,
    observed_at: Timestamp,
) {
    let Some(sensor_index) = sensors.get(&device.label()).cloned() else {
        tracing::debug!(
            kind = %device.kind(),
            label = %device.label(),
            "no sensor index configured, skipping"
        );
        return;
    };
    devices.push(ActionableDevice {
        sensor_index,
        observed_at,
        device,
    });
}
