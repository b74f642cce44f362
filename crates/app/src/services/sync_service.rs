//! Sync service — one full synchronization pass.

use vsure_domain::error::VsureError;
use vsure_domain::outcome::{DeviceReport, PassReport};
use vsure_domain::sensor_index::SensorIndexMap;
use vsure_domain::time;

use crate::engine::UpdateEngine;
use crate::mapper;
use crate::ports::{AlarmProvider, HubGateway};

/// Fetches an overview and pushes whatever is newer into the hub.
pub struct SyncService<A, H> {
    provider: A,
    engine: UpdateEngine<H>,
    sensors: SensorIndexMap,
}

impl<A, H> SyncService<A, H>
where
    A: AlarmProvider,
    H: HubGateway,
{
    /// Create a new service from its ports and the sensor index map.
    pub fn new(provider: A, hub: H, sensors: SensorIndexMap) -> Self {
        Self {
            provider,
            engine: UpdateEngine::new(hub),
            sensors,
        }
    }

    pub fn provider(&self) -> &A {
        &self.provider
    }

    /// Run one pass: fetch, map, then process every actionable device in order.
    ///
    /// # Errors
    ///
    /// Returns the first pass-aborting error: a failed alarm-provider session
    /// or an unreachable hub. Per-device failures are part of the report.
    #[tracing::instrument(skip(self))]
    pub async fn run_pass(&self) -> Result<PassReport, VsureError> {
        let overview = self.provider.fetch_overview().await?;
        let plan = mapper::enumerate_actionable(&overview, &self.sensors, time::now());

        let mut report = PassReport {
            devices: Vec::with_capacity(plan.devices.len()),
            issues: plan.issues,
        };

        for action in &plan.devices {
            let outcome = self.engine.maybe_update(action).await?;
            report.devices.push(DeviceReport {
                kind: action.kind(),
                label: action.device.label().into_owned(),
                sensor_index: action.sensor_index.clone(),
                outcome,
            });
        }

        tracing::info!(
            updated = report.updated(),
            skipped = report.skipped(),
            failed = report.failed(),
            issues = report.issues.len(),
            "synchronization pass complete"
        );
        Ok(report)
    }
}
