//! Hub port — reads and writes against the automation hub.

use std::future::Future;

use vsure_domain::command::HubCommand;
use vsure_domain::error::VsureError;
use vsure_domain::sensor_index::SensorIndex;
use vsure_domain::time::Timestamp;

/// What the hub knows about a sensor's freshness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastUpdate {
    /// The sensor was last updated at this instant.
    At(Timestamp),
    /// The hub answered but has no update time for this index.
    NotFound,
}

/// Access to the automation hub's virtual devices.
///
/// Implementations report transport failures as
/// [`VsureError::HubUnreachable`] and any other unsuccessful query as
/// [`VsureError::HubQuery`]; the update engine relies on that split to decide
/// whether the whole pass must stop.
pub trait HubGateway: Send + Sync {
    /// Fetch the last-update instant of the sensor at `idx`.
    fn last_update(
        &self,
        idx: &SensorIndex,
    ) -> impl Future<Output = Result<LastUpdate, VsureError>> + Send;

    /// Send one update command; `Ok` means the hub acknowledged it.
    fn send_command(
        &self,
        command: &HubCommand,
    ) -> impl Future<Output = Result<(), VsureError>> + Send;
}

impl<T: HubGateway> HubGateway for std::sync::Arc<T> {
    fn last_update(
        &self,
        idx: &SensorIndex,
    ) -> impl Future<Output = Result<LastUpdate, VsureError>> + Send {
        (**self).last_update(idx)
    }

    fn send_command(
        &self,
        command: &HubCommand,
    ) -> impl Future<Output = Result<(), VsureError>> + Send {
        (**self).send_command(command)
    }
}
