//! Trigger loops — decide *when* a synchronization pass runs.
//!
//! Only the single-run trigger surfaces a failed pass to its caller; the
//! long-lived loops log it and keep waiting for the next trigger.

use std::time::Duration;

use vsure_domain::error::VsureError;
use vsure_domain::outcome::PassReport;

use crate::ports::{AlarmProvider, HubGateway, MailboxNotifier};
use crate::services::sync_service::SyncService;

/// Run exactly one pass.
///
/// # Errors
///
/// Propagates any pass-aborting error so the caller can terminate.
pub async fn run_once<A, H>(service: &SyncService<A, H>) -> Result<PassReport, VsureError>
where
    A: AlarmProvider,
    H: HubGateway,
{
    service.run_pass().await
}

/// Run a pass every `period`, forever. The first pass starts immediately.
pub async fn run_interval<A, H>(service: &SyncService<A, H>, period: Duration)
where
    A: AlarmProvider,
    H: HubGateway,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(err) = service.run_pass().await {
            tracing::error!(error = ?err, "synchronization pass failed");
        }
    }
}

/// Run one pass per mailbox notification, forever.
///
/// Passes never overlap: the next wait only starts once the current pass
/// has finished.
///
/// # Errors
///
/// Returns when the notifier fails; pass failures are only logged.
pub async fn run_on_notifications<A, H, N>(
    service: &SyncService<A, H>,
    notifier: &mut N,
) -> Result<(), VsureError>
where
    A: AlarmProvider,
    H: HubGateway,
    N: MailboxNotifier,
{
    loop {
        tracing::debug!("waiting for mailbox notification");
        notifier.wait_for_change().await?;
        tracing::debug!("mailbox changed, triggering synchronization");
        if let Err(err) = service.run_pass().await {
            tracing::error!(error = ?err, "synchronization pass failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};
    use vsure_domain::command::HubCommand;
    use vsure_domain::error::ProviderOperation;
    use vsure_domain::overview::{ArmState, ArmStatus, EthernetStatus, Overview};
    use vsure_domain::sensor_index::{SensorIndex, SensorIndexMap};

    use super::*;
    use crate::ports::LastUpdate;

    /// Fails every other call, counting attempts.
    #[derive(Default)]
    struct FlakyProvider {
        calls: AtomicUsize,
    }

    impl AlarmProvider for FlakyProvider {
        fn fetch_overview(&self) -> impl Future<Output = Result<Overview, VsureError>> + Send {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let result = if call % 2 == 0 {
                Err(VsureError::Provider {
                    operation: ProviderOperation::Overview,
                    source: "service unavailable".into(),
                })
            } else {
                let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
                Ok(Overview {
                    climate: Vec::new(),
                    door_windows: Vec::new(),
                    sms_count: 0,
                    arm_state: ArmState {
                        status: ArmStatus::Disarmed,
                        date: at,
                    },
                    ethernet: EthernetStatus {
                        label: None,
                        connected: true,
                        test_date: at,
                    },
                    smart_plugs: Vec::new(),
                    control_plugs: Vec::new(),
                })
            };
            async { result }
        }
    }

    struct SilentHub;

    impl HubGateway for SilentHub {
        fn last_update(
            &self,
            _idx: &SensorIndex,
        ) -> impl Future<Output = Result<LastUpdate, VsureError>> + Send {
            async { Ok(LastUpdate::NotFound) }
        }

        fn send_command(
            &self,
            _command: &HubCommand,
        ) -> impl Future<Output = Result<(), VsureError>> + Send {
            async { Ok(()) }
        }
    }

    /// Delivers `remaining` notifications, then breaks the session.
    struct ScriptedNotifier {
        remaining: usize,
    }

    impl MailboxNotifier for ScriptedNotifier {
        fn wait_for_change(&mut self) -> impl Future<Output = Result<(), VsureError>> {
            let result = if self.remaining == 0 {
                Err(VsureError::Mailbox("connection reset".into()))
            } else {
                self.remaining -= 1;
                Ok(())
            };
            async { result }
        }
    }

    fn service() -> SyncService<FlakyProvider, SilentHub> {
        let entries: HashMap<String, SensorIndex> = [("sms count", "1"), ("arm state", "2")]
            .into_iter()
            .map(|(label, idx)| (label.to_string(), SensorIndex::new(idx)))
            .collect();
        SyncService::new(
            FlakyProvider::default(),
            SilentHub,
            SensorIndexMap::new(entries).unwrap(),
        )
    }

    impl SyncService<FlakyProvider, SilentHub> {
        fn provider_calls(&self) -> usize {
            self.provider().calls.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn should_surface_failed_pass_in_single_run() {
        let service = service();
        let result = run_once(&service).await;
        assert!(matches!(result, Err(VsureError::Provider { .. })));
    }

    #[tokio::test]
    async fn should_keep_listening_after_failed_pass() {
        let service = service();
        let mut notifier = ScriptedNotifier { remaining: 3 };

        let result = run_on_notifications(&service, &mut notifier).await;

        assert!(matches!(result, Err(VsureError::Mailbox(_))));
        assert_eq!(service.provider_calls(), 3);
    }

    #[tokio::test]
    async fn should_not_run_pass_before_first_notification() {
        let service = service();
        let mut notifier = ScriptedNotifier { remaining: 0 };

        let result = run_on_notifications(&service, &mut notifier).await;

        assert!(result.is_err());
        assert_eq!(service.provider_calls(), 0);
    }

    #[tokio::test]
    async fn should_keep_ticking_after_failed_pass() {
        let service = service();

        let elapsed = tokio::time::timeout(
            Duration::from_millis(100),
            run_interval(&service, Duration::from_millis(10)),
        )
        .await;

        assert!(elapsed.is_err());
        assert!(service.provider_calls() >= 2);
    }
}
