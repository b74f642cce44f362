//! Alarm provider port — one consolidated account snapshot per call.

use std::future::Future;

use vsure_domain::error::VsureError;
use vsure_domain::overview::Overview;

/// Source of alarm-provider overviews.
///
/// Every call is a complete session: authenticate, fetch, terminate. Any
/// failure, including a failed teardown after a successful fetch, is returned
/// as [`VsureError::Provider`].
pub trait AlarmProvider: Send + Sync {
    fn fetch_overview(&self) -> impl Future<Output = Result<Overview, VsureError>> + Send;
}
