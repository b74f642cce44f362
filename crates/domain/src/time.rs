//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// Absolute instant used for provider report times and hub last updates.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
///
/// Data points without an intrinsic timestamp (SMS count, plug states) are
/// stamped with this value when the overview is mapped.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Staleness gate: `observed` must be strictly after `known`.
///
/// Ties do not count as newer.
#[must_use]
pub fn is_newer(observed: Timestamp, known: Timestamp) -> bool {
    observed > known
}
