//! The hub reports `LastUpdate` as a naive wall-clock time in its own zone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::DomoticzError;

/// Format of the hub's `LastUpdate` field.
pub const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Zone the hub's wall-clock times are expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HubTimezone {
    /// The zone of the machine running the bridge.
    #[default]
    Local,
    /// An IANA zone such as `Europe/Brussels`.
    Named(Tz),
}

impl HubTimezone {
    /// Resolve a naive hub time to UTC.
    ///
    /// When the wall-clock time occurs twice (DST fall-back) the earliest
    /// instant wins. Times skipped by a DST jump resolve to `None`.
    #[must_use]
    pub fn to_utc(self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Self::Named(tz) => tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Parse a `LastUpdate` value into a UTC instant.
    ///
    /// # Errors
    ///
    /// Fails when the value does not follow [`LAST_UPDATE_FORMAT`] or names a
    /// wall-clock time that does not exist in this zone.
    pub fn parse_last_update(self, raw: &str) -> Result<DateTime<Utc>, DomoticzError> {
        let naive = NaiveDateTime::parse_from_str(raw, LAST_UPDATE_FORMAT).map_err(|source| {
            DomoticzError::TimestampFormat {
                raw: raw.to_string(),
                source,
            }
        })?;
        self.to_utc(naive)
            .ok_or_else(|| DomoticzError::NonexistentLocalTime {
                raw: raw.to_string(),
                timezone: self.to_string(),
            })
    }
}

impl fmt::Display for HubTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl FromStr for HubTimezone {
    type Err = DomoticzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        value
            .parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| DomoticzError::UnknownTimezone(value.to_string()))
    }
}
