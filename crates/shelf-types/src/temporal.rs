use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Default offset, in hours east of UTC, used when rendering timestamps.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -3;

/// A wall-clock instant pinned to a fixed UTC offset.
///
/// The offset is configuration, passed in by the caller, so nothing in the
/// stores depends on the host's local time zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    instant: DateTime<FixedOffset>,
}

impl Timestamp {
    /// The current time in the given offset.
    pub fn now(offset: FixedOffset) -> Self {
        Self {
            instant: Utc::now().with_timezone(&offset),
        }
    }

    /// Wrap an explicit instant.
    pub fn from_datetime(instant: DateTime<FixedOffset>) -> Self {
        Self { instant }
    }

    /// Build a fixed offset from whole hours east of UTC.
    pub fn offset_from_hours(hours: i32) -> Result<FixedOffset, TypeError> {
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or(TypeError::InvalidOffset { hours })
    }

    /// The default rendering offset (`-03:00`).
    pub fn default_offset() -> FixedOffset {
        FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix())
    }

    /// The underlying instant.
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// Render as `YYYYMM`, `DDHH`, `MM`, `SS` joined by `separator`.
    ///
    /// With an empty separator this is the compact `YYYYMMDDHHMMSS` form used
    /// in resource names and metadata records.
    pub fn render(&self, separator: &str) -> String {
        let t = &self.instant;
        [
            format!("{:4}{:02}", t.year(), t.month()),
            format!("{:02}{:02}", t.day(), t.hour()),
            format!("{:02}", t.minute()),
            format!("{:02}", t.second()),
        ]
        .join(separator)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}
