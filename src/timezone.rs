//! Vendor timestamp normalization
//!
//! The vendor reports timestamps in US Eastern time as
//! `YYYY-MM-DD HH:MM:SS` with an optional `EST`/`EDT` suffix. Records are
//! emitted with zone-less UTC timestamps in the same layout, which keeps
//! them fixed-width and lexicographically ordered.
//!
//! An `EST` suffix (or none at all) means fixed UTC-5. `EDT` is resolved
//! through the `EST5EDT` zone, whose offset follows the US daylight-saving
//! rules for the given date.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Layout of the date-time part, input and output alike
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert a vendor timestamp to a zone-less UTC timestamp
///
/// ```
/// use alchemer_tap::timezone::to_utc;
///
/// assert_eq!(to_utc("2023-03-10 14:00:00").unwrap(), "2023-03-10 19:00:00");
/// assert_eq!(to_utc("2023-07-10 14:00:00 EDT").unwrap(), "2023-07-10 18:00:00");
/// ```
pub fn to_utc(raw: &str) -> Result<String> {
    let trimmed = raw.trim();

    let (local, zone) = match trimmed.rsplit_once(' ') {
        Some((head, "EST")) => (head, Tz::EST),
        Some((head, "EDT")) => (head, Tz::EST5EDT),
        _ => (trimmed, Tz::EST),
    };

    let naive = NaiveDateTime::parse_from_str(local.trim_end(), TIMESTAMP_FORMAT)
        .map_err(|e| Error::timestamp(raw, format!("expected 'YYYY-MM-DD HH:MM:SS [EST|EDT]': {e}")))?;

    let utc = resolve_local(zone, naive)
        .ok_or_else(|| Error::timestamp(raw, format!("not representable in {zone}")))?;

    Ok(utc.format(TIMESTAMP_FORMAT).to_string())
}

/// Resolve a wall-clock time in `zone`
///
/// Ambiguous times (the repeated hour when clocks fall back) take the
/// later, post-transition reading. Times inside the spring-forward gap are
/// moved forward by the one-hour jump, so 02:30 on the transition day
/// reads as 03:30 daylight time.
fn resolve_local(zone: Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(_, later) => Some(later.with_timezone(&Utc)),
        LocalResult::None => {
            let shifted = naive.checked_add_signed(Duration::hours(1))?;
            let after_gap = zone.from_local_datetime(&shifted).earliest()?;
            Some(after_gap.with_timezone(&Utc))
        }
    }
}
