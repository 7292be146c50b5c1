// Deadline input parsing

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use eyre::{Result, eyre};

/// Wall-clock layouts interpreted in the local timezone
const LOCAL_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// UTC layouts RFC 3339 is too strict for (no seconds)
const UTC_FORMATS: [&str; 1] = ["%Y-%m-%dT%H:%MZ"];

/// Parse user-supplied deadline text into an absolute instant
///
/// Accepted forms:
/// - RFC 3339 instants (`2024-06-01T18:00:00Z`, `2024-06-01T18:00:00+02:00`)
/// - UTC minutes without seconds (`2024-06-01T18:00Z`)
/// - local wall-clock times (`2024-06-01T18:00`, `2024-06-01 18:00:30`);
///   a time skipped by a DST jump moves forward an hour
/// - bare dates (`2024-06-01`), taken as UTC midnight
///
/// Empty or whitespace-only input means "no deadline" and yields `Ok(None)`.
/// Anything else is an error.
pub fn parse_deadline(input: &str) -> Result<Option<DateTime<Utc>>> {
    parse_deadline_in(input, &Local)
}

/// Same as [`parse_deadline`], with wall-clock forms read in `tz`
pub fn parse_deadline_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<Option<DateTime<Utc>>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    for format in UTC_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(Some(Utc.from_utc_datetime(&naive)));
        }
    }

    for format in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return local_to_utc(tz, naive)
                .map(Some)
                .ok_or_else(|| eyre!("Deadline {} does not exist in the local timezone", input));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| eyre!("Invalid deadline date: {}", input))?;
        return Ok(Some(Utc.from_utc_datetime(&midnight)));
    }

    Err(eyre!("Unrecognized deadline: {}", input))
}

/// Resolve a wall-clock time, pushing times inside a DST gap past the jump
fn local_to_utc<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + TimeDelta::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}
