// Deadline helpers for rendering

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use std::fmt::Display;

pub const OVERDUE_LABEL: &str = "Overdue";

/// True iff `deadline` is present and strictly earlier than `now`
pub fn is_overdue(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    deadline.is_some_and(|deadline| deadline < now)
}

/// Remaining time until `deadline` as `2d 3h 5m`
///
/// Days and hours are left out when zero; minutes are always shown. A
/// deadline already behind `now` gives [`OVERDUE_LABEL`].
pub fn countdown(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = deadline - now;
    if remaining < TimeDelta::zero() {
        return OVERDUE_LABEL.to_string();
    }

    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let minutes = remaining.num_minutes() % 60;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{}d ", days));
    }
    if hours > 0 {
        out.push_str(&format!("{}h ", hours));
    }
    out.push_str(&format!("{}m", minutes));
    out
}

/// Short `DD/MM HH:MM` label in local time
pub fn format_deadline(deadline: DateTime<Utc>) -> String {
    format_deadline_in(deadline, &Local)
}

pub fn format_deadline_in<Tz: TimeZone>(deadline: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    deadline.with_timezone(tz).format("%d/%m %H:%M").to_string()
}
