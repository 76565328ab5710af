//! Human-readable "last active" descriptions.

use chrono::{DateTime, Utc};

/// Describes how long ago `last_activity` happened relative to `now`.
///
/// Produces `"<N> days ago"` once at least a day has passed, otherwise
/// `"<N> hours ago"` once at least an hour has passed, otherwise
/// `"<N> minutes ago"`. Values are floor-truncated; timestamps in the future
/// read as `"0 minutes ago"`.
#[must_use]
pub fn describe_elapsed(last_activity: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - last_activity).max(chrono::Duration::zero());

    let days = elapsed.num_days();
    if days > 0 {
        return format!("{days} days ago");
    }
    let hours = elapsed.num_hours();
    if hours > 0 {
        return format!("{hours} hours ago");
    }
    format!("{} minutes ago", elapsed.num_minutes())
}
