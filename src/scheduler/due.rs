//! Due-check policy: decides whether a target should be probed this tick.

use chrono::{DateTime, Utc};

use crate::db::{Target, TargetStatus};

/// True when `target` is due for an automatic probe at `now`.
///
/// Paused targets are never due; they can only be probed through the manual
/// trigger. A target that has never been probed counts from the epoch and is
/// therefore always due. Pure threshold comparison: no jitter, no catch-up
/// for missed cycles.
pub fn is_due(target: &Target, now: DateTime<Utc>) -> bool {
    if target.status != TargetStatus::Active {
        return false;
    }

    let last = target.last_probe_at.unwrap_or(DateTime::UNIX_EPOCH);
    let elapsed_minutes = (now - last).num_milliseconds() as f64 / 60_000.0;
    elapsed_minutes >= target.interval_minutes as f64
}
