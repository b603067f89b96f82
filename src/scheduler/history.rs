//! History ledger: folds a probe outcome into a target's bounded history.

use crate::db::{Outcome, Target};

/// Maximum retained outcomes per target.
pub const HISTORY_LIMIT: usize = 10;

/// Append `outcome` to the target's history, keeping only the last
/// `HISTORY_LIMIT` entries, and refresh the quick-access fields
/// (`last_outcome`, `last_probe_at`, `last_outcome_kind`).
///
/// In-memory transform only; persisting the updated target is the
/// caller's job.
pub fn append_outcome(target: &mut Target, outcome: Outcome) {
    target.last_probe_at = Some(outcome.timestamp);
    target.last_outcome_kind = Some(outcome.kind());
    target.last_outcome = Some(outcome.clone());

    target.history.push(outcome);
    if target.history.len() > HISTORY_LIMIT {
        let overflow = target.history.len() - HISTORY_LIMIT;
        target.history.drain(..overflow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{OutcomeKind, TargetStatus};
    use chrono::Utc;

    fn target() -> Target {
        Target {
            id: 1,
            name: "t".to_string(),
            url: "https://example.com".to_string(),
            interval_minutes: 1,
            status: TargetStatus::Active,
            last_probe_at: None,
            last_outcome_kind: None,
            last_outcome: None,
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn outcome(status_code: u16, response_time_ms: u64) -> Outcome {
        Outcome {
            status_code,
            status_text: "x".to_string(),
            response_time_ms,
            timestamp: Utc::now(),
            error: None,
        }
    }

    #[test]
    fn test_append_sets_quick_access_fields() {
        let mut t = target();
        let o = outcome(200, 12);
        let ts = o.timestamp;

        append_outcome(&mut t, o);

        assert_eq!(t.history.len(), 1);
        assert_eq!(t.last_probe_at, Some(ts));
        assert_eq!(t.last_outcome_kind, Some(OutcomeKind::Success));
        assert_eq!(t.last_outcome.as_ref().unwrap().response_time_ms, 12);
    }

    #[test]
    fn test_failed_outcome_sets_failed_kind() {
        let mut t = target();
        append_outcome(&mut t, outcome(0, 10_000));
        assert_eq!(t.last_outcome_kind, Some(OutcomeKind::Failed));
    }

    #[test]
    fn test_history_capped_at_limit_dropping_oldest() {
        let mut t = target();
        for i in 0..HISTORY_LIMIT {
            append_outcome(&mut t, outcome(200, i as u64));
        }
        assert_eq!(t.history.len(), HISTORY_LIMIT);
        assert_eq!(t.history[0].response_time_ms, 0);

        append_outcome(&mut t, outcome(200, 99));

        assert_eq!(t.history.len(), HISTORY_LIMIT);
        // The oldest entry (response_time_ms == 0) fell off the front.
        assert_eq!(t.history[0].response_time_ms, 1);
        assert_eq!(t.history.last().unwrap().response_time_ms, 99);
    }

    #[test]
    fn test_last_outcome_matches_final_history_element() {
        let mut t = target();
        for i in 0..15u64 {
            append_outcome(&mut t, outcome(200, i));
            let last = t.last_outcome.as_ref().unwrap();
            assert_eq!(
                last.response_time_ms,
                t.history.last().unwrap().response_time_ms
            );
        }
    }

    #[test]
    fn test_oversized_persisted_history_is_trimmed_on_append() {
        // A stored history longer than the cap still ends up capped.
        let mut t = target();
        t.history = (0..14u64).map(|i| outcome(200, i)).collect();

        append_outcome(&mut t, outcome(200, 100));

        assert_eq!(t.history.len(), HISTORY_LIMIT);
        assert_eq!(t.history.last().unwrap().response_time_ms, 100);
        assert_eq!(t.history[0].response_time_ms, 5);
    }
}
