//! Database model types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a target participates in automatic probe cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Active,
    Paused,
}

impl TargetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetStatus::Active => "active",
            TargetStatus::Paused => "paused",
        }
    }

    /// Parse a stored status string; anything unrecognized counts as active.
    pub fn from_db(s: &str) -> Self {
        if s == "paused" {
            TargetStatus::Paused
        } else {
            TargetStatus::Active
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            TargetStatus::Active => TargetStatus::Paused,
            TargetStatus::Paused => TargetStatus::Active,
        }
    }
}

/// Classification of a probe attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Success,
    Failed,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::Failed => "failed",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "success" => Some(OutcomeKind::Success),
            "failed" => Some(OutcomeKind::Failed),
            _ => None,
        }
    }
}

/// The result of a single probe attempt. Never mutated once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    /// HTTP status code, or 0 when no response was obtained.
    pub status_code: u16,
    pub status_text: String,
    pub response_time_ms: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    /// Success iff the status code is in [200, 400). A code of 0
    /// (no response) is always a failure.
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status_code)
    }

    pub fn kind(&self) -> OutcomeKind {
        if self.is_success() {
            OutcomeKind::Success
        } else {
            OutcomeKind::Failed
        }
    }
}

/// A monitored URL with its probe state and bounded history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub interval_minutes: u32,
    pub status: TargetStatus,
    pub last_probe_at: Option<DateTime<Utc>>,
    pub last_outcome_kind: Option<OutcomeKind>,
    pub last_outcome: Option<Outcome>,
    /// Oldest to newest, at most `scheduler::history::HISTORY_LIMIT` entries.
    pub history: Vec<Outcome>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a target.
#[derive(Debug, Clone)]
pub struct NewTarget {
    pub name: String,
    pub url: String,
    pub interval_minutes: u32,
    pub status: TargetStatus,
}

/// Partial update for a target; only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct TargetPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub interval_minutes: Option<u32>,
    pub status: Option<TargetStatus>,
    pub last_probe_at: Option<DateTime<Utc>>,
    pub last_outcome_kind: Option<OutcomeKind>,
    pub last_outcome: Option<Outcome>,
    pub history: Option<Vec<Outcome>>,
}

impl TargetPatch {
    /// Patch carrying the probe-state fields of an already-updated target.
    pub fn from_probe_result(target: &Target) -> Self {
        Self {
            last_probe_at: target.last_probe_at,
            last_outcome_kind: target.last_outcome_kind,
            last_outcome: target.last_outcome.clone(),
            history: Some(target.history.clone()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status_code: u16) -> Outcome {
        Outcome {
            status_code,
            status_text: "x".to_string(),
            response_time_ms: 1,
            timestamp: Utc::now(),
            error: None,
        }
    }

    #[test]
    fn test_success_classification() {
        assert_eq!(outcome(200).kind(), OutcomeKind::Success);
        assert_eq!(outcome(204).kind(), OutcomeKind::Success);
        assert_eq!(outcome(301).kind(), OutcomeKind::Success);
        assert_eq!(outcome(399).kind(), OutcomeKind::Success);
        assert_eq!(outcome(400).kind(), OutcomeKind::Failed);
        assert_eq!(outcome(500).kind(), OutcomeKind::Failed);
        assert_eq!(outcome(199).kind(), OutcomeKind::Failed);
        assert_eq!(outcome(0).kind(), OutcomeKind::Failed);
    }

    #[test]
    fn test_status_from_db_defaults_to_active() {
        assert_eq!(TargetStatus::from_db("paused"), TargetStatus::Paused);
        assert_eq!(TargetStatus::from_db("active"), TargetStatus::Active);
        assert_eq!(TargetStatus::from_db("garbage"), TargetStatus::Active);
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(TargetStatus::Active.toggled(), TargetStatus::Paused);
        assert_eq!(TargetStatus::Paused.toggled(), TargetStatus::Active);
    }
}
