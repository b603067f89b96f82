//! Scheduler module: the probe-and-record cycle.
//!
//! A fixed-cadence timer drives full-table cycles: every active target whose
//! interval has elapsed gets one HEAD probe, and the result is folded into
//! its bounded history. A manual trigger probes a single target immediately,
//! ignoring the due check and the paused state.

mod due;
mod history;

pub use due::*;
pub use history::*;

use crate::db::{DbError, OutcomeKind, Store, Target, TargetPatch};
use crate::probe::{build_client, head_probe};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Per-target result reported by cycle and manual triggers.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub status: OutcomeKind,
    pub response_time_ms: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of one full probe cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub processed: usize,
    pub results: Vec<ProbeReport>,
    pub timestamp: DateTime<Utc>,
}

/// Runs probe cycles against the injected store.
pub struct CycleRunner {
    store: Arc<Store>,
    client: reqwest::Client,
    probe_timeout: Duration,
}

impl CycleRunner {
    /// Create a runner with its own HTTP client.
    pub fn new(store: Arc<Store>, probe_timeout: Duration) -> Self {
        Self {
            store,
            client: build_client(),
            probe_timeout,
        }
    }

    /// Spawn the background timer loop with the given cycle period.
    pub fn start(self: &Arc<Self>, period: Duration) {
        let runner = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                match runner.run_cycle().await {
                    Ok(report) if report.processed > 0 => {
                        tracing::info!("Cycle processed {} targets", report.processed);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!("Probe cycle failed: {}", e);
                    }
                }
            }
        });
    }

    /// Run one cycle: scan all targets, probe the due ones, record results.
    ///
    /// A failed probe is recorded and does not stop the cycle; a store
    /// failure aborts the remaining work and escalates.
    pub async fn run_cycle(&self) -> Result<CycleReport, DbError> {
        let now = Utc::now();
        let targets = self.store.get_targets()?;

        let mut results = Vec::new();
        for target in targets {
            if !is_due(&target, now) {
                continue;
            }
            results.push(self.probe_and_record(target).await?);
        }

        Ok(CycleReport {
            processed: results.len(),
            results,
            timestamp: Utc::now(),
        })
    }

    /// Probe one target immediately, regardless of due state or pause.
    pub async fn probe_target(&self, id: i64) -> Result<ProbeReport, DbError> {
        let target = self.store.get_target(id)?;
        self.probe_and_record(target).await
    }

    async fn probe_and_record(&self, mut target: Target) -> Result<ProbeReport, DbError> {
        let outcome = head_probe(&self.client, &target.url, self.probe_timeout).await;

        append_outcome(&mut target, outcome.clone());
        self.store
            .update_target(target.id, &TargetPatch::from_probe_result(&target))?;

        if outcome.is_success() {
            tracing::debug!(
                "{} responded {} in {}ms",
                target.name,
                outcome.status_code,
                outcome.response_time_ms
            );
        } else {
            tracing::warn!(
                "Probe failed for {}: {}",
                target.name,
                outcome.error.as_deref().unwrap_or(&outcome.status_text)
            );
        }

        Ok(ProbeReport {
            id: target.id,
            name: target.name,
            url: target.url,
            status: outcome.kind(),
            response_time_ms: outcome.response_time_ms,
            timestamp: outcome.timestamp,
            error: outcome.error,
        })
    }
}
