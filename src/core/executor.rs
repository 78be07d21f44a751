//! Bounded work executor: the reusable heart of every stage.
//!
//! Each stage enumerates candidates, skips the ones its completion oracle
//! already knows about, and runs a per-item action over the rest, either
//! strictly sequentially with a throttling delay or on a bounded worker
//! pool. One item's failure never aborts the batch; it is logged with the
//! item's label and counted. The executor owns the tallies itself (outcomes
//! flow back over the completion stream), so no counter is shared mutably
//! across workers.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::oracle::CompletionOracle;

/// Log a running tally after this many processed items.
const PROGRESS_INTERVAL: usize = 25;

/// A candidate the executor can process.
///
/// Items are cloned into the action on every attempt, so they should stay
/// cheap: metadata and paths, not payloads.
pub trait WorkItem: Clone {
    /// Deterministic artifact name, checked against the completion oracle.
    fn unit_name(&self) -> String;

    /// Human-readable label for log lines.
    fn label(&self) -> &str;
}

/// How the batch is driven.
#[derive(Debug, Clone, Copy)]
pub enum Concurrency {
    /// One item at a time, pausing between executed items to throttle a
    /// downstream service. Skipped items do not pause.
    Sequential { delay: Duration },

    /// Fixed-size worker pool; no delay, no completion-order guarantee.
    Pool { workers: usize },
}

/// Success/failure counters for one stage invocation. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub success: usize,
    pub failure: usize,
}

/// Aggregate result of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of candidates the batch was given.
    pub total: usize,

    /// Final tallies. Skipped items count as successes.
    pub stats: RunStats,

    /// Unit names whose action newly succeeded this run (skips excluded).
    /// The publish stage merges these into the ledger after the batch.
    pub completed: Vec<String>,
}

enum Outcome {
    Skipped,
    Completed,
    Failed,
}

/// Runs a per-item action over every candidate not yet complete.
pub struct WorkExecutor {
    stage: String,
    concurrency: Concurrency,
    attempts: u32,
}

impl WorkExecutor {
    /// Sequential executor with a fixed pause between executed items.
    pub fn sequential(stage: impl Into<String>, delay: Duration) -> Self {
        Self {
            stage: stage.into(),
            concurrency: Concurrency::Sequential { delay },
            attempts: 1,
        }
    }

    /// Worker-pool executor with bounded parallelism.
    pub fn pool(stage: impl Into<String>, workers: usize) -> Self {
        Self {
            stage: stage.into(),
            concurrency: Concurrency::Pool {
                workers: workers.max(1),
            },
            attempts: 1,
        }
    }

    /// Set the per-item attempt budget (1 = no retry).
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Execute `action` over every candidate the oracle does not already
    /// know as complete. Always runs to completion and reports aggregate
    /// counts, even if every item fails.
    pub async fn run<C, F, Fut>(
        &self,
        items: Vec<C>,
        oracle: &dyn CompletionOracle,
        action: F,
    ) -> BatchReport
    where
        C: WorkItem,
        F: Fn(C) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut report = BatchReport {
            total: items.len(),
            ..Default::default()
        };

        info!(
            stage = %self.stage,
            candidates = report.total,
            "starting batch"
        );

        match self.concurrency {
            Concurrency::Sequential { delay } => {
                for item in items {
                    let (unit, outcome) = self.run_one(item, oracle, &action).await;
                    let executed = !matches!(outcome, Outcome::Skipped);
                    self.record(&mut report, unit, outcome);
                    if executed && !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
            Concurrency::Pool { workers } => {
                let mut outcomes = stream::iter(items)
                    .map(|item| self.run_one(item, oracle, &action))
                    .buffer_unordered(workers);

                while let Some((unit, outcome)) = outcomes.next().await {
                    self.record(&mut report, unit, outcome);
                }
            }
        }

        info!(
            stage = %self.stage,
            total = report.total,
            success = report.stats.success,
            failure = report.stats.failure,
            "batch finished"
        );

        report
    }

    /// Skip check plus retry loop for a single item; shared by both modes.
    async fn run_one<C, F, Fut>(
        &self,
        item: C,
        oracle: &dyn CompletionOracle,
        action: &F,
    ) -> (String, Outcome)
    where
        C: WorkItem,
        F: Fn(C) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let unit = item.unit_name();

        if oracle.is_complete(&unit) {
            debug!(stage = %self.stage, unit = %unit, "already complete, skipping");
            return (unit, Outcome::Skipped);
        }

        let label = item.label().to_string();

        for attempt in 1..=self.attempts {
            match action(item.clone()).await {
                Ok(()) => {
                    debug!(stage = %self.stage, item = %label, "item completed");
                    return (unit, Outcome::Completed);
                }
                Err(e) if attempt < self.attempts => {
                    warn!(
                        stage = %self.stage,
                        item = %label,
                        attempt,
                        error = %e,
                        "attempt failed, retrying"
                    );
                }
                Err(e) => {
                    warn!(stage = %self.stage, item = %label, error = %e, "item failed");
                }
            }
        }

        (unit, Outcome::Failed)
    }

    fn record(&self, report: &mut BatchReport, unit: String, outcome: Outcome) {
        match outcome {
            Outcome::Skipped => report.stats.success += 1,
            Outcome::Completed => {
                report.stats.success += 1;
                report.completed.push(unit);
            }
            Outcome::Failed => report.stats.failure += 1,
        }

        let processed = report.stats.success + report.stats.failure;
        if processed % PROGRESS_INTERVAL == 0 && processed < report.total {
            info!(
                stage = %self.stage,
                processed,
                total = report.total,
                success = report.stats.success,
                failure = report.stats.failure,
                "progress"
            );
        }
    }
}
