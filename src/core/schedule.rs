//! Recurring trigger for the publish stage.
//!
//! Either runs the job once immediately (debug/manual) or fires it once per
//! day at a fixed local time. The scheduled mode blocks until Ctrl-C, which
//! stops scheduling further runs; a run already in flight completes.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Days, Local};
use tracing::{error, info};

/// How the publish unit of work is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Single immediate execution.
    Once,

    /// Fire once per day at the given local hour and minute.
    Daily { hour: u32, minute: u32 },
}

/// Next occurrence of `hour:minute` strictly after `now`.
///
/// Returns `None` for out-of-range times or local times skipped by a DST
/// transition.
pub fn next_fire(now: DateTime<Local>, hour: u32, minute: u32) -> Option<DateTime<Local>> {
    let today = now
        .date_naive()
        .and_hms_opt(hour, minute, 0)?
        .and_local_timezone(Local)
        .earliest();

    match today {
        Some(at) if at > now => Some(at),
        _ => now
            .date_naive()
            .checked_add_days(Days::new(1))?
            .and_hms_opt(hour, minute, 0)?
            .and_local_timezone(Local)
            .earliest(),
    }
}

/// Drive `job` according to `mode`.
///
/// In daily mode a failed run is logged and the schedule continues; only an
/// interrupt signal (or an invalid schedule time) ends the loop.
pub async fn run_scheduled<F, Fut>(mode: RunMode, job: F) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    match mode {
        RunMode::Once => {
            info!("running once");
            job().await
        }
        RunMode::Daily { hour, minute } => loop {
            let now = Local::now();
            let next = next_fire(now, hour, minute)
                .with_context(|| format!("invalid schedule time {:02}:{:02}", hour, minute))?;
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);

            info!(next = %next.format("%Y-%m-%d %H:%M:%S"), "next scheduled run");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    if let Err(e) = job().await {
                        error!(error = %e, "scheduled run failed");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown requested, stopping scheduler");
                    return Ok(());
                }
            }
        },
    }
}
