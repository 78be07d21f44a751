//! Republish stage: summaries to the bookmarking service.
//!
//! The one stage whose completion is a remote side effect, so it is the one
//! stage backed by the persisted ledger. Each run loads the ledger, narrows
//! the unprocessed summaries to the top-N keyword matches, pushes them one
//! at a time, then merges the acknowledged names into the ledger and
//! rewrites it once.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::BookmarkClient;
use crate::config::ResolvedConfig;
use crate::core::schedule::{self, RunMode};
use crate::core::{
    KeywordSelector, Ledger, LedgerSnapshotOracle, RunStats, WorkExecutor, WorkItem,
};
use crate::domain::filename::markdown_name;
use crate::stages::files_with_extension;

/// An unprocessed summary with its content already read for scoring.
#[derive(Debug, Clone)]
struct PublishItem {
    /// Summary filename; the ledger key.
    name: String,
    /// Filename stem; doubles as the memo title.
    stem: String,
    content: String,
}

impl WorkItem for PublishItem {
    fn unit_name(&self) -> String {
        self.name.clone()
    }

    fn label(&self) -> &str {
        &self.stem
    }
}

/// Run the publish unit of work once: select, push, persist the ledger.
pub async fn run_once(config: &ResolvedConfig) -> Result<RunStats> {
    let api_url = config
        .publish
        .api_url
        .as_deref()
        .context("bookmark API URL not configured (set PAPERFLOW_BOOKMARK_URL)")?;

    let ledger = Ledger::new(config.ledger_path());
    let mut processed = ledger.load().await;
    info!(processed = processed.len(), "loaded publish ledger");

    let sum_dir = config.sum_dir();
    if !sum_dir.exists() {
        info!(dir = %sum_dir.display(), "no summaries directory yet");
        return Ok(RunStats::default());
    }

    let mut candidates = Vec::new();
    for file in files_with_extension(&sum_dir, "md")? {
        let name = markdown_name(&file.stem);
        if processed.contains(&name) {
            continue;
        }
        let content = tokio::fs::read_to_string(&file.path)
            .await
            .with_context(|| format!("failed to read {}", file.path.display()))?;
        candidates.push(PublishItem {
            name,
            stem: file.stem,
            content,
        });
    }

    if candidates.is_empty() {
        info!("no unprocessed summaries to publish");
        return Ok(RunStats::default());
    }

    let selector = KeywordSelector::new(config.publish.keywords.iter().cloned());
    let selected = selector.select(candidates, config.publish.daily_count, |item| &item.content);

    info!(selected = selected.len(), "selected summaries to publish");

    let client = BookmarkClient::new(api_url, config.publish.max_content_chars);
    let folder = config.publish_folder();

    let executor = WorkExecutor::sequential("publish", Duration::ZERO);
    let oracle = LedgerSnapshotOracle::new(processed.iter().cloned());
    let client = &client;
    let folder = &folder;
    let report = executor
        .run(selected, &oracle, move |item: PublishItem| async move {
            client
                .push_memo(&item.stem, &item.content, folder)
                .await
        })
        .await;

    // The serialized add+save point: one owner merges the acknowledged
    // names and rewrites the ledger wholesale. A failed save is fatal.
    processed.extend(report.completed);
    ledger
        .save(&processed)
        .await
        .with_context(|| format!("failed to save ledger: {}", ledger.path().display()))?;

    Ok(report.stats)
}

/// Run the publish stage immediately or on the configured daily schedule.
pub async fn run(config: &ResolvedConfig, mode: RunMode) -> Result<()> {
    schedule::run_scheduled(mode, || async {
        let stats = run_once(config).await?;
        info!(
            success = stats.success,
            failure = stats.failure,
            "publish run finished"
        );
        Ok(())
    })
    .await
}
