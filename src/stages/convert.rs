//! Conversion stage: downloaded PDFs to markdown documents.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::ConverterTool;
use crate::config::ResolvedConfig;
use crate::core::{OutputPathOracle, RunStats, WorkExecutor};
use crate::stages::{files_with_extension, FileItem};

/// Convert every PDF without a markdown counterpart. Conversion is the one
/// stage with a per-item retry budget: the model-backed tool fails
/// transiently often enough that a second attempt is usually worth it.
pub async fn run(config: &ResolvedConfig) -> Result<RunStats> {
    let pdf_dir = config.pdf_dir();
    let md_dir = config.md_dir();

    let candidates = files_with_extension(&pdf_dir, "pdf")?;
    if candidates.is_empty() {
        info!(dir = %pdf_dir.display(), "no pdf files to convert");
        return Ok(RunStats::default());
    }

    tokio::fs::create_dir_all(&md_dir)
        .await
        .with_context(|| format!("failed to create markdown directory: {}", md_dir.display()))?;

    let tool = ConverterTool::new(
        &config.convert.tool,
        Duration::from_secs(config.convert.timeout_secs),
    );

    let executor =
        WorkExecutor::pool("convert", config.convert.workers).with_attempts(config.convert.attempts);

    let oracle = OutputPathOracle::new(&md_dir);
    let tool = &tool;
    let md_dir = &md_dir;
    let report = executor
        .run(candidates, &oracle, move |item: FileItem| async move {
            tool.convert(&item.path, md_dir).await
        })
        .await;

    Ok(report.stats)
}
