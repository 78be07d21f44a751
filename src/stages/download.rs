//! Enumerate-and-fetch stage: catalog search to downloaded PDFs.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::{CatalogClient, PagingPolicy};
use crate::config::ResolvedConfig;
use crate::core::{OutputPathOracle, RunStats, WorkExecutor, WorkItem};
use crate::domain::PaperMeta;

/// One downloadable paper: eligibility already checked, link rewritten.
#[derive(Debug, Clone)]
struct DownloadItem {
    title: String,
    pdf_url: String,
    file_name: String,
}

impl WorkItem for DownloadItem {
    fn unit_name(&self) -> String {
        self.file_name.clone()
    }

    fn label(&self) -> &str {
        &self.title
    }
}

/// Enumerate the catalog and download every eligible paper not already on
/// disk.
pub async fn run(config: &ResolvedConfig) -> Result<RunStats> {
    let policy = if config.catalog.strict_paging {
        PagingPolicy::Strict {
            page_attempts: config.catalog.page_attempts,
        }
    } else {
        PagingPolicy::FailSoft
    };

    let catalog = CatalogClient::new(
        &config.catalog.base_url,
        config.catalog.page_size,
        Duration::from_secs(config.catalog.request_interval_secs),
        policy,
    );

    info!(query = %config.catalog.query, "enumerating catalog");
    let papers = catalog.enumerate(&config.catalog.query).await?;

    let candidates: Vec<DownloadItem> = papers
        .iter()
        .filter_map(|paper| to_download_item(paper))
        .collect();

    info!(
        enumerated = papers.len(),
        eligible = candidates.len(),
        "catalog filtered to downloadable papers"
    );

    let pdf_dir = config.pdf_dir();
    tokio::fs::create_dir_all(&pdf_dir)
        .await
        .with_context(|| format!("failed to create pdf directory: {}", pdf_dir.display()))?;

    let executor = if config.download.sequential {
        WorkExecutor::sequential(
            "download",
            Duration::from_secs(config.download.item_delay_secs),
        )
    } else {
        WorkExecutor::pool("download", config.download.workers)
    };

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.download.timeout_secs))
        .build()
        .context("failed to build download http client")?;

    let oracle = OutputPathOracle::new(&pdf_dir);
    let report = executor
        .run(candidates, &oracle, |item: DownloadItem| {
            let http = http.clone();
            let target = pdf_dir.join(&item.file_name);
            async move {
                let response = http
                    .get(&item.pdf_url)
                    .send()
                    .await
                    .context("pdf request failed")?
                    .error_for_status()
                    .context("pdf server returned an error status")?;

                let bytes = response.bytes().await.context("failed to read pdf body")?;

                tokio::fs::write(&target, &bytes)
                    .await
                    .with_context(|| format!("failed to write {}", target.display()))?;

                Ok(())
            }
        })
        .await;

    Ok(report.stats)
}

fn to_download_item(paper: &PaperMeta) -> Option<DownloadItem> {
    let pdf_url = paper.preprint_pdf_url()?;
    Some(DownloadItem {
        title: paper.title.clone(),
        file_name: paper.pdf_name(),
        pdf_url,
    })
}
