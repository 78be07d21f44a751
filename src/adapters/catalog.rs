//! Paginated catalog search client.
//!
//! Enumerates a query page by page (zero-based offset, fixed page size) and
//! materializes the full candidate list before returning. A page shorter
//! than the page size means the corpus is exhausted. What a failed page
//! fetch means is a policy decision: the historical behavior treats it like
//! end-of-data (fail-soft), silently truncating enumeration; strict mode
//! retries the page and surfaces the error instead.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::PaperMeta;

/// What to do when a page fetch fails mid-pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingPolicy {
    /// Treat the failure as end-of-data and return what was gathered.
    FailSoft,

    /// Retry the page up to the attempt budget, then fail enumeration.
    Strict { page_attempts: u32 },
}

/// Client for the remote publication search API.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    page_size: usize,
    request_interval: Duration,
    policy: PagingPolicy,
}

impl CatalogClient {
    pub fn new(
        base_url: impl Into<String>,
        page_size: usize,
        request_interval: Duration,
        policy: PagingPolicy,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            page_size: page_size.max(1),
            request_interval,
            policy,
        }
    }

    /// Fetch the complete candidate list for `query`.
    ///
    /// Pauses for the configured interval between page requests to respect
    /// the remote service's rate limits.
    pub async fn enumerate(&self, query: &str) -> Result<Vec<PaperMeta>> {
        let mut papers = Vec::new();
        let mut offset = 0usize;

        loop {
            let page = match self.fetch_page_with_policy(query, offset).await {
                Ok(page) => page,
                Err(e) => match self.policy {
                    PagingPolicy::FailSoft => {
                        warn!(
                            offset,
                            error = %e,
                            "page fetch failed, treating as end of corpus"
                        );
                        break;
                    }
                    PagingPolicy::Strict { .. } => {
                        return Err(e).with_context(|| {
                            format!("enumeration failed at offset {}", offset)
                        });
                    }
                },
            };

            let count = page.len();
            papers.extend(page);
            debug!(offset, count, total = papers.len(), "fetched catalog page");

            if count < self.page_size {
                break;
            }

            offset += self.page_size;
            tokio::time::sleep(self.request_interval).await;
        }

        info!(query, total = papers.len(), "catalog enumeration complete");
        Ok(papers)
    }

    /// One page fetch, retried per the strict policy's attempt budget.
    async fn fetch_page_with_policy(&self, query: &str, offset: usize) -> Result<Vec<PaperMeta>> {
        let attempts = match self.policy {
            PagingPolicy::FailSoft => 1,
            PagingPolicy::Strict { page_attempts } => page_attempts.max(1),
        };

        let mut last_err = None;
        for attempt in 1..=attempts {
            match self.fetch_page(query, offset).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    if attempt < attempts {
                        warn!(offset, attempt, error = %e, "page fetch failed, retrying");
                        tokio::time::sleep(self.request_interval).await;
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("page fetch failed")))
    }

    async fn fetch_page(&self, query: &str, offset: usize) -> Result<Vec<PaperMeta>> {
        let params = [
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("h", self.page_size.to_string()),
            ("f", offset.to_string()),
        ];

        let response = self
            .http
            .get(&self.base_url)
            .query(&params)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .context("catalog request failed")?
            .error_for_status()
            .context("catalog returned an error status")?;

        let body: SearchResponse = response
            .json()
            .await
            .context("failed to parse catalog response")?;

        Ok(body
            .result
            .hits
            .hit
            .into_iter()
            .map(|hit| PaperMeta {
                title: hit.info.title.unwrap_or_else(|| "Unknown_Title".to_string()),
                kind: hit.info.kind.unwrap_or_default(),
                link: hit.info.ee.unwrap_or_default(),
            })
            .collect())
    }
}

/// Wire schema of the search response. Modeled explicitly so a malformed
/// upstream body fails at the boundary with a parse error.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    /// Absent entirely when a page has zero hits.
    #[serde(default)]
    hit: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    info: HitInfo,
}

#[derive(Debug, Deserialize)]
struct HitInfo {
    title: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    ee: Option<String>,
}
