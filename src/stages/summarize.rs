//! Summarization stage: markdown documents to LLM-generated summaries.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::SummaryClient;
use crate::config::ResolvedConfig;
use crate::core::{OutputPathOracle, RunStats, WorkExecutor, WorkItem};
use crate::stages::{files_with_extension, FileItem};

/// Summarize every converted paper without a summary yet. One document at a
/// time: the model server is the bottleneck, parallel calls just queue up
/// behind it.
pub async fn run(config: &ResolvedConfig) -> Result<RunStats> {
    let md_dir = config.md_dir();
    let sum_dir = config.sum_dir();

    let candidates = files_with_extension(&md_dir, "md")?;
    if candidates.is_empty() {
        info!(dir = %md_dir.display(), "no markdown files to summarize");
        return Ok(RunStats::default());
    }

    tokio::fs::create_dir_all(&sum_dir)
        .await
        .with_context(|| format!("failed to create summary directory: {}", sum_dir.display()))?;

    let client = SummaryClient::new(
        &config.summarize.base_url,
        &config.summarize.model,
        Duration::from_secs(config.summarize.timeout_secs),
    );

    let executor = WorkExecutor::sequential("summarize", Duration::ZERO);

    let oracle = OutputPathOracle::new(&sum_dir);
    let client = &client;
    let sum_dir = &sum_dir;
    let report = executor
        .run(candidates, &oracle, move |item: FileItem| {
            let target = sum_dir.join(item.unit_name());
            async move {
                let document = tokio::fs::read_to_string(&item.path)
                    .await
                    .with_context(|| format!("failed to read {}", item.path.display()))?;

                let excerpt = prepare_excerpt(&document);
                let summary = client.summarize(&excerpt).await?;

                tokio::fs::write(&target, summary)
                    .await
                    .with_context(|| format!("failed to write {}", target.display()))?;

                Ok(())
            }
        })
        .await;

    Ok(report.stats)
}

/// Prepare the excerpt sent to the model: drop image links (the model cannot
/// see them and their URLs waste context), then keep the front third of the
/// lines, which carries the abstract, introduction and method.
pub fn prepare_excerpt(document: &str) -> String {
    let text = strip_image_links(document);
    let lines: Vec<&str> = text.lines().collect();
    let keep = (lines.len() / 3).max(1);
    lines[..keep.min(lines.len())].join("\n")
}

/// Remove markdown image links of the form `![alt](target)`.
fn strip_image_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while let Some(found) = text[i..].find("![") {
        let start = i + found;
        let tail = &text[start..];

        let end = tail
            .find("](")
            .and_then(|mid| tail[mid + 2..].find(')').map(|p| mid + 2 + p + 1));

        match end {
            Some(len) => {
                out.push_str(&text[i..start]);
                i = start + len;
            }
            None => {
                // Not a complete image link; keep the marker and move on.
                out.push_str(&text[i..start + 2]);
                i = start + 2;
            }
        }
    }

    out.push_str(&text[i..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_image_links() {
        let text = "before ![figure 1](images/f1.png) after";
        assert_eq!(strip_image_links(text), "before  after");
    }

    #[test]
    fn test_strip_multiple_and_empty_alt() {
        let text = "a ![](x.png) b ![two](y.jpg) c";
        assert_eq!(strip_image_links(text), "a  b  c");
    }

    #[test]
    fn test_unclosed_image_marker_kept() {
        let text = "dangling ![marker without close";
        assert_eq!(strip_image_links(text), text);
    }

    #[test]
    fn test_excerpt_keeps_front_third() {
        let document = (1..=9)
            .map(|n| format!("line {}", n))
            .collect::<Vec<_>>()
            .join("\n");

        let excerpt = prepare_excerpt(&document);
        assert_eq!(excerpt, "line 1\nline 2\nline 3");
    }

    #[test]
    fn test_excerpt_keeps_at_least_one_line() {
        assert_eq!(prepare_excerpt("only line"), "only line");
        assert_eq!(prepare_excerpt("a\nb"), "a");
    }
}
