//! Republishing client for the bookmarking service.
//!
//! Pushes a summary as a "memo" into a user folder. The service signals
//! success twice: HTTP 200 on the transport and an application-level
//! `code == 200` in the JSON body. Either one failing means the item must
//! not be marked done, so it stays eligible for the next run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Client for the memo/bookmark API.
pub struct BookmarkClient {
    http: reqwest::Client,
    api_url: String,
    max_content_chars: usize,
}

impl BookmarkClient {
    pub fn new(api_url: impl Into<String>, max_content_chars: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            max_content_chars,
        }
    }

    /// Push one memo. Content longer than the service limit is truncated
    /// before sending.
    pub async fn push_memo(&self, title: &str, content: &str, folder: &str) -> Result<()> {
        let content = clip_chars(content, self.max_content_chars);

        let payload = MemoPayload {
            kind: "memo",
            content: &content,
            title,
            description: "",
            tags: &[],
            folder,
        };

        let response = self
            .http
            .post(&self.api_url)
            .json(&payload)
            .send()
            .await
            .context("memo request failed")?;

        let status = response.status();
        let body: MemoResponse = response
            .json()
            .await
            .context("failed to parse memo response")?;

        if !status.is_success() || body.code != 200 {
            anyhow::bail!(
                "memo rejected for '{}': http {}, code {}{}",
                title,
                status,
                body.code,
                body.message
                    .map(|m| format!(" ({})", m))
                    .unwrap_or_default()
            );
        }

        Ok(())
    }
}

/// Truncate to at most `max` characters without splitting a code point.
fn clip_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[derive(Debug, Serialize)]
struct MemoPayload<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    content: &'a str,
    title: &'a str,
    description: &'a str,
    tags: &'a [String],
    folder: &'a str,
}

#[derive(Debug, Deserialize)]
struct MemoResponse {
    code: i64,
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_respects_char_boundaries() {
        assert_eq!(clip_chars("abcdef", 3), "abc");
        assert_eq!(clip_chars("ab", 5), "ab");
        // Multi-byte characters count as one each.
        assert_eq!(clip_chars("日本語の要約", 3), "日本語");
    }

    #[test]
    fn test_payload_shape() {
        let payload = MemoPayload {
            kind: "memo",
            content: "body",
            title: "Paper",
            description: "",
            tags: &[],
            folder: "ICLR 2024",
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "memo");
        assert_eq!(json["folder"], "ICLR 2024");
        assert!(json["tags"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_response_parses_without_message() {
        let parsed: MemoResponse = serde_json::from_str(r#"{"code": 200}"#).unwrap();
        assert_eq!(parsed.code, 200);
        assert!(parsed.message.is_none());
    }
}
