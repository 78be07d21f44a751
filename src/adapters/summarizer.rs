//! LLM summarization client.
//!
//! Talks to an Ollama-compatible chat endpoint: one synchronous
//! call-and-response per document, no streaming. The prompt embeds an
//! excerpt of the converted paper and asks for a fixed seven-point summary.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Placeholder in [`SUMMARY_PROMPT`] replaced by the document excerpt.
const EXCERPT_SLOT: &str = "{paper_excerpt}";

/// Seven-point summary request for a machine-learning paper.
const SUMMARY_PROMPT: &str = r#"I would like you to help me summarize a paper in the field of machine learning.
Please respond in clear, concise, and easy-to-understand language. Here are my specific requirements:

1. The core topic of the paper: Summarize the theme or research question of the paper in one sentence.
2. Main contributions: What problems does the paper solve? What new methods or insights does it propose?
3. Core methods: Describe the main technical methods or algorithms proposed in the paper using simple language.
4. Experimental results: What are the experimental results of the paper? What do they demonstrate?
5. Practical applications: In which real-world scenarios can the research findings of this paper be applied?
6. Advantages and limitations: Briefly explain the main advantages of the paper and its possible shortcomings or limitations.
7. Conclusion: Summarize the overall significance or value of this paper in one sentence.

Here is the full content of the paper:

{paper_excerpt}
"#;

/// Client for the chat-based summarization service.
pub struct SummaryClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl SummaryClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Generate a summary for a document excerpt.
    pub async fn summarize(&self, excerpt: &str) -> Result<String> {
        let prompt = SUMMARY_PROMPT.replace(EXCERPT_SLOT, excerpt);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            stream: false,
        };

        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .context("summarization request failed")?
            .error_for_status()
            .context("summarization service returned an error status")?;

        let body: ChatResponse = response
            .json()
            .await
            .context("failed to parse summarization response")?;

        Ok(body.message.content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}
