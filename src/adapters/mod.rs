//! Clients for the external services the pipeline talks to.
//!
//! Each boundary is an opaque request/response collaborator: the paginated
//! catalog search API, the subprocess document converter, the LLM chat
//! endpoint, and the bookmarking service the summaries are republished to.

pub mod bookmarks;
pub mod catalog;
pub mod converter;
pub mod summarizer;

pub use bookmarks::BookmarkClient;
pub use catalog::{CatalogClient, PagingPolicy};
pub use converter::ConverterTool;
pub use summarizer::SummaryClient;
