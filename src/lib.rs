//! paperflow - resumable paper-corpus pipeline
//!
//! Enumerates papers from a remote search catalog, downloads their PDFs,
//! converts them to markdown, derives LLM summaries, and republishes a
//! ranked subset to a bookmarking service.
//!
//! # Architecture
//!
//! Every stage is the same pattern in a different shape: enumerate
//! candidates, skip work a completion oracle already knows about, execute
//! the rest with bounded concurrency and per-item retry, and report
//! aggregate counts. File-producing stages treat the artifact's presence at
//! its canonical path as proof of completion; the publish stage records
//! completions in a persisted ledger instead. A crash or restart therefore
//! never redoes finished work and never silently loses failed work.
//!
//! # Modules
//!
//! - `adapters`: clients for the external services (catalog, converter,
//!   summarizer, bookmarks)
//! - `core`: the shared batch machinery (executor, oracle, ledger,
//!   selector, schedule)
//! - `domain`: paper metadata and artifact naming
//! - `stages`: stage wiring (download, convert, summarize, publish)
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Download the corpus for the configured query
//! paperflow fetch
//!
//! # Convert and summarize
//! paperflow convert
//! paperflow summarize
//!
//! # Push today's picks immediately, or run the daily scheduler
//! paperflow publish --now
//! paperflow publish
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod stages;

// Re-export the batch-processing core at the crate root for convenience
pub use crate::core::{
    BatchReport, CompletionOracle, Concurrency, KeywordSelector, Ledger, LedgerSnapshotOracle,
    OutputPathOracle, ProcessedSet, RunMode, RunStats, WorkExecutor, WorkItem,
};
pub use crate::domain::{sanitize_title, PaperMeta};
