//! Reusable batch-processing core shared by every stage.

pub mod executor;
pub mod ledger;
pub mod oracle;
pub mod schedule;
pub mod selector;

pub use executor::{BatchReport, Concurrency, RunStats, WorkExecutor, WorkItem};
pub use ledger::{Ledger, ProcessedSet};
pub use oracle::{CompletionOracle, LedgerSnapshotOracle, OutputPathOracle};
pub use schedule::RunMode;
pub use selector::KeywordSelector;
