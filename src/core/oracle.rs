//! Completion oracles: "was this work unit already done?"
//!
//! Two signals answer that question. File-producing stages leave their
//! artifact at a canonical path, so presence of the file is proof of
//! completion. The publish stage's success is a remote side effect, so it is
//! tracked in the persisted ledger instead. The executor is written once
//! against this trait and does not care which signal backs it.

use std::collections::HashSet;
use std::path::PathBuf;

/// Answers whether a work unit is already complete and can be skipped.
pub trait CompletionOracle: Send + Sync {
    fn is_complete(&self, unit: &str) -> bool;
}

/// Completion signal for file-producing stages: the artifact exists at its
/// canonical path inside the stage's output directory.
pub struct OutputPathOracle {
    dir: PathBuf,
}

impl OutputPathOracle {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CompletionOracle for OutputPathOracle {
    fn is_complete(&self, unit: &str) -> bool {
        self.dir.join(unit).exists()
    }
}

/// Completion signal for the publish stage: membership in the ledger
/// snapshot taken at run start.
pub struct LedgerSnapshotOracle {
    snapshot: HashSet<String>,
}

impl LedgerSnapshotOracle {
    pub fn new(snapshot: impl IntoIterator<Item = String>) -> Self {
        Self {
            snapshot: snapshot.into_iter().collect(),
        }
    }
}

impl CompletionOracle for LedgerSnapshotOracle {
    fn is_complete(&self, unit: &str) -> bool {
        self.snapshot.contains(unit)
    }
}
