//! Persisted record of summaries already republished.
//!
//! The publish stage is the one stage whose completion leaves no file
//! behind, so it keeps a ledger: a JSON array of summary filenames,
//! human-inspectable, read in full at stage start and rewritten in full at
//! stage end. The set only grows. A missing or unreadable ledger loads as
//! the empty set (with a warning); a failed save is fatal, because losing
//! the ledger risks duplicate downstream publishes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::warn;

/// Errors raised while persisting the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The set of work-unit names known to be fully republished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedSet(BTreeSet<String>);

impl ProcessedSet {
    pub fn contains(&self, unit: &str) -> bool {
        self.0.contains(unit)
    }

    pub fn insert(&mut self, unit: String) {
        self.0.insert(unit);
    }

    pub fn extend(&mut self, units: impl IntoIterator<Item = String>) {
        self.0.extend(units);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl FromIterator<String> for ProcessedSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// File-backed idempotency ledger.
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the processed set. Missing and unreadable files both yield the
    /// empty set so a damaged ledger degrades to re-publishing, never to a
    /// crash loop.
    pub async fn load(&self) -> ProcessedSet {
        if !self.path.exists() {
            return ProcessedSet::default();
        }

        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read ledger, treating as empty");
                return ProcessedSet::default();
            }
        };

        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(units) => units.into_iter().collect(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to parse ledger, treating as empty");
                ProcessedSet::default()
            }
        }
    }

    /// Rewrite the ledger wholesale. Errors are fatal to the caller.
    pub async fn save(&self, set: &ProcessedSet) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let units: Vec<&String> = set.iter().collect();
        let content = serde_json::to_string_pretty(&units)?;

        fs::write(&self.path, content).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_ledger_loads_empty() {
        let temp = TempDir::new().unwrap();
        let ledger = Ledger::new(temp.path().join("processed_files.json"));

        assert!(ledger.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let ledger = Ledger::new(temp.path().join("processed_files.json"));

        let mut set = ProcessedSet::default();
        set.insert("b.md".to_string());
        set.insert("a.md".to_string());
        ledger.save(&set).await.unwrap();

        let loaded = ledger.load().await;
        assert_eq!(loaded, set);
        assert!(loaded.contains("a.md"));
        assert!(!loaded.contains("c.md"));
    }

    #[tokio::test]
    async fn test_ledger_file_is_a_json_string_array() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("processed_files.json");
        let ledger = Ledger::new(&path);

        let set: ProcessedSet = ["x.md".to_string(), "y.md".to_string()].into_iter().collect();
        ledger.save(&set).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec!["x.md".to_string(), "y.md".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_ledger_loads_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("processed_files.json");
        std::fs::write(&path, "{not json").unwrap();

        let ledger = Ledger::new(&path);
        assert!(ledger.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_surfaces_io_error_for_unwritable_path() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        // The parent "directory" is a regular file, so the save cannot
        // create it.
        let ledger = Ledger::new(blocker.join("sub").join("processed_files.json"));
        let err = ledger.save(&ProcessedSet::default()).await.unwrap_err();
        assert!(matches!(err, LedgerError::Io(_)));
    }

    #[tokio::test]
    async fn test_set_only_grows_across_saves() {
        let temp = TempDir::new().unwrap();
        let ledger = Ledger::new(temp.path().join("processed_files.json"));

        let mut set = ledger.load().await;
        set.insert("first.md".to_string());
        ledger.save(&set).await.unwrap();

        let mut set = ledger.load().await;
        set.extend(["second.md".to_string()]);
        ledger.save(&set).await.unwrap();

        let final_set = ledger.load().await;
        assert_eq!(final_set.len(), 2);
        assert!(final_set.contains("first.md"));
        assert!(final_set.contains("second.md"));
    }
}
