//! Pipeline stages: each one wires an enumeration source, a completion
//! oracle and a per-item action into the shared work executor.

pub mod convert;
pub mod download;
pub mod publish;
pub mod summarize;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::WorkItem;
use crate::domain::filename::markdown_name;

/// A file-backed candidate used by the convert and summarize stages.
#[derive(Debug, Clone)]
pub struct FileItem {
    /// Source file path.
    pub path: PathBuf,
    /// Filename without extension; doubles as the paper title.
    pub stem: String,
}

impl WorkItem for FileItem {
    fn unit_name(&self) -> String {
        // Both downstream stages produce a markdown artifact.
        markdown_name(&self.stem)
    }

    fn label(&self) -> &str {
        &self.stem
    }
}

/// List files with the given extension, sorted by name so candidate order
/// is stable across runs.
pub fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<FileItem>> {
    let mut items = Vec::new();

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        items.push(FileItem {
            stem: stem.to_string(),
            path,
        });
    }

    items.sort_by(|a, b| a.stem.cmp(&b.stem));
    Ok(items)
}
