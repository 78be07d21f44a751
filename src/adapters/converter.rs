//! Subprocess adapter for the PDF-to-markdown conversion tool.
//!
//! The converter is an external model-backed program driven through its CLI:
//! it takes a PDF path and an output directory, and writes `<stem>.md` plus
//! an `images/` subdirectory of extracted figures. Inputs and outputs are
//! filesystem paths, never in-memory buffers.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Command;
use tokio::time::timeout;

/// PDF-to-markdown converter driven as a subprocess.
pub struct ConverterTool {
    binary_path: String,
    timeout: Duration,
}

impl ConverterTool {
    pub fn new(binary_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary_path: binary_path.into(),
            timeout,
        }
    }

    /// Convert one PDF, leaving `<stem>.md` in `out_dir`.
    ///
    /// Fails on a non-zero exit, a timeout, or a run that exits cleanly but
    /// produces no markdown file.
    pub async fn convert(&self, pdf_path: &Path, out_dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(out_dir.join("images"))
            .await
            .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;

        let child = Command::new(&self.binary_path)
            .arg(pdf_path)
            .arg("--output")
            .arg(out_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn converter '{}'", self.binary_path))?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .with_context(|| {
                format!(
                    "converter timed out after {:?} on {}",
                    self.timeout,
                    pdf_path.display()
                )
            })?
            .context("failed to wait for converter process")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            anyhow::bail!(
                "converter failed with exit code {} on {}: {}",
                exit_code,
                pdf_path.display(),
                stderr.trim()
            );
        }

        let expected = self.output_path(pdf_path, out_dir);
        if !expected.exists() {
            anyhow::bail!("converter produced no output at {}", expected.display());
        }

        Ok(())
    }

    /// Canonical markdown path the converter is expected to write.
    pub fn output_path(&self, pdf_path: &Path, out_dir: &Path) -> std::path::PathBuf {
        let stem = pdf_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        out_dir.join(format!("{}.md", stem))
    }
}
