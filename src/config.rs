//! Configuration for the pipeline.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (PAPERFLOW_HOME, PAPERFLOW_BOOKMARK_URL)
//! 2. Config file (.paperflow/config.yaml, discovered by walking parents)
//! 3. Built-in defaults
//!
//! Relative paths in the config file are resolved against the config file's
//! project root.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw config file schema (matches the YAML structure).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Root directory for downloaded corpora.
    pub home: Option<String>,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub summarize: SummarizeConfig,
    #[serde(default)]
    pub publish: PublishConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Search API endpoint.
    pub base_url: String,
    /// Corpus query, in the API's own encoding (e.g. "ICLR+2024").
    pub query: String,
    /// Results requested per page.
    pub page_size: usize,
    /// Pause between page requests, seconds.
    pub request_interval_secs: u64,
    /// Retry failed pages instead of treating them as end-of-data.
    pub strict_paging: bool,
    /// Attempt budget per page in strict mode.
    pub page_attempts: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dblp.org/search/publ/api".to_string(),
            query: "ICLR+2024".to_string(),
            page_size: 1000,
            request_interval_secs: 2,
            strict_paging: false,
            page_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Worker-pool size in parallel mode.
    pub workers: usize,
    /// Run one download at a time with a pause between items.
    pub sequential: bool,
    /// Pause between sequential downloads, seconds.
    pub item_delay_secs: u64,
    /// Per-request timeout, seconds.
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            sequential: false,
            item_delay_secs: 1,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Converter binary on PATH (or an absolute path).
    pub tool: String,
    /// Worker-pool size.
    pub workers: usize,
    /// Attempt budget per document.
    pub attempts: u32,
    /// Per-document timeout, seconds.
    pub timeout_secs: u64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            tool: "pdf2md".to_string(),
            workers: 4,
            attempts: 3,
            timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizeConfig {
    /// Chat API base URL (Ollama-compatible).
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Per-request timeout, seconds.
    pub timeout_secs: u64,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "qwen2.5:72b".to_string(),
            timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Bookmark API endpoint. Usually supplied via PAPERFLOW_BOOKMARK_URL.
    pub api_url: Option<String>,
    /// Target folder in the bookmarking service.
    pub folder: Option<String>,
    /// Summaries pushed per run.
    pub daily_count: usize,
    /// Service-side content limit, characters.
    pub max_content_chars: usize,
    /// Keywords the priority selector scores by.
    pub keywords: Vec<String>,
    /// Daily fire time, local.
    pub hour: u32,
    pub minute: u32,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            folder: None,
            daily_count: 10,
            max_content_chars: 3000,
            keywords: Vec::new(),
            hour: 3,
            minute: 0,
        }
    }
}

/// Resolved configuration with absolute paths and env overrides applied.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute root for all corpus directories.
    pub home: PathBuf,
    pub catalog: CatalogConfig,
    pub download: DownloadConfig,
    pub convert: ConvertConfig,
    pub summarize: SummarizeConfig,
    pub publish: PublishConfig,
    /// Path of the config file, if one was found.
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Directory-safe slug for the configured query.
    pub fn query_slug(&self) -> String {
        self.catalog.query.replace('+', "_")
    }

    /// Root directory of the current corpus.
    pub fn corpus_dir(&self) -> PathBuf {
        self.home.join(self.query_slug())
    }

    /// Downloaded PDFs.
    pub fn pdf_dir(&self) -> PathBuf {
        self.corpus_dir().join("pdf")
    }

    /// Converted markdown documents.
    pub fn md_dir(&self) -> PathBuf {
        self.corpus_dir().join("md")
    }

    /// Generated summaries.
    pub fn sum_dir(&self) -> PathBuf {
        self.corpus_dir().join("sum")
    }

    /// Idempotency ledger for the publish stage.
    pub fn ledger_path(&self) -> PathBuf {
        self.sum_dir().join("processed_files.json")
    }

    /// Folder name for republished memos; defaults to a readable form of
    /// the query.
    pub fn publish_folder(&self) -> String {
        self.publish
            .folder
            .clone()
            .unwrap_or_else(|| self.catalog.query.replace('+', " "))
    }
}

/// Find a config file by searching the current directory and its parents.
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".paperflow").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Load configuration from all sources.
pub fn load() -> Result<ResolvedConfig> {
    let config_path = find_config_file();

    let file = match config_path.as_deref() {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    resolve(file, config_path)
}

fn resolve(file: ConfigFile, config_path: Option<PathBuf>) -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("failed to determine home directory")?
        .join(".paperflow")
        .join("papers");

    // Relative paths in the file are anchored at the project root, the
    // parent of the .paperflow directory.
    let base_dir = config_path
        .as_deref()
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .map(Path::to_path_buf);

    let home = if let Ok(env_home) = std::env::var("PAPERFLOW_HOME") {
        PathBuf::from(env_home)
    } else if let Some(ref home) = file.home {
        resolve_path(base_dir.as_deref().unwrap_or(Path::new(".")), home)
    } else {
        default_home
    };

    let mut publish = file.publish;
    if let Ok(url) = std::env::var("PAPERFLOW_BOOKMARK_URL") {
        publish.api_url = Some(url);
    }

    if publish.hour >= 24 || publish.minute >= 60 {
        anyhow::bail!(
            "invalid publish schedule {:02}:{:02}",
            publish.hour,
            publish.minute
        );
    }

    Ok(ResolvedConfig {
        home,
        catalog: file.catalog,
        download: file.download,
        convert: file.convert,
        summarize: file.summarize,
        publish,
        config_file: config_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(ConfigFile::default(), None).unwrap();

        assert_eq!(config.catalog.page_size, 1000);
        assert_eq!(config.download.workers, 8);
        assert_eq!(config.convert.attempts, 3);
        assert_eq!(config.publish.daily_count, 10);
        assert_eq!(config.publish.hour, 3);
    }

    #[test]
    fn test_config_file_parsing() {
        let yaml = r#"
home: /data/papers
catalog:
  query: NEURIPS+2025
  page_size: 500
download:
  sequential: true
publish:
  daily_count: 5
  keywords: [diffusion, alignment]
"#;
        let file: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        let config = resolve(file, None).unwrap();

        assert_eq!(config.home, PathBuf::from("/data/papers"));
        assert_eq!(config.catalog.query, "NEURIPS+2025");
        assert_eq!(config.catalog.page_size, 500);
        assert!(config.download.sequential);
        assert_eq!(config.publish.daily_count, 5);
        assert_eq!(config.publish.keywords.len(), 2);
        // Untouched sections keep their defaults.
        assert_eq!(config.convert.workers, 4);
    }

    #[test]
    fn test_derived_directories() {
        let file: ConfigFile = serde_yaml::from_str("home: /data/papers").unwrap();
        let config = resolve(file, None).unwrap();

        assert_eq!(config.query_slug(), "ICLR_2024");
        assert_eq!(config.pdf_dir(), PathBuf::from("/data/papers/ICLR_2024/pdf"));
        assert_eq!(config.md_dir(), PathBuf::from("/data/papers/ICLR_2024/md"));
        assert_eq!(
            config.ledger_path(),
            PathBuf::from("/data/papers/ICLR_2024/sum/processed_files.json")
        );
        assert_eq!(config.publish_folder(), "ICLR 2024");
    }

    #[test]
    fn test_invalid_schedule_rejected() {
        let yaml = "publish:\n  hour: 24\n";
        let file: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert!(resolve(file, None).is_err());
    }

    #[test]
    fn test_relative_home_resolves_against_project_root() {
        let file: ConfigFile = serde_yaml::from_str("home: ./papers").unwrap();
        let config = resolve(
            file,
            Some(PathBuf::from("/proj/.paperflow/config.yaml")),
        )
        .unwrap();

        assert_eq!(config.home, PathBuf::from("/proj/./papers"));
    }
}
