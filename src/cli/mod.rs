//! Command-line interface for paperflow.
//!
//! One subcommand per pipeline stage, plus a debug view of the resolved
//! configuration. Every stage is resumable: re-running a command only
//! performs the work a previous run left unfinished.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config;
use crate::core::{RunMode, RunStats};
use crate::stages;

/// paperflow - resumable paper-corpus pipeline
#[derive(Parser, Debug)]
#[command(name = "paperflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enumerate the catalog and download eligible paper PDFs
    Fetch {
        /// Override the configured search query (e.g. "ICLR+2024")
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Convert downloaded PDFs to markdown
    Convert,

    /// Generate LLM summaries for converted papers
    Summarize,

    /// Republish top-ranked summaries to the bookmarking service
    Publish {
        /// Run once immediately instead of on the daily schedule
        #[arg(long)]
        now: bool,

        /// Override the number of summaries pushed per run
        #[arg(short, long)]
        count: Option<usize>,
    },

    /// Show the resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Fetch { query } => {
                let mut config = config::load()?;
                if let Some(query) = query {
                    config.catalog.query = query;
                }
                report("fetch", stages::download::run(&config).await?);
                Ok(())
            }
            Commands::Convert => {
                let config = config::load()?;
                report("convert", stages::convert::run(&config).await?);
                Ok(())
            }
            Commands::Summarize => {
                let config = config::load()?;
                report("summarize", stages::summarize::run(&config).await?);
                Ok(())
            }
            Commands::Publish { now, count } => {
                let mut config = config::load()?;
                if let Some(count) = count {
                    config.publish.daily_count = count;
                }

                let mode = if now {
                    RunMode::Once
                } else {
                    RunMode::Daily {
                        hour: config.publish.hour,
                        minute: config.publish.minute,
                    }
                };

                stages::publish::run(&config, mode).await
            }
            Commands::Config => {
                let config = config::load()?;
                show_config(&config);
                Ok(())
            }
        }
    }
}

fn report(stage: &str, stats: RunStats) {
    info!(
        stage,
        success = stats.success,
        failure = stats.failure,
        "stage finished"
    );
    println!(
        "{}: {} succeeded, {} failed",
        stage, stats.success, stats.failure
    );
}

fn show_config(config: &config::ResolvedConfig) {
    println!("home:        {}", config.home.display());
    match &config.config_file {
        Some(path) => println!("config file: {}", path.display()),
        None => println!("config file: (none, using defaults)"),
    }
    println!("query:       {}", config.catalog.query);
    println!("catalog:     {}", config.catalog.base_url);
    println!("pdf dir:     {}", config.pdf_dir().display());
    println!("md dir:      {}", config.md_dir().display());
    println!("sum dir:     {}", config.sum_dir().display());
    println!("ledger:      {}", config.ledger_path().display());
    println!("folder:      {}", config.publish_folder());
    println!(
        "schedule:    daily at {:02}:{:02}, {} items",
        config.publish.hour, config.publish.minute, config.publish.daily_count
    );
    println!(
        "bookmark api: {}",
        config.publish.api_url.as_deref().unwrap_or("(not set)")
    );
}
