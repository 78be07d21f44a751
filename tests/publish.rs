//! Publish Stage Integration Tests
//!
//! End-to-end runs of the publish unit of work against a mock bookmark
//! API: keyword selection, ledger persistence, and the rule that only
//! positively acknowledged items ever enter the ledger.

use std::path::Path;

use paperflow::config::{
    CatalogConfig, ConvertConfig, DownloadConfig, PublishConfig, ResolvedConfig, SummarizeConfig,
};
use paperflow::core::Ledger;
use paperflow::stages::publish;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(home: &Path, api_url: &str, daily_count: usize, keywords: &[&str]) -> ResolvedConfig {
    ResolvedConfig {
        home: home.to_path_buf(),
        catalog: CatalogConfig::default(),
        download: DownloadConfig::default(),
        convert: ConvertConfig::default(),
        summarize: SummarizeConfig::default(),
        publish: PublishConfig {
            api_url: Some(api_url.to_string()),
            daily_count,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..PublishConfig::default()
        },
        config_file: None,
    }
}

fn write_summary(config: &ResolvedConfig, stem: &str, content: &str) {
    let dir = config.sum_dir();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{}.md", stem)), content).unwrap();
}

fn accept_all() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 200}))
}

#[tokio::test]
async fn test_keyword_selection_publishes_top_ranked_summaries() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(accept_all())
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(temp.path(), &server.uri(), 2, &["diffusion"]);
    write_summary(&config, "high", "diffusion diffusion diffusion");
    write_summary(&config, "none", "unrelated work");
    write_summary(&config, "low", "one diffusion mention");

    let stats = publish::run_once(&config).await.unwrap();
    assert_eq!(stats.success, 2);
    assert_eq!(stats.failure, 0);

    let processed = Ledger::new(config.ledger_path()).load().await;
    assert!(processed.contains("high.md"));
    assert!(processed.contains("low.md"));
    assert!(!processed.contains("none.md"));
}

#[tokio::test]
async fn test_rejected_memo_never_enters_the_ledger() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;

    // Application-level rejection despite HTTP 200.
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"title": "rejected"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 500,
            "message": "quota exceeded"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(accept_all())
        .mount(&server)
        .await;

    let config = test_config(temp.path(), &server.uri(), 5, &[]);
    write_summary(&config, "accepted", "content a");
    write_summary(&config, "rejected", "content b");

    let stats = publish::run_once(&config).await.unwrap();
    assert_eq!(stats.success, 1);
    assert_eq!(stats.failure, 1);

    let processed = Ledger::new(config.ledger_path()).load().await;
    assert!(processed.contains("accepted.md"));
    assert!(!processed.contains("rejected.md"));
}

#[tokio::test]
async fn test_all_rejections_leave_ledger_unchanged() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"code": 500})))
        .mount(&server)
        .await;

    let config = test_config(temp.path(), &server.uri(), 5, &[]);
    write_summary(&config, "a", "content");
    write_summary(&config, "b", "content");

    // Seed the ledger so we can verify nothing was added or lost.
    let ledger = Ledger::new(config.ledger_path());
    let mut seed = ledger.load().await;
    seed.insert("previous.md".to_string());
    ledger.save(&seed).await.unwrap();

    let stats = publish::run_once(&config).await.unwrap();
    assert_eq!(stats.success, 0);
    assert_eq!(stats.failure, 2);

    let processed = ledger.load().await;
    assert_eq!(processed.len(), 1);
    assert!(processed.contains("previous.md"));
}

#[tokio::test]
async fn test_second_run_only_publishes_remaining_summaries() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(accept_all())
        .mount(&server)
        .await;

    let config = test_config(temp.path(), &server.uri(), 2, &[]);
    write_summary(&config, "a", "content");
    write_summary(&config, "b", "content");
    write_summary(&config, "c", "content");

    // First run takes two, second run takes the remaining one.
    let first = publish::run_once(&config).await.unwrap();
    assert_eq!(first.success, 2);

    let second = publish::run_once(&config).await.unwrap();
    assert_eq!(second.success, 1);

    let processed = Ledger::new(config.ledger_path()).load().await;
    assert_eq!(processed.len(), 3);

    // A third run finds nothing to do.
    let third = publish::run_once(&config).await.unwrap();
    assert_eq!(third.success + third.failure, 0);
}

#[tokio::test]
async fn test_missing_api_url_is_an_error() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(temp.path(), "http://unused", 1, &[]);
    config.publish.api_url = None;

    assert!(publish::run_once(&config).await.is_err());
}
