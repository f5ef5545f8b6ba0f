//! Search-target and exclude-pattern file parsing

use linkharvest::error::PipelineError;
use linkharvest::targets::{load_exclude_patterns, load_search_targets};
use tempfile::TempDir;

async fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    tokio::fs::write(&path, contents).await.unwrap();
    path
}

#[tokio::test]
async fn accepts_bare_array_of_urls() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "search_urls.json",
        r#"["https://example.com/search?q=a", "  https://example.com/search?q=b  "]"#,
    )
    .await;

    let targets = load_search_targets(&path).await.unwrap();
    assert_eq!(targets.len(), 2);
    // Entries are trimmed
    assert_eq!(targets[1].url(), "https://example.com/search?q=b");
}

#[tokio::test]
async fn accepts_wrapped_urls_object() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "search_urls.json",
        r#"{"urls": ["https://example.com/search?q=a"]}"#,
    )
    .await;

    let targets = load_search_targets(&path).await.unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].url(), "https://example.com/search?q=a");
}

#[tokio::test]
async fn rejects_unknown_shapes() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "search_urls.json", r#"{"queries": ["a"]}"#).await;

    let err = load_search_targets(&path).await.unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[tokio::test]
async fn rejects_missing_targets_file() {
    let dir = TempDir::new().unwrap();
    let err = load_search_targets(&dir.path().join("absent.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[tokio::test]
async fn rejects_effectively_empty_targets() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "search_urls.json", r#"["", "   "]"#).await;

    let err = load_search_targets(&path).await.unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[tokio::test]
async fn exclude_patterns_accept_both_shapes() {
    let dir = TempDir::new().unwrap();

    let bare = write(&dir, "ex1.json", r#"["youtube.com", ".pdf"]"#).await;
    assert_eq!(load_exclude_patterns(&bare).await.unwrap().len(), 2);

    let wrapped = write(&dir, "ex2.json", r#"{"patterns": ["facebook.com"]}"#).await;
    assert_eq!(load_exclude_patterns(&wrapped).await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_exclude_file_is_tolerated() {
    let dir = TempDir::new().unwrap();
    let patterns = load_exclude_patterns(&dir.path().join("absent.json"))
        .await
        .unwrap();
    assert!(patterns.is_empty());
}

#[tokio::test]
async fn malformed_exclude_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "ex.json", r#"{"wrong": true}"#).await;

    let err = load_exclude_patterns(&path).await.unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}
