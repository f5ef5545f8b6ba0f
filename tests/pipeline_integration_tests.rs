//! End-to-end pipeline runs against live pages
//!
//! These drive a real browser and real network traffic, so they only run
//! when explicitly requested.

use linkharvest::config::PipelineConfig;
use linkharvest::pipeline::Pipeline;
use tempfile::TempDir;

fn live_config(dir: &TempDir) -> PipelineConfig {
    PipelineConfig::builder()
        .data_dir(dir.path().to_path_buf())
        .max_pages(1)
        .build()
}

#[tokio::test]
#[ignore] // Requires browser installation
async fn full_run_produces_both_stores() {
    let dir = TempDir::new().unwrap();
    let targets = dir.path().join("search_urls.json");
    tokio::fs::write(
        &targets,
        r#"{"urls": ["https://html.duckduckgo.com/html/?q=rust+programming"]}"#,
    )
    .await
    .unwrap();

    let mut pipeline = Pipeline::new(live_config(&dir)).unwrap();
    let report = pipeline.run(&targets, None).await.unwrap();

    assert!(report.targets_processed + report.targets_failed == 1);
    assert!(dir.path().join("collected_links.json").exists());
    assert!(dir.path().join("extracted_content.json").exists());
}

#[tokio::test]
#[ignore] // Requires browser installation
async fn second_run_skips_prior_successes() {
    let dir = TempDir::new().unwrap();
    let targets = dir.path().join("search_urls.json");
    tokio::fs::write(
        &targets,
        r#"["https://html.duckduckgo.com/html/?q=rust+async"]"#,
    )
    .await
    .unwrap();

    let first = Pipeline::new(live_config(&dir))
        .unwrap()
        .run(&targets, None)
        .await
        .unwrap();

    let second = Pipeline::new(live_config(&dir))
        .unwrap()
        .run(&targets, None)
        .await
        .unwrap();

    // Every link the first run extracted successfully is skipped, and the
    // harvest stage discovers nothing it already stored
    assert_eq!(second.extractions_skipped, first.extracted_ok);
    assert_eq!(second.links_discovered, 0);
}

#[tokio::test]
async fn extract_only_requires_a_harvested_link_store() {
    let dir = TempDir::new().unwrap();
    // Pipeline::new probes for a browser; skip quietly on machines without one
    let Ok(mut pipeline) = Pipeline::new(live_config(&dir)) else {
        return;
    };
    assert!(pipeline.extract_only().await.is_err());
}
