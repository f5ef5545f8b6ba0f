//! Tests for the type-safe configuration builder pattern

use linkharvest::config::PipelineConfig;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn builder_requires_data_dir() {
    // This should not compile if uncommented - testing compile-time guarantees
    // let config = PipelineConfig::builder().build();

    // This SHOULD compile - the required field is provided
    let temp_dir = TempDir::new().unwrap();
    let config = PipelineConfig::builder()
        .data_dir(temp_dir.path().to_path_buf())
        .build();

    assert_eq!(config.data_dir(), temp_dir.path());
}

#[test]
fn builder_optional_fields_have_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = PipelineConfig::builder()
        .data_dir(temp_dir.path().to_path_buf())
        .build();

    assert_eq!(config.max_pages(), 10);
    assert_eq!(config.navigation_timeout(), Duration::from_secs(30));
    assert_eq!(config.max_sessions(), 1);
    assert_eq!(config.min_content_length(), 50);
    assert!(config.headless());
    assert!(config.exclude_patterns().is_empty());
    assert!(!config.blocked_markers().is_empty());
}

#[test]
fn builder_with_all_optional_fields() {
    let temp_dir = TempDir::new().unwrap();
    let config = PipelineConfig::builder()
        .data_dir(temp_dir.path().to_path_buf())
        .max_pages(3)
        .navigation_timeout(Duration::from_millis(5000))
        .max_sessions(4)
        .min_content_length(100)
        .headless(false)
        .exclude_patterns(vec!["youtube.com".into(), ".pdf".into()])
        .request_delay(Duration::from_millis(250))
        .max_session_uses(8)
        .build();

    assert_eq!(config.max_pages(), 3);
    assert_eq!(config.navigation_timeout(), Duration::from_millis(5000));
    assert_eq!(config.max_sessions(), 4);
    assert_eq!(config.min_content_length(), 100);
    assert!(!config.headless());
    assert_eq!(config.exclude_patterns().len(), 2);
    assert_eq!(config.request_delay(), Duration::from_millis(250));
    assert_eq!(config.max_session_uses(), 8);
}

#[test]
fn zero_valued_knobs_are_clamped_to_usable_minimums() {
    let temp_dir = TempDir::new().unwrap();
    let config = PipelineConfig::builder()
        .data_dir(temp_dir.path().to_path_buf())
        .max_pages(0)
        .max_sessions(0)
        .max_session_uses(0)
        .build();

    assert_eq!(config.max_pages(), 1);
    assert_eq!(config.max_sessions(), 1);
    assert_eq!(config.max_session_uses(), 1);
}

#[test]
fn store_paths_live_under_data_dir() {
    let temp_dir = TempDir::new().unwrap();
    let config = PipelineConfig::builder()
        .data_dir(temp_dir.path().to_path_buf())
        .build();

    assert_eq!(
        config.links_path(),
        temp_dir.path().join("collected_links.json")
    );
    assert_eq!(
        config.content_path(),
        temp_dir.path().join("extracted_content.json")
    );
}
