//! Link store and content store behavior: dedup, atomic replacement,
//! persistence round-trips, and the resumability contract.

use chrono::Utc;
use linkharvest::store::{
    ContentStore, ExtractionRecord, ExtractionStatus, HarvestedLink, LinkStore,
};
use tempfile::TempDir;

fn link(url: &str, source: &str, rank: usize) -> HarvestedLink {
    HarvestedLink {
        url: url.to_string(),
        source_search_url: source.to_string(),
        discovered_at: Utc::now(),
        rank,
    }
}

#[tokio::test]
async fn link_store_keeps_first_discovery_per_url() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("collected_links.json");
    let mut store = LinkStore::load(&path).await.unwrap();

    assert!(store.insert(link("https://a.example/1", "https://search/one", 0)));
    assert!(store.insert(link("https://a.example/2", "https://search/one", 1)));
    // Same URL from a different target: first discovery wins
    assert!(!store.insert(link("https://a.example/1", "https://search/two", 0)));

    assert_eq!(store.len(), 2);
    assert_eq!(store.links()[0].source_search_url, "https://search/one");
}

#[tokio::test]
async fn link_store_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("collected_links.json");

    {
        let mut store = LinkStore::load(&path).await.unwrap();
        store.insert(link("https://a.example/1", "https://search/one", 0));
        store.insert(link("https://b.example/post", "https://search/two", 3));
        store.save().await.unwrap();
    }

    let reloaded = LinkStore::load(&path).await.unwrap();
    assert_eq!(reloaded.len(), 2);
    assert!(reloaded.contains("https://a.example/1"));
    assert!(reloaded.contains("https://b.example/post"));
    assert_eq!(reloaded.links()[1].rank, 3);
}

#[tokio::test]
async fn link_store_serializes_expected_field_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("collected_links.json");

    let mut store = LinkStore::load(&path).await.unwrap();
    store.insert(link("https://a.example/1", "https://search/one", 0));
    store.save().await.unwrap();

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &parsed.as_array().unwrap()[0];
    assert!(first.get("url").is_some());
    assert!(first.get("sourceSearchUrl").is_some());
    assert!(first.get("discoveredAt").is_some());
    assert!(first.get("rank").is_some());
}

#[tokio::test]
async fn missing_store_files_load_empty() {
    let dir = TempDir::new().unwrap();
    let links = LinkStore::load(&dir.path().join("nope.json")).await.unwrap();
    assert!(links.is_empty());
    let content = ContentStore::load(&dir.path().join("nope.json"))
        .await
        .unwrap();
    assert!(content.is_empty());
}

#[tokio::test]
async fn corrupt_store_file_is_an_error_not_a_reset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("collected_links.json");
    tokio::fs::write(&path, "{not json").await.unwrap();

    assert!(LinkStore::load(&path).await.is_err());
}

#[tokio::test]
async fn content_store_replaces_records_atomically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extracted_content.json");
    let mut store = ContentStore::load(&path).await.unwrap();

    store.upsert(ExtractionRecord::failed(
        "https://a.example/1",
        ExtractionStatus::Timeout,
        Some("navigation exceeded 30s".into()),
    ));
    assert!(!store.has_ok("https://a.example/1"));

    // Idempotent retry: the new record wholly replaces the old one
    store.upsert(ExtractionRecord::ok(
        "https://a.example/1",
        "recovered article text".into(),
    ));
    assert_eq!(store.len(), 1);
    assert!(store.has_ok("https://a.example/1"));

    let record = store.get("https://a.example/1").unwrap();
    assert_eq!(record.status, ExtractionStatus::Ok);
    assert_eq!(record.content.as_deref(), Some("recovered article text"));
    assert!(record.error_detail.is_none());
}

#[tokio::test]
async fn content_is_present_exactly_when_status_is_ok() {
    let ok = ExtractionRecord::ok("https://a.example/1", "text".into());
    assert!(ok.content.is_some());

    for status in [
        ExtractionStatus::Blocked,
        ExtractionStatus::Timeout,
        ExtractionStatus::NonText,
        ExtractionStatus::Empty,
        ExtractionStatus::Error,
    ] {
        let record = ExtractionRecord::failed("https://a.example/1", status, None);
        assert!(record.content.is_none(), "{status:?} must carry no content");
    }
}

#[tokio::test]
async fn content_store_serializes_status_in_snake_case() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extracted_content.json");

    let mut store = ContentStore::load(&path).await.unwrap();
    store.upsert(ExtractionRecord::failed(
        "https://a.example/pdf",
        ExtractionStatus::NonText,
        Some("content-type application/pdf".into()),
    ));
    store.save().await.unwrap();

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &parsed.as_array().unwrap()[0];
    assert_eq!(first["status"], "non_text");
    assert!(first["content"].is_null());
    assert!(first.get("extractedAt").is_some());
    assert!(first.get("errorDetail").is_some());
}

#[tokio::test]
async fn blocked_response_record_matches_pipeline_contract() {
    // A 403 on a harvested link yields a blocked record with null content
    let record = ExtractionRecord::failed(
        "https://a.example/1",
        ExtractionStatus::Blocked,
        Some("HTTP 403".into()),
    );
    assert_eq!(record.url, "https://a.example/1");
    assert_eq!(record.status, ExtractionStatus::Blocked);
    assert!(record.content.is_none());
}
