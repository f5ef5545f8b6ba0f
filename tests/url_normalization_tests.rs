//! Normalization rules that cross-run dedup depends on

use linkharvest::urlnorm::normalize_candidate;
use url::Url;

fn search_base() -> Url {
    Url::parse("https://www.google.com/search?q=contract+law").unwrap()
}

#[test]
fn identical_links_normalize_identically_across_targets() {
    // The same article decorated differently by two result pages
    let a = normalize_candidate(
        "https://blog.example/post?id=9&utm_source=google&ved=2ahUKE",
        &search_base(),
    )
    .unwrap();
    let b = normalize_candidate(
        "/url?q=https://blog.example/post%3Fid%3D9&sa=U&usg=AOvVaw",
        &search_base(),
    )
    .unwrap();
    assert_eq!(a, b);
}

#[test]
fn scheme_and_host_are_lowercased() {
    let out = normalize_candidate("HTTPS://Blog.Example/Post", &search_base()).unwrap();
    assert!(out.starts_with("https://blog.example/"));
    // Path case is significant and preserved
    assert!(out.ends_with("/Post"));
}

#[test]
fn fragments_never_reach_the_store() {
    let out = normalize_candidate("https://blog.example/post#comments", &search_base()).unwrap();
    assert_eq!(out, "https://blog.example/post");
}

#[test]
fn content_bearing_query_params_survive() {
    let out = normalize_candidate(
        "https://forum.example/thread?id=42&page=2&utm_medium=cpc",
        &search_base(),
    )
    .unwrap();
    assert_eq!(out, "https://forum.example/thread?id=42&page=2");
}

#[test]
fn search_engine_chrome_is_filtered() {
    for href in [
        "https://www.google.com/advanced_search",
        "https://accounts.google.com/signin",
        "https://duckduckgo.com/settings",
        "#",
        "javascript:history.back()",
        "mailto:webmaster@example.com",
    ] {
        assert!(
            normalize_candidate(href, &search_base()).is_none(),
            "{href} should have been rejected"
        );
    }
}
