//! Search-target and exclude-pattern input files
//!
//! Both inputs are JSON and accept two shapes: a bare array of strings, or
//! an object wrapping the array (`{"urls": [...]}` / `{"patterns": [...]}`).
//! Anything else is a configuration error.

use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{PipelineError, PipelineResult};

/// One input search-result page URL, immutable for the whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    url: String,
}

impl SearchTarget {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UrlsFile {
    Bare(Vec<String>),
    Wrapped { urls: Vec<String> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternsFile {
    Bare(Vec<String>),
    Wrapped { patterns: Vec<String> },
}

fn clean(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Load search targets from a JSON file
///
/// Accepts `["url", ...]` or `{"urls": ["url", ...]}`. Entries are trimmed
/// and empties dropped. An empty result is a `Config` error: a run with no
/// targets cannot start.
pub async fn load_search_targets(path: &Path) -> PipelineResult<Vec<SearchTarget>> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        PipelineError::Config(format!("cannot read targets file {}: {e}", path.display()))
    })?;

    let parsed: UrlsFile = serde_json::from_str(&raw).map_err(|e| {
        PipelineError::Config(format!(
            "targets file {} must be a JSON array of URLs or {{\"urls\": [...]}}: {e}",
            path.display()
        ))
    })?;

    let urls = clean(match parsed {
        UrlsFile::Bare(urls) | UrlsFile::Wrapped { urls } => urls,
    });

    if urls.is_empty() {
        return Err(PipelineError::Config(format!(
            "no usable search URLs in {}",
            path.display()
        )));
    }

    info!("Loaded {} search targets from {}", urls.len(), path.display());
    Ok(urls.into_iter().map(SearchTarget::new).collect())
}

/// Load exclude patterns from a JSON file
///
/// Accepts `["pattern", ...]` or `{"patterns": ["pattern", ...]}`. Patterns
/// are plain substrings matched against normalized candidate URLs.
///
/// A missing file is not an error; exclusion is optional and the harvest
/// proceeds unfiltered. A file that exists but does not parse is a `Config`
/// error.
pub async fn load_exclude_patterns(path: &Path) -> PipelineResult<Vec<String>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Exclude-pattern file {} not found, continuing without exclusions",
                path.display()
            );
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(PipelineError::Config(format!(
                "cannot read exclude-pattern file {}: {e}",
                path.display()
            )));
        }
    };

    let parsed: PatternsFile = serde_json::from_str(&raw).map_err(|e| {
        PipelineError::Config(format!(
            "exclude-pattern file {} must be a JSON array or {{\"patterns\": [...]}}: {e}",
            path.display()
        ))
    })?;

    let patterns = clean(match parsed {
        PatternsFile::Bare(patterns) | PatternsFile::Wrapped { patterns } => patterns,
    });

    if !patterns.is_empty() {
        info!(
            "Loaded {} exclude patterns from {}",
            patterns.len(),
            path.display()
        );
    }
    Ok(patterns)
}
