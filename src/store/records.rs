//! Persisted record types for the link and content stores
//!
//! Field names are serialized in the camelCase wire format the stores have
//! always used on disk; keep `#[serde(rename)]` attributes in sync with any
//! external consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One link discovered on a search-result page
///
/// Never mutated after creation. If the same URL surfaces under a second
/// search target, the first discovery wins and keeps its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestedLink {
    /// Normalized URL; unique key across the whole link store
    pub url: String,

    /// The search target that first produced this link
    #[serde(rename = "sourceSearchUrl")]
    pub source_search_url: String,

    /// When the link was first discovered
    #[serde(rename = "discoveredAt")]
    pub discovered_at: DateTime<Utc>,

    /// Position within the result page, 0-based in document order
    pub rank: usize,
}

/// Outcome classification for one extraction attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// Primary text extracted successfully
    Ok,
    /// Anti-bot challenge or access-denied response
    Blocked,
    /// Page did not load within the navigation budget
    Timeout,
    /// Response was not an HTML-derived document
    NonText,
    /// Page loaded but yielded no text above the minimum length
    Empty,
    /// Unexpected failure; see `error_detail`
    Error,
}

impl ExtractionStatus {
    /// Human-readable label matching the serialized form
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Blocked => "blocked",
            Self::Timeout => "timeout",
            Self::NonText => "non_text",
            Self::Empty => "empty",
            Self::Error => "error",
        }
    }
}

/// Result of extracting one harvested link
///
/// Invariant: `content` is present exactly when `status` is [`ExtractionStatus::Ok`].
/// Records are built whole and replace any prior record for the same URL
/// atomically; there is no partially-written state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// The harvested link this record belongs to; unique per store
    pub url: String,

    /// Outcome classification
    pub status: ExtractionStatus,

    /// Extracted text when `status == ok`, otherwise null
    pub content: Option<String>,

    /// When this extraction attempt finished
    #[serde(rename = "extractedAt")]
    pub extracted_at: DateTime<Utc>,

    /// Short diagnostic for failed attempts, otherwise null
    #[serde(rename = "errorDetail")]
    pub error_detail: Option<String>,
}

impl ExtractionRecord {
    /// Build a successful record
    #[must_use]
    pub fn ok(url: impl Into<String>, content: String) -> Self {
        Self {
            url: url.into(),
            status: ExtractionStatus::Ok,
            content: Some(content),
            extracted_at: Utc::now(),
            error_detail: None,
        }
    }

    /// Build a failed record with the given classification
    #[must_use]
    pub fn failed(
        url: impl Into<String>,
        status: ExtractionStatus,
        error_detail: Option<String>,
    ) -> Self {
        debug_assert!(status != ExtractionStatus::Ok);
        Self {
            url: url.into(),
            status,
            content: None,
            extracted_at: Utc::now(),
            error_detail,
        }
    }

    /// Whether this record represents a stored success
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == ExtractionStatus::Ok
    }
}
