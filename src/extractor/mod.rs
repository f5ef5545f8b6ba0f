//! Content extraction over harvested links
//!
//! Visits one harvested link per call and produces exactly one
//! [`ExtractionRecord`]. Extraction never fails upward: timeouts, bot
//! challenges, non-HTML responses, and unexpected errors all fold into the
//! record's status so one bad link can never take down a run.

pub mod classify;
pub mod readability;

use log::debug;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::SessionError;
use crate::session::SessionPool;
use crate::store::{ExtractionRecord, ExtractionStatus, HarvestedLink};
use classify::{classify_response, ResponseVerdict};
use readability::{extract_primary_text, visible_body_text};

/// Content extractor driving sessions from a shared pool
pub struct Extractor {
    pool: Arc<SessionPool>,
    config: PipelineConfig,
}

impl Extractor {
    #[must_use]
    pub fn new(pool: Arc<SessionPool>, config: PipelineConfig) -> Self {
        Self { pool, config }
    }

    /// Extract the primary text of one harvested link
    ///
    /// Always returns a complete record; persistence is the caller's
    /// responsibility so it can checkpoint after each link. Re-running on
    /// the same link is idempotent - the fresh record simply replaces the
    /// prior one.
    pub async fn extract(&self, link: &HarvestedLink) -> ExtractionRecord {
        let started = Instant::now();
        let record = self.extract_inner(link).await;
        info!(
            "Extracted {} -> {} in {:.1}s",
            link.url,
            record.status.as_str(),
            started.elapsed().as_secs_f64()
        );
        record
    }

    async fn extract_inner(&self, link: &HarvestedLink) -> ExtractionRecord {
        let mut guard = match self.pool.acquire().await {
            Ok(guard) => guard,
            Err(e) => {
                warn!("Could not acquire session for {}: {}", link.url, e);
                return ExtractionRecord::failed(
                    &link.url,
                    ExtractionStatus::Error,
                    Some(format!("session acquire failed: {e}")),
                );
            }
        };

        let handle = match guard.navigate(&link.url).await {
            Ok(handle) => handle,
            Err(SessionError::NavigationTimeout { timeout_secs, .. }) => {
                return ExtractionRecord::failed(
                    &link.url,
                    ExtractionStatus::Timeout,
                    Some(format!("navigation exceeded {timeout_secs}s")),
                );
            }
            Err(e) => {
                return ExtractionRecord::failed(
                    &link.url,
                    ExtractionStatus::Error,
                    Some(e.to_string()),
                );
            }
        };

        let html = match handle.page().content().await {
            Ok(html) => html,
            Err(e) => {
                return ExtractionRecord::failed(
                    &link.url,
                    ExtractionStatus::Error,
                    Some(format!("could not read page content: {e}")),
                );
            }
        };

        let body_text = visible_body_text(&html);
        debug!(
            "Fetched {} ({} bytes html, {} chars visible)",
            link.url,
            html.len(),
            body_text.len()
        );

        match classify_response(handle.response(), &body_text, self.config.blocked_markers()) {
            ResponseVerdict::Blocked => {
                let detail = handle
                    .response()
                    .map(|r| format!("HTTP {}", r.status))
                    .unwrap_or_else(|| "challenge markers in body".to_string());
                ExtractionRecord::failed(&link.url, ExtractionStatus::Blocked, Some(detail))
            }
            ResponseVerdict::NonText => {
                let detail = handle
                    .response()
                    .map(|r| format!("content-type {}", r.mime_type))
                    .unwrap_or_default();
                ExtractionRecord::failed(&link.url, ExtractionStatus::NonText, Some(detail))
            }
            ResponseVerdict::Extractable => {
                match extract_primary_text(&html, self.config.min_content_length()) {
                    Some(text) => ExtractionRecord::ok(&link.url, text),
                    None => ExtractionRecord::failed(&link.url, ExtractionStatus::Empty, None),
                }
            }
        }
    }
}
