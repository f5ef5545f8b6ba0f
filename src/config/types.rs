//! Core configuration types for the harvesting pipeline
//!
//! This module contains the main `PipelineConfig` struct that defines the
//! configuration parameters for harvest and extraction runs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::constants::{
    CHROME_USER_AGENT, DEFAULT_MAX_PAGES, DEFAULT_MAX_SESSIONS, DEFAULT_MAX_SESSION_USES,
    DEFAULT_MIN_CONTENT_LENGTH, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_REQUEST_DELAY,
};

/// File name of the persisted link store inside `data_dir`
pub const LINKS_FILE: &str = "collected_links.json";

/// File name of the persisted content store inside `data_dir`
pub const CONTENT_FILE: &str = "extracted_content.json";

/// Default challenge-page text markers
///
/// Matched as lowercase substrings of the rendered body text. This is a
/// tunable policy table, not a fixed algorithm: sites invent new challenge
/// pages faster than any hardcoded list can track.
pub fn default_blocked_markers() -> Vec<String> {
    [
        "captcha",
        "unusual traffic",
        "our systems have detected",
        "access denied",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Main configuration struct for pipeline runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the persisted link and content stores.
    ///
    /// **INVARIANT:** set via the builder; created on first store write.
    pub(crate) data_dir: PathBuf,

    /// Maximum result pages to walk per search target
    pub(crate) max_pages: usize,

    /// Budget for each `goto` + load-state wait, in milliseconds
    pub(crate) navigation_timeout_ms: u64,

    /// Size of the browser session pool
    pub(crate) max_sessions: usize,

    /// Extracted text shorter than this is recorded as `empty`
    pub(crate) min_content_length: usize,

    /// Run browsers without a visible window
    pub(crate) headless: bool,

    /// User agent presented by every session
    pub(crate) user_agent: String,

    /// Substring patterns; matching candidate URLs never enter the link store
    pub(crate) exclude_patterns: Vec<String>,

    /// Base inter-request delay in milliseconds (jitter is added on top)
    pub(crate) request_delay_ms: u64,

    /// Navigations served by one browser before it is recycled
    pub(crate) max_session_uses: u32,

    /// Challenge-page text markers for blocked-response classification
    pub(crate) blocked_markers: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            max_pages: DEFAULT_MAX_PAGES,
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT.as_millis() as u64,
            max_sessions: DEFAULT_MAX_SESSIONS,
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
            headless: true,
            user_agent: CHROME_USER_AGENT.to_string(),
            exclude_patterns: Vec::new(),
            request_delay_ms: DEFAULT_REQUEST_DELAY.as_millis() as u64,
            max_session_uses: DEFAULT_MAX_SESSION_USES,
            blocked_markers: default_blocked_markers(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the persisted link store
    #[must_use]
    pub fn links_path(&self) -> PathBuf {
        self.data_dir.join(LINKS_FILE)
    }

    /// Path of the persisted content store
    #[must_use]
    pub fn content_path(&self) -> PathBuf {
        self.data_dir.join(CONTENT_FILE)
    }

    #[must_use]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    #[must_use]
    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    #[must_use]
    pub fn min_content_length(&self) -> usize {
        self.min_content_length
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    #[must_use]
    pub fn max_session_uses(&self) -> u32 {
        self.max_session_uses
    }

    #[must_use]
    pub fn blocked_markers(&self) -> &[String] {
        &self.blocked_markers
    }
}
