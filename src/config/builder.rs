//! Type-safe builder for `PipelineConfig` using the typestate pattern
//!
//! The data directory is the one required field; the builder will not
//! produce a config without it. All other knobs carry the documented
//! defaults.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;

use super::types::{default_blocked_markers, PipelineConfig};
use crate::utils::constants::{
    CHROME_USER_AGENT, DEFAULT_MAX_PAGES, DEFAULT_MAX_SESSIONS, DEFAULT_MAX_SESSION_USES,
    DEFAULT_MIN_CONTENT_LENGTH, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_REQUEST_DELAY,
};

// Type states for the builder
pub struct WithDataDir;

pub struct PipelineConfigBuilder<State = ()> {
    pub(crate) data_dir: Option<PathBuf>,
    pub(crate) max_pages: usize,
    pub(crate) navigation_timeout_ms: u64,
    pub(crate) max_sessions: usize,
    pub(crate) min_content_length: usize,
    pub(crate) headless: bool,
    pub(crate) user_agent: String,
    pub(crate) exclude_patterns: Vec<String>,
    pub(crate) request_delay_ms: u64,
    pub(crate) max_session_uses: u32,
    pub(crate) blocked_markers: Vec<String>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for PipelineConfigBuilder<()> {
    fn default() -> Self {
        Self {
            data_dir: None,
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
            _phantom: PhantomData,
        }
    }
}

impl PipelineConfig {
    /// Create a builder for configuring a `PipelineConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder<()> {
        PipelineConfigBuilder::default()
    }
}

impl PipelineConfigBuilder<()> {
    pub fn data_dir(self, dir: impl Into<PathBuf>) -> PipelineConfigBuilder<WithDataDir> {
        PipelineConfigBuilder {
            data_dir: Some(dir.into()),
            max_pages: self.max_pages,
            navigation_timeout_ms: self.navigation_timeout_ms,
            max_sessions: self.max_sessions,
            min_content_length: self.min_content_length,
            headless: self.headless,
            user_agent: self.user_agent,
            exclude_patterns: self.exclude_patterns,
            request_delay_ms: self.request_delay_ms,
            max_session_uses: self.max_session_uses,
            blocked_markers: self.blocked_markers,
            _phantom: PhantomData,
        }
    }
}

// Knob setters available at any state
impl<State> PipelineConfigBuilder<State> {
    /// Maximum result pages to walk per search target
    #[must_use]
    pub fn max_pages(mut self, pages: usize) -> Self {
        self.max_pages = pages.max(1);
        self
    }

    /// Budget for each navigation, including the load-state wait
    #[must_use]
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Size of the browser session pool
    #[must_use]
    pub fn max_sessions(mut self, sessions: usize) -> Self {
        self.max_sessions = sessions.max(1);
        self
    }

    /// Extracted text shorter than this is recorded as `empty`
    #[must_use]
    pub fn min_content_length(mut self, length: usize) -> Self {
        self.min_content_length = length;
        self
    }

    /// Run browsers without a visible window
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// User agent presented by every session
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// Substring patterns; matching candidate URLs never enter the link store
    #[must_use]
    pub fn exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Base inter-request delay (jitter is added on top)
    #[must_use]
    pub fn request_delay(mut self, delay: Duration) -> Self {
        self.request_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Navigations served by one browser before it is recycled
    #[must_use]
    pub fn max_session_uses(mut self, uses: u32) -> Self {
        self.max_session_uses = uses.max(1);
        self
    }

    /// Replace the challenge-page marker table
    #[must_use]
    pub fn blocked_markers(mut self, markers: Vec<String>) -> Self {
        self.blocked_markers = markers;
        self
    }
}

// Build method only available once the data directory is set
impl PipelineConfigBuilder<WithDataDir> {
    #[must_use]
    pub fn build(self) -> PipelineConfig {
        PipelineConfig {
            data_dir: self
                .data_dir
                .expect("typestate guarantees data_dir is set"),
            max_pages: self.max_pages,
            navigation_timeout_ms: self.navigation_timeout_ms,
            max_sessions: self.max_sessions,
            min_content_length: self.min_content_length,
            headless: self.headless,
            user_agent: self.user_agent,
            exclude_patterns: self.exclude_patterns,
            request_delay_ms: self.request_delay_ms,
            max_session_uses: self.max_session_uses,
            blocked_markers: self.blocked_markers,
        }
    }
}
