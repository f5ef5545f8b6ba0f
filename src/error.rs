//! Error types for the harvesting pipeline
//!
//! Only two failure classes are allowed to terminate a run: configuration
//! errors and browser-launch failures. Everything else is recovered locally
//! and recorded in the run report or the content store.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Fatal errors that abort a run before (or instead of) browser work
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input file missing, unreadable, or of an unrecognized shape
    #[error("Configuration error: {0}")]
    Config(String),

    /// The browser engine could not be started at all
    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    /// Store file could not be read or written
    #[error("Store I/O failed for {path}: {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file exists but does not parse as the expected JSON shape
    #[error("Store file {path} is corrupt: {detail}")]
    StoreCorrupt { path: PathBuf, detail: String },

    /// Run was stopped via the cooperative stop signal
    #[error("Pipeline run was cancelled")]
    Cancelled,
}

/// Per-navigation errors, recovered at the target/link granularity
///
/// These never unwind into the orchestrator; the harvester converts them to
/// recorded per-target failures and the extractor folds them into
/// `ExtractionRecord` statuses.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Page did not reach a stable load state within the budget
    #[error("Navigation to {url} timed out after {timeout_secs}s")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    /// The browser process died or the CDP connection dropped
    #[error("Browser session lost: {0}")]
    BrowserGone(String),

    /// Any other CDP-level failure during navigation
    #[error("Navigation to {url} failed: {detail}")]
    NavigationFailed { url: String, detail: String },
}

impl SessionError {
    /// Whether the owning session should be discarded rather than reused
    ///
    /// Timeouts leave the browser usable; a lost session does not.
    #[must_use]
    pub fn poisons_session(&self) -> bool {
        matches!(self, Self::BrowserGone(_))
    }
}
