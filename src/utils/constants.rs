//! Shared configuration constants for linkharvest
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

use std::time::Duration;

/// Chrome user agent string for stealth mode
///
/// Updated: 2025-11-03 to Chrome 142 (current stable)
/// Next update: 2026-02-03 (quarterly schedule)
///
/// Chrome releases new stable versions ~every 4 weeks.
/// Update quarterly to stay within reasonable version window.
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.7234.111 Safari/537.36";

/// Default page navigation timeout: 30 seconds
///
/// Bounds every `goto` + load-state wait. Slow DNS, unresponsive servers,
/// and streaming responses all surface as a `NavigationTimeout` rather than
/// hanging the pipeline.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of result pages to walk per search target
pub const DEFAULT_MAX_PAGES: usize = 10;

/// Default concurrent browser sessions: 1
///
/// Deliberately conservative. Search engines rate-defend aggressively and a
/// single session paced with jitter is the least detectable posture. Raise
/// only when harvesting sources known to tolerate parallel traffic.
pub const DEFAULT_MAX_SESSIONS: usize = 1;

/// Navigations served by one browser before it is disposed and relaunched
///
/// Long-lived Chromium processes grow resident memory and accumulate
/// fingerprintable state. Recycling is a policy knob, not a correctness
/// requirement.
pub const DEFAULT_MAX_SESSION_USES: u32 = 32;

/// Minimum extracted-text length before a page counts as having content
///
/// Pages under this many characters after whitespace collapsing are recorded
/// as `empty`.
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 50;

/// Base delay between consecutive page requests
///
/// Actual delays add uniform random jitter on top of this base so request
/// timing does not form a detectable rhythm.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1000);

/// Search engines paginate in strides of 10 results (`start` parameter)
pub const RESULTS_PER_PAGE: usize = 10;

/// Maximum time to wait for the result container to render
///
/// Result pages render via JavaScript after the HTTP response arrives; the
/// harvester polls the DOM up to this long before treating the page as
/// having zero results.
pub const RESULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Interval between DOM polls while waiting for results
pub const RESULT_POLL_INTERVAL: Duration = Duration::from_millis(200);
