//! Browser session pool
//!
//! Owns every browser the pipeline uses. Sessions are acquired through an
//! RAII guard that returns them to the pool on drop, health-checked before
//! reuse, and disposed after a configured number of navigations.
//!
//! Pool size is the pipeline's sole concurrency control; the default of one
//! session keeps request pacing well under anti-bot rate defenses.

use anyhow::Result;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::network::{EventResponseReceived, ResourceType};
use chromiumoxide::page::Page;
use futures::StreamExt;
use rand::Rng;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser_setup::{apply_stealth_overrides, launch_browser};
use crate::error::SessionError;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the session pool
#[derive(Debug, Clone)]
pub struct SessionPoolConfig {
    /// Run browsers in headless mode (default: true)
    pub headless: bool,
    /// Budget for each navigation including the load-state wait
    pub navigation_timeout: Duration,
    /// User agent presented by every session
    pub user_agent: String,
    /// Maximum concurrent sessions (default: 1)
    pub max_sessions: usize,
    /// Dispose a session after this many navigations
    pub max_session_uses: u32,
}

impl Default for SessionPoolConfig {
    fn default() -> Self {
        Self {
            headless: true,
            navigation_timeout: crate::utils::constants::DEFAULT_NAVIGATION_TIMEOUT,
            user_agent: crate::utils::constants::CHROME_USER_AGENT.to_string(),
            max_sessions: crate::utils::constants::DEFAULT_MAX_SESSIONS,
            max_session_uses: crate::utils::constants::DEFAULT_MAX_SESSION_USES,
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// One browser automation context, used to load one page at a time
#[derive(Debug)]
pub struct Session {
    /// Unique identifier for this session
    pub id: u64,
    browser: Browser,
    handler: JoinHandle<()>,
    profile_dir: Option<PathBuf>,
    uses: u32,
    navigation_timeout: Duration,
}

impl Session {
    /// Navigate to a URL and wait for a stable load state
    ///
    /// Returns a [`PageHandle`] guarding the loaded page. Both the `goto`
    /// and the subsequent load-state wait share the navigation timeout; a
    /// page that never settles is closed and reported as
    /// [`SessionError::NavigationTimeout`].
    ///
    /// The handle carries the main document's HTTP status and MIME type
    /// when the CDP response event could be observed; redirects are
    /// followed, so the captured response is the last document response of
    /// the navigation.
    pub async fn navigate(&mut self, url: &str) -> Result<PageHandle, SessionError> {
        self.uses += 1;

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| classify_cdp_error(url, &e.to_string()))?;

        if let Err(e) = apply_stealth_overrides(&page).await {
            warn!("Stealth override injection failed for {url}: {e}");
        }

        // Listener must exist before goto or the document response is lost
        let mut response_events = match page.event_listener::<EventResponseReceived>().await {
            Ok(events) => Some(events),
            Err(e) => {
                debug!("Could not attach response listener for {url}: {e}");
                None
            }
        };

        let mut handle = PageHandle::new(page, url.to_string());
        let timeout_secs = self.navigation_timeout.as_secs();

        // Page clones share the same CDP target, so the navigation future
        // can own one without borrowing the handle
        let nav_page = handle.page().clone();
        let navigation = async move {
            nav_page
                .goto(url)
                .await
                .map_err(|e| classify_cdp_error(url, &e.to_string()))?;
            nav_page
                .wait_for_navigation()
                .await
                .map_err(|e| classify_cdp_error(url, &e.to_string()))?;
            Ok::<(), SessionError>(())
        };
        let nav_result = tokio::time::timeout(self.navigation_timeout, navigation).await;

        match nav_result {
            Ok(Ok(())) => {
                if let Some(events) = response_events.as_mut() {
                    handle.response = last_document_response(events).await;
                }
                Ok(handle)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(SessionError::NavigationTimeout {
                url: url.to_string(),
                timeout_secs,
            }),
        }
    }

    /// Whether this session has served its navigation budget
    fn expired(&self, max_uses: u32) -> bool {
        self.uses >= max_uses
    }

    /// Close the browser and remove its profile directory
    async fn dispose(mut self) {
        debug!("Disposing session {}", self.id);
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser for session {}: {}", self.id, e);
        }
        let _ = self.browser.wait().await;
        self.handler.abort();
        if let Some(dir) = self.profile_dir.take()
            && let Err(e) = tokio::fs::remove_dir_all(&dir).await
        {
            warn!(
                "Failed to remove profile directory {}: {}",
                dir.display(),
                e
            );
        }
    }
}

/// Map a CDP error string onto the session error taxonomy
///
/// Connection-level failures poison the session; everything else is a
/// recoverable per-navigation failure.
fn classify_cdp_error(url: &str, error_str: &str) -> SessionError {
    let lowered = error_str.to_lowercase();
    if lowered.contains("browser closed")
        || lowered.contains("browser disconnected")
        || lowered.contains("target closed")
        || lowered.contains("session not found")
        || lowered.contains("session closed")
        || lowered.contains("no response from the chromium instance")
        || lowered.contains("websocket")
        || lowered.contains("channel")
    {
        SessionError::BrowserGone(error_str.to_string())
    } else {
        SessionError::NavigationFailed {
            url: url.to_string(),
            detail: error_str.to_string(),
        }
    }
}

/// Scan buffered response events for the navigation's document response
///
/// Events were emitted while the navigation ran; this only drains what is
/// already buffered, with a short grace period. The last `Document`
/// response wins so redirect chains resolve to the final page.
async fn last_document_response(
    events: &mut chromiumoxide::listeners::EventStream<EventResponseReceived>,
) -> Option<PageResponse> {
    let mut last = None;
    let drain = async {
        while let Some(event) = events.next().await {
            if matches!(event.r#type, ResourceType::Document) {
                last = Some(PageResponse {
                    status: event.response.status,
                    mime_type: event.response.mime_type.clone(),
                });
            }
        }
    };
    let _ = tokio::time::timeout(Duration::from_millis(500), drain).await;
    last
}

// =============================================================================
// Page handle
// =============================================================================

/// HTTP status and MIME type of a navigation's main document response
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: i64,
    pub mime_type: String,
}

/// Guard ensuring `page.close()` runs on every exit path
///
/// Dropping the handle spawns an async close; leaked CDP targets otherwise
/// accumulate in the browser until it is recycled.
pub struct PageHandle {
    page: Option<Page>,
    url: String,
    response: Option<PageResponse>,
}

impl PageHandle {
    fn new(page: Page, url: String) -> Self {
        Self {
            page: Some(page),
            url,
            response: None,
        }
    }

    /// Access the underlying page
    #[must_use]
    pub fn page(&self) -> &Page {
        self.page.as_ref().expect("page present until drop")
    }

    /// The main document response, when the CDP event was observed
    #[must_use]
    pub fn response(&self) -> Option<&PageResponse> {
        self.response.as_ref()
    }
}

impl Drop for PageHandle {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            let url = std::mem::take(&mut self.url);
            tokio::spawn(async move {
                if let Err(e) = page.close().await {
                    debug!("Failed to close page for {url}: {e}");
                }
            });
        }
    }
}

// =============================================================================
// Session pool
// =============================================================================

/// Bounded pool of browser sessions
#[derive(Debug)]
pub struct SessionPool {
    config: SessionPoolConfig,
    /// Available (ready) sessions
    available: Mutex<VecDeque<Session>>,
    /// Count of sessions currently checked out
    in_use_count: AtomicUsize,
    /// Counter for unique session IDs
    next_id: AtomicU64,
    /// Shutdown signal
    shutdown: AtomicBool,
}

impl SessionPool {
    /// Create a new pool; no browser is launched until first acquire
    pub fn new(config: SessionPoolConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            available: Mutex::new(VecDeque::new()),
            in_use_count: AtomicUsize::new(0),
            next_id: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Acquire a session from the pool
    ///
    /// Returns a guard that releases the session when dropped. Pooled
    /// sessions are health-checked via `browser.version()` before handout;
    /// an unresponsive one is dropped and replaced. When the pool is at
    /// capacity the call waits for a release.
    pub async fn acquire(self: &Arc<Self>) -> Result<SessionGuard, SessionError> {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                return Err(SessionError::BrowserGone("session pool shut down".into()));
            }

            let candidate = self.available.lock().await.pop_front();
            if let Some(session) = candidate {
                match session.browser.version().await {
                    Ok(_) => {
                        self.in_use_count.fetch_add(1, Ordering::Relaxed);
                        debug!("Acquired session {} from pool", session.id);
                        return Ok(SessionGuard {
                            session: Some(session),
                            pool: Arc::clone(self),
                        });
                    }
                    Err(e) => {
                        warn!(
                            "Session {} failed health check during acquire: {}",
                            session.id, e
                        );
                        session.dispose().await;
                        continue;
                    }
                }
            }

            // No pooled session - launch a new one if under the cap
            let total =
                self.in_use_count.load(Ordering::Relaxed) + self.available.lock().await.len();
            if total < self.config.max_sessions {
                let session = self.launch_session().await?;
                self.in_use_count.fetch_add(1, Ordering::Relaxed);
                debug!("Launched session {} (pool was empty)", session.id);
                return Ok(SessionGuard {
                    session: Some(session),
                    pool: Arc::clone(self),
                });
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Gracefully shut down the pool, disposing every idle session
    pub async fn shutdown(&self) {
        info!("Shutting down session pool");
        self.shutdown.store(true, Ordering::Relaxed);

        let mut available = self.available.lock().await;
        while let Some(session) = available.pop_front() {
            session.dispose().await;
        }
        info!("Session pool shutdown complete");
    }

    async fn launch_session(&self) -> Result<Session, SessionError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (browser, handler, profile_dir) = launch_browser(
            self.config.headless,
            &self.config.user_agent,
            self.config.navigation_timeout,
        )
        .await
        .map_err(|e| SessionError::BrowserGone(format!("{e:#}")))?;

        Ok(Session {
            id,
            browser,
            handler,
            profile_dir: Some(profile_dir),
            uses: 0,
            navigation_timeout: self.config.navigation_timeout,
        })
    }
}

// =============================================================================
// RAII guard
// =============================================================================

/// RAII guard that returns its session to the pool on drop
pub struct SessionGuard {
    session: Option<Session>,
    pool: Arc<SessionPool>,
}

impl SessionGuard {
    /// Navigate with this guard's session
    pub async fn navigate(&mut self, url: &str) -> Result<PageHandle, SessionError> {
        let session = self.session.as_mut().expect("session present until drop");
        match session.navigate(url).await {
            Ok(handle) => Ok(handle),
            Err(e) => {
                // A dead browser must not be re-pooled
                if e.poisons_session()
                    && let Some(poisoned) = self.session.take()
                {
                    self.pool.in_use_count.fetch_sub(1, Ordering::Relaxed);
                    tokio::spawn(poisoned.dispose());
                }
                Err(e)
            }
        }
    }

    /// The session's unique pool ID
    #[must_use]
    pub fn id(&self) -> u64 {
        self.session.as_ref().expect("session present until drop").id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            let pool = Arc::clone(&self.pool);
            pool.in_use_count.fetch_sub(1, Ordering::Relaxed);

            if session.expired(pool.config.max_session_uses)
                || pool.shutdown.load(Ordering::Relaxed)
            {
                debug!(
                    "Session {} expired after {} uses, disposing",
                    session.id, session.uses
                );
                tokio::spawn(session.dispose());
                return;
            }

            let id = session.id;
            tokio::spawn(async move {
                pool.available.lock().await.push_back(session);
                debug!("Released session {id} back to pool");
            });
        }
    }
}

// =============================================================================
// Request pacing
// =============================================================================

/// Sleep for the base delay plus uniform jitter (up to +50%)
///
/// Fixed inter-request intervals are themselves a bot signature.
pub async fn pace_request(base: Duration) {
    if base.is_zero() {
        return;
    }
    let extra_ms = rand::rng().random_range(0..=base.as_millis() as u64 / 2);
    tokio::time::sleep(base + Duration::from_millis(extra_ms)).await;
}
