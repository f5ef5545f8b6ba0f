//! Link harvesting over search-result pages
//!
//! Given one search target, the harvester drives a browser session through
//! the target's result pages in strict page order, extracts candidate
//! anchors, normalizes them, and emits deduplicated [`HarvestedLink`]s.
//! Pagination ends at the configured page cap, at the first page that
//! yields nothing new, or at the first navigation failure - whichever comes
//! first.

pub mod js_scripts;

use chromiumoxide::page::Page;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::PipelineConfig;
use crate::error::SessionError;
use crate::session::{pace_request, SessionPool};
use crate::store::HarvestedLink;
use crate::targets::SearchTarget;
use crate::urlnorm::normalize_candidate;
use crate::utils::constants::{RESULTS_PER_PAGE, RESULT_POLL_INTERVAL, RESULT_WAIT_TIMEOUT};
use js_scripts::{COLLECT_LINKS_SCRIPT, RESULT_CONTAINER_SELECTOR};

/// Result of harvesting one search target
#[derive(Debug, Default)]
pub struct HarvestOutcome {
    /// Newly discovered links, in discovery order
    pub links: Vec<HarvestedLink>,
    /// Result pages actually visited
    pub pages_visited: usize,
    /// Candidates skipped because they were already known or already
    /// emitted during this harvest
    pub duplicates_skipped: usize,
    /// Candidates skipped by the exclude-pattern table
    pub excluded: usize,
}

/// Link harvester driving sessions from a shared pool
pub struct Harvester {
    pool: Arc<SessionPool>,
    config: PipelineConfig,
}

impl Harvester {
    #[must_use]
    pub fn new(pool: Arc<SessionPool>, config: PipelineConfig) -> Self {
        Self { pool, config }
    }

    /// Harvest every result page of one search target
    ///
    /// `existing` holds the URLs already present in the link store; those
    /// candidates are counted as duplicates rather than re-emitted.
    ///
    /// A navigation failure on the first page is the target failing and is
    /// returned as an error. A failure on any later page just ends
    /// pagination - whatever was collected up to that point stands.
    pub async fn harvest(
        &self,
        target: &SearchTarget,
        existing: &HashSet<String>,
    ) -> Result<HarvestOutcome, SessionError> {
        let started = Instant::now();
        let base = Url::parse(target.url()).map_err(|e| SessionError::NavigationFailed {
            url: target.url().to_string(),
            detail: format!("invalid search URL: {e}"),
        })?;

        let mut outcome = HarvestOutcome::default();
        let mut emitted: HashSet<String> = HashSet::new();
        let mut guard = self.pool.acquire().await?;

        info!("Harvesting target: {}", target.url());

        for page_num in 0..self.config.max_pages() {
            let page_url = paged_url(&base, page_num);

            let handle = match guard.navigate(page_url.as_str()).await {
                Ok(handle) => handle,
                Err(e) if page_num == 0 => {
                    warn!("First result page failed for {}: {}", target.url(), e);
                    return Err(e);
                }
                Err(e) => {
                    debug!(
                        "Pagination ended for {} at page {}: {}",
                        target.url(),
                        page_num + 1,
                        e
                    );
                    break;
                }
            };
            outcome.pages_visited += 1;

            let candidates = collect_candidates(handle.page()).await;
            drop(handle);

            let new_on_page = self.process_candidates(
                candidates,
                &base,
                target,
                existing,
                &mut emitted,
                &mut outcome,
            );

            debug!(
                "Page {} of {}: {} new links ({} total)",
                page_num + 1,
                target.url(),
                new_on_page,
                outcome.links.len()
            );

            // A page with nothing new is the natural end of results
            if new_on_page == 0 {
                break;
            }

            if page_num + 1 < self.config.max_pages() {
                pace_request(self.config.request_delay()).await;
            }
        }

        info!(
            "Harvested {} links from {} ({} pages, {} duplicates, {} excluded) in {:.1}s",
            outcome.links.len(),
            target.url(),
            outcome.pages_visited,
            outcome.duplicates_skipped,
            outcome.excluded,
            started.elapsed().as_secs_f64()
        );
        Ok(outcome)
    }

    /// Normalize, filter, and emit one page's candidates
    ///
    /// Rank counts normalized candidates in document order on this page;
    /// duplicates and excluded candidates consume their rank slot without
    /// being emitted.
    fn process_candidates(
        &self,
        candidates: Vec<String>,
        base: &Url,
        target: &SearchTarget,
        existing: &HashSet<String>,
        emitted: &mut HashSet<String>,
        outcome: &mut HarvestOutcome,
    ) -> usize {
        let mut rank = 0usize;
        let mut new_on_page = 0usize;

        for href in candidates {
            let Some(url) = normalize_candidate(&href, base) else {
                continue;
            };
            let this_rank = rank;
            rank += 1;

            if self.is_excluded(&url) {
                outcome.excluded += 1;
                continue;
            }
            if existing.contains(&url) || !emitted.insert(url.clone()) {
                outcome.duplicates_skipped += 1;
                continue;
            }

            outcome.links.push(HarvestedLink {
                url,
                source_search_url: target.url().to_string(),
                discovered_at: Utc::now(),
                rank: this_rank,
            });
            new_on_page += 1;
        }

        new_on_page
    }

    fn is_excluded(&self, url: &str) -> bool {
        self.config
            .exclude_patterns()
            .iter()
            .any(|pattern| url.contains(pattern))
    }
}

/// Build the URL of result page `page_num` (0-based)
///
/// Engines expose deeper pages via a `start` offset parameter in strides of
/// [`RESULTS_PER_PAGE`]. Page 0 is the target URL untouched.
fn paged_url(base: &Url, page_num: usize) -> Url {
    if page_num == 0 {
        return base.clone();
    }
    let mut url = base.clone();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "start")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair("start", &(page_num * RESULTS_PER_PAGE).to_string());
    }
    url
}

/// Wait for the result container, then collect candidate hrefs
///
/// Result lists render via JavaScript well after the navigation settles, so
/// the DOM is polled up to [`RESULT_WAIT_TIMEOUT`]. A page where the
/// container never appears is treated as having zero results - engines
/// serve legitimate empty result pages and the distinction is not
/// observable from here.
async fn collect_candidates(page: &Page) -> Vec<String> {
    let wait_started = Instant::now();
    loop {
        if page.find_element(RESULT_CONTAINER_SELECTOR).await.is_ok() {
            break;
        }
        if wait_started.elapsed() >= RESULT_WAIT_TIMEOUT {
            debug!("Result container never rendered, treating page as empty");
            return Vec::new();
        }
        tokio::time::sleep(RESULT_POLL_INTERVAL).await;
    }

    match page.evaluate(COLLECT_LINKS_SCRIPT).await {
        Ok(result) => match result.into_value::<Vec<String>>() {
            Ok(hrefs) => {
                debug!("Collected {} candidate hrefs", hrefs.len());
                hrefs
            }
            Err(e) => {
                warn!("Candidate collection returned unexpected shape: {e}");
                Vec::new()
            }
        },
        Err(e) => {
            warn!("Candidate collection script failed: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paged_url_leaves_first_page_untouched() {
        let base = Url::parse("https://www.example.com/search?q=rust").unwrap();
        assert_eq!(paged_url(&base, 0), base);
    }

    #[test]
    fn paged_url_appends_start_offset() {
        let base = Url::parse("https://www.example.com/search?q=rust").unwrap();
        let page3 = paged_url(&base, 2);
        assert_eq!(
            page3.as_str(),
            "https://www.example.com/search?q=rust&start=20"
        );
    }

    #[test]
    fn paged_url_replaces_prior_start_offset() {
        let base = Url::parse("https://www.example.com/search?q=rust&start=40").unwrap();
        let page2 = paged_url(&base, 1);
        assert_eq!(
            page2.as_str(),
            "https://www.example.com/search?q=rust&start=10"
        );
    }
}
