//! Pipeline orchestration
//!
//! Sequences the harvester over every configured search target, then the
//! extractor over every stored link without a prior successful record.
//! Each stage checkpoints its store after every completed unit of work, so
//! an interrupted run resumes where it stopped instead of repeating it.

pub mod report;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::browser_setup::find_browser_executable;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::extractor::Extractor;
use crate::harvester::Harvester;
use crate::session::{pace_request, SessionPool, SessionPoolConfig};
use crate::store::{ContentStore, LinkStore};
use crate::targets::{load_exclude_patterns, load_search_targets, SearchTarget};
use report::RunReport;

/// Lifecycle of one pipeline invocation
///
/// `Failed` is reachable only from configuration or startup errors; once
/// browser work begins, per-item failures are recorded, never escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Harvesting,
    Extracting,
    Done,
    Failed,
}

/// Cooperative stop signal, checked between targets and between links
///
/// In-flight navigation is allowed to finish (or time out); there is no
/// mid-navigation hard abort.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Request the pipeline halt at the next unit boundary
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// The pipeline orchestrator
///
/// Owns the session pool and both stores for the duration of a run; the
/// harvester and extractor only ever touch the stores through it.
pub struct Pipeline {
    config: PipelineConfig,
    pool: Arc<SessionPool>,
    stop: StopHandle,
    state: RunState,
}

impl Pipeline {
    /// Build a pipeline from configuration
    ///
    /// Verifies a browser executable exists up front: a machine that cannot
    /// launch Chromium at all is a startup error, not a hundred per-link
    /// failures.
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        find_browser_executable().map_err(|e| PipelineError::BrowserLaunch(format!("{e:#}")))?;

        let pool = SessionPool::new(SessionPoolConfig {
            headless: config.headless(),
            navigation_timeout: config.navigation_timeout(),
            user_agent: config.user_agent().to_string(),
            max_sessions: config.max_sessions(),
            max_session_uses: config.max_session_uses(),
        });

        Ok(Self {
            config,
            pool,
            stop: StopHandle::default(),
            state: RunState::Idle,
        })
    }

    /// Handle for requesting a cooperative stop from another task
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        info!("Pipeline state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run both stages in sequence
    pub async fn run(
        &mut self,
        targets_path: &Path,
        exclude_path: Option<&Path>,
    ) -> PipelineResult<RunReport> {
        let mut report = RunReport::default();
        let result = self.run_inner(targets_path, exclude_path, &mut report).await;
        self.finish(result, report).await
    }

    /// Run the harvest stage only
    pub async fn harvest_only(
        &mut self,
        targets_path: &Path,
        exclude_path: Option<&Path>,
    ) -> PipelineResult<RunReport> {
        let mut report = RunReport::default();
        let result = async {
            let targets = self.load_inputs(targets_path, exclude_path).await?;
            self.harvest_stage(&targets, &mut report).await?;
            Ok(())
        }
        .await;
        self.finish(result, report).await
    }

    /// Run the extraction stage only, against the existing link store
    pub async fn extract_only(&mut self) -> PipelineResult<RunReport> {
        let mut report = RunReport::default();
        let result = async {
            let link_store = LinkStore::load(&self.config.links_path()).await?;
            if link_store.is_empty() {
                return Err(PipelineError::Config(format!(
                    "link store {} is empty; harvest first",
                    self.config.links_path().display()
                )));
            }
            self.extract_stage(&link_store, &mut report).await
        }
        .await;
        self.finish(result, report).await
    }

    async fn run_inner(
        &mut self,
        targets_path: &Path,
        exclude_path: Option<&Path>,
        report: &mut RunReport,
    ) -> PipelineResult<()> {
        let targets = self.load_inputs(targets_path, exclude_path).await?;
        let link_store = self.harvest_stage(&targets, report).await?;
        self.extract_stage(&link_store, report).await
    }

    /// Load targets and optional exclude patterns (Idle work, no browser)
    async fn load_inputs(
        &mut self,
        targets_path: &Path,
        exclude_path: Option<&Path>,
    ) -> PipelineResult<Vec<SearchTarget>> {
        let targets = load_search_targets(targets_path).await?;
        if let Some(path) = exclude_path {
            let patterns = load_exclude_patterns(path).await?;
            self.config.exclude_patterns.extend(patterns);
        }
        Ok(targets)
    }

    /// Harvest every target, checkpointing the link store after each
    async fn harvest_stage(
        &mut self,
        targets: &[SearchTarget],
        report: &mut RunReport,
    ) -> PipelineResult<LinkStore> {
        self.transition(RunState::Harvesting);

        let mut link_store = LinkStore::load(&self.config.links_path()).await?;
        let harvester = Harvester::new(Arc::clone(&self.pool), self.config.clone());

        for (index, target) in targets.iter().enumerate() {
            if self.stop.is_stopped() {
                info!("Stop requested, halting harvest before target {}", index + 1);
                break;
            }

            let existing = link_store.known_urls();
            match harvester.harvest(target, &existing).await {
                Ok(outcome) => {
                    report.targets_processed += 1;
                    report.duplicates_skipped += outcome.duplicates_skipped;
                    report.links_excluded += outcome.excluded;
                    for link in outcome.links {
                        if link_store.insert(link) {
                            report.links_discovered += 1;
                        } else {
                            report.duplicates_skipped += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!("Target {} failed: {}", target.url(), e);
                    report.targets_failed += 1;
                }
            }

            // Checkpoint: a crash mid-run loses at most one target's links
            link_store.save().await?;

            if index + 1 < targets.len() {
                pace_request(self.config.request_delay()).await;
            }
        }

        info!(
            "Harvest stage complete: {} links stored ({} new this run)",
            link_store.len(),
            report.links_discovered
        );
        Ok(link_store)
    }

    /// Extract every stored link without a prior successful record
    async fn extract_stage(
        &mut self,
        link_store: &LinkStore,
        report: &mut RunReport,
    ) -> PipelineResult<()> {
        self.transition(RunState::Extracting);

        let mut content_store = ContentStore::load(&self.config.content_path()).await?;
        let extractor = Extractor::new(Arc::clone(&self.pool), self.config.clone());

        let pending: Vec<_> = link_store
            .links()
            .iter()
            .filter(|link| {
                if content_store.has_ok(&link.url) {
                    report.extractions_skipped += 1;
                    false
                } else {
                    true
                }
            })
            .cloned()
            .collect();

        info!(
            "Extraction stage: {} links pending, {} already extracted",
            pending.len(),
            report.extractions_skipped
        );

        for (index, link) in pending.iter().enumerate() {
            if self.stop.is_stopped() {
                info!("Stop requested, halting extraction before link {}", index + 1);
                break;
            }

            let record = extractor.extract(link).await;
            report.record_extraction(record.status);
            content_store.upsert(record);

            // Checkpoint: every finished link survives an interruption
            content_store.save().await?;

            if index + 1 < pending.len() {
                pace_request(self.config.request_delay()).await;
            }
        }

        content_store.save().await?;
        Ok(())
    }

    /// Final transition, pool teardown, and report emission
    async fn finish(
        &mut self,
        result: PipelineResult<()>,
        report: RunReport,
    ) -> PipelineResult<RunReport> {
        self.pool.shutdown().await;
        match result {
            Ok(()) => {
                self.transition(RunState::Done);
                info!("Run report:\n{report}");
                Ok(report)
            }
            Err(e) => {
                self.transition(RunState::Failed);
                Err(e)
            }
        }
    }
}
