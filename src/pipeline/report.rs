//! Per-invocation run statistics
//!
//! The report is ephemeral: aggregated during a run, rendered at the end,
//! never persisted. Durable state lives in the stores.

use std::fmt;

use crate::store::ExtractionStatus;

/// Summary of one pipeline invocation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Search targets harvested successfully
    pub targets_processed: usize,
    /// Search targets whose first result page failed to load
    pub targets_failed: usize,
    /// New links added to the link store
    pub links_discovered: usize,
    /// Candidates skipped as already known or already seen this run
    pub duplicates_skipped: usize,
    /// Candidates rejected by the exclude-pattern table
    pub links_excluded: usize,
    /// Links skipped because a successful record already existed
    pub extractions_skipped: usize,
    /// Successful extractions this run
    pub extracted_ok: usize,
    /// Failed extractions by classification
    pub extraction_failures: ExtractionFailureCounts,
}

/// Failure counts keyed by extraction status
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionFailureCounts {
    pub blocked: usize,
    pub timeout: usize,
    pub non_text: usize,
    pub empty: usize,
    pub error: usize,
}

impl ExtractionFailureCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.blocked + self.timeout + self.non_text + self.empty + self.error
    }
}

impl RunReport {
    /// Account one finished extraction
    pub fn record_extraction(&mut self, status: ExtractionStatus) {
        match status {
            ExtractionStatus::Ok => self.extracted_ok += 1,
            ExtractionStatus::Blocked => self.extraction_failures.blocked += 1,
            ExtractionStatus::Timeout => self.extraction_failures.timeout += 1,
            ExtractionStatus::NonText => self.extraction_failures.non_text += 1,
            ExtractionStatus::Empty => self.extraction_failures.empty += 1,
            ExtractionStatus::Error => self.extraction_failures.error += 1,
        }
    }

    /// Total extraction attempts made this run
    #[must_use]
    pub fn extractions_attempted(&self) -> usize {
        self.extracted_ok + self.extraction_failures.total()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "targets: {} processed, {} failed",
            self.targets_processed, self.targets_failed
        )?;
        writeln!(
            f,
            "links: {} discovered, {} duplicates skipped, {} excluded",
            self.links_discovered, self.duplicates_skipped, self.links_excluded
        )?;
        write!(
            f,
            "extraction: {} ok, {} skipped (prior success), {} failed \
             (blocked {}, timeout {}, non-text {}, empty {}, error {})",
            self.extracted_ok,
            self.extractions_skipped,
            self.extraction_failures.total(),
            self.extraction_failures.blocked,
            self.extraction_failures.timeout,
            self.extraction_failures.non_text,
            self.extraction_failures.empty,
            self.extraction_failures.error
        )
    }
}
