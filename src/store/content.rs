//! The content store: one extraction record per harvested link

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::persist;
use super::records::ExtractionRecord;
use crate::error::PipelineResult;

/// Mapping from link URL to its extraction record
///
/// At most one record per URL. Re-extraction replaces the whole record;
/// there is never a half-updated entry. On disk the store is an array in
/// first-extraction order.
#[derive(Debug, Default)]
pub struct ContentStore {
    records: Vec<ExtractionRecord>,
    index: HashMap<String, usize>,
    path: PathBuf,
}

impl ContentStore {
    /// Load the store from disk; a missing file starts an empty store
    pub async fn load(path: &Path) -> PipelineResult<Self> {
        let records: Vec<ExtractionRecord> = persist::load_array(path).await?;
        let mut store = Self {
            records: Vec::with_capacity(records.len()),
            index: HashMap::with_capacity(records.len()),
            path: path.to_path_buf(),
        };
        // Re-applying upsert collapses any duplicate URLs a hand-edited
        // file might carry; the last record wins.
        for record in records {
            store.upsert(record);
        }
        Ok(store)
    }

    /// Insert or atomically replace the record for a URL
    pub fn upsert(&mut self, record: ExtractionRecord) {
        match self.index.get(&record.url) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.index.insert(record.url.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// The stored record for a URL, if any
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&ExtractionRecord> {
        self.index.get(url).map(|&pos| &self.records[pos])
    }

    /// Whether a URL already has a stored successful extraction
    ///
    /// Drives resumability: links with a prior `ok` record are skipped on
    /// re-runs, everything else is re-attempted.
    #[must_use]
    pub fn has_ok(&self, url: &str) -> bool {
        self.get(url).is_some_and(ExtractionRecord::is_ok)
    }

    /// All records in first-extraction order
    #[must_use]
    pub fn records(&self) -> &[ExtractionRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Persist the store to its backing file
    pub async fn save(&self) -> PipelineResult<()> {
        persist::save_array(&self.path, &self.records).await
    }
}
