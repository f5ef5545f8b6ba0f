//! The link store: ordered, deduplicated harvested links

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::persist;
use super::records::HarvestedLink;
use crate::error::PipelineResult;

/// Ordered, deduplicated collection of harvested links
///
/// Insertion order is preserved on disk; the URL index makes dedup O(1).
/// The store is the pipeline's durable memory of what has already been
/// harvested, so cross-run dedup costs nothing but a set lookup.
#[derive(Debug, Default)]
pub struct LinkStore {
    links: Vec<HarvestedLink>,
    index: HashSet<String>,
    path: PathBuf,
}

impl LinkStore {
    /// Load the store from disk; a missing file starts an empty store
    pub async fn load(path: &Path) -> PipelineResult<Self> {
        let links: Vec<HarvestedLink> = persist::load_array(path).await?;
        let index = links.iter().map(|l| l.url.clone()).collect();
        Ok(Self {
            links,
            index,
            path: path.to_path_buf(),
        })
    }

    /// Insert a link unless its URL is already present
    ///
    /// Returns `true` if the link was inserted, `false` on duplicate. The
    /// first occurrence always wins; provenance is never rewritten.
    pub fn insert(&mut self, link: HarvestedLink) -> bool {
        if !self.index.insert(link.url.clone()) {
            return false;
        }
        self.links.push(link);
        true
    }

    /// Whether a normalized URL is already stored
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.index.contains(url)
    }

    /// Snapshot of known URLs for cross-run dedup during a harvest
    #[must_use]
    pub fn known_urls(&self) -> HashSet<String> {
        self.index.clone()
    }

    /// All stored links in insertion order
    #[must_use]
    pub fn links(&self) -> &[HarvestedLink] {
        &self.links
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Persist the store to its backing file
    pub async fn save(&self) -> PipelineResult<()> {
        persist::save_array(&self.path, &self.links).await
    }

    /// Drop every stored link (explicit pipeline reset)
    pub fn clear(&mut self) {
        self.links.clear();
        self.index.clear();
    }
}
