//! Durable pipeline state
//!
//! Two JSON-backed stores own everything that survives a run: the link
//! store (what the harvester found) and the content store (what the
//! extractor made of it). Both are mutated only by the orchestrator between
//! units of work.

pub mod content;
pub mod links;
mod persist;
pub mod records;

pub use content::ContentStore;
pub use links::LinkStore;
pub use records::{ExtractionRecord, ExtractionStatus, HarvestedLink};
