pub mod browser_setup;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod harvester;
pub mod pipeline;
pub mod session;
pub mod store;
pub mod targets;
pub mod urlnorm;
pub mod utils;

pub use browser_setup::{find_browser_executable, launch_browser};
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult, SessionError};
pub use extractor::Extractor;
pub use harvester::{HarvestOutcome, Harvester};
pub use pipeline::report::RunReport;
pub use pipeline::{Pipeline, RunState, StopHandle};
pub use session::{SessionPool, SessionPoolConfig};
pub use store::{ContentStore, ExtractionRecord, ExtractionStatus, HarvestedLink, LinkStore};
pub use targets::SearchTarget;
pub use urlnorm::normalize_candidate;
