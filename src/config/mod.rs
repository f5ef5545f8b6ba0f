//! Pipeline configuration
//!
//! `PipelineConfig` carries every knob the pipeline recognizes; the
//! typestate builder refuses to produce a config without a data directory.

pub mod builder;
pub mod types;

pub use builder::PipelineConfigBuilder;
pub use types::{PipelineConfig, CONTENT_FILE, LINKS_FILE};
