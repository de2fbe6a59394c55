pub mod cli;
pub mod config;
pub mod llm;
pub mod outlet;
pub mod pipeline;
pub mod search;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{ResearchContext, ResearchWorkflow, launch};
pub use types::{CandidateProfile, PipelineState};
