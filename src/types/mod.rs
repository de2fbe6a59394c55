pub mod candidate;
pub mod state;

pub use candidate::{CandidateProfile, ScrapedPage, SearchRecord, UNKNOWN};
pub use state::{PipelineState, StateField, StateUpdate};
