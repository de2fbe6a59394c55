pub mod analyze;
pub mod extract;
pub mod research;

pub use analyze::AnalyzeCandidates;
pub use extract::ExtractCandidates;
pub use research::ResearchCandidates;
