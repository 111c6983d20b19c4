pub mod candidates;
pub mod index;

pub use candidates::{Candidate, CandidateMatcher, CandidateSet};
pub use index::SubmissionIndex;
