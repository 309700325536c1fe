//! TalentMatch - candidate/job compatibility scoring and match generation
//!
//! This library provides the weighted scoring engine used by the TalentMatch
//! job platform and the materializer that keeps match records between
//! candidates and job postings up to date.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{compute_compatibility, resolve_weights, score_breakdown, MatchError, MatchMaterializer};
pub use models::{Candidate, JobPosting, Match, MatchStatus, ScoreBreakdown, WeightSet, WorkMode};
pub use services::{InMemoryStore, MatchStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let weights = resolve_weights(&Default::default());
        assert_eq!(weights, WeightSet::default());
    }
}
