use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use validator::Validate;
use crate::models::domain::{Candidate, InterestSide, JobPosting, MatchStatus};

/// Ad-hoc compatibility check between two inline records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityRequest {
    pub candidate: Candidate,
    pub job: JobPosting,
    /// Raw weight mapping; malformed entries fall back to defaults
    #[serde(default)]
    pub weights: Option<BTreeMap<String, Value>>,
}

/// Query parameters for the generate endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GenerateQuery {
    #[validate(range(max = 100))]
    #[serde(alias = "min_score", rename = "minScore")]
    pub min_score: Option<u8>,
}

/// Query parameters for the recompute sweep
///
/// With both `offset` and `limit` set only that page is recomputed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RecomputeQuery {
    pub offset: Option<usize>,
    #[validate(range(min = 1, max = 10000))]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: MatchStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInterestRequest {
    pub side: InterestSide,
    pub interested: bool,
}
