use serde::{Deserialize, Serialize};
use crate::models::domain::{Match, ScoreBreakdown, WeightSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityResponse {
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub weights: WeightSet,
}

/// Ranked matches, highest score first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListResponse {
    pub matches: Vec<Match>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

impl MatchListResponse {
    pub fn new(matches: Vec<Match>) -> Self {
        let total_results = matches.len();
        Self { matches, total_results }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecomputeResponse {
    pub updated: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResponse {
    pub created: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cache: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
