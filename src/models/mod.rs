// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, InterestSide, JobPosting, JobStatus, Match, MatchStatus, NewMatch, Notification,
    RecipientKind, ScoreBreakdown, WeightSet, WorkMode,
};
pub use requests::{CompatibilityRequest, GenerateQuery, RecomputeQuery, UpdateInterestRequest, UpdateStatusRequest};
pub use responses::{CompatibilityResponse, ErrorResponse, HealthResponse, MatchListResponse, RecomputeResponse, SeedResponse};
