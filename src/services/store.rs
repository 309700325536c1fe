use crate::models::{Candidate, InterestSide, JobPosting, Match, MatchStatus, NewMatch, Notification};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by a [`MatchStore`] implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Match already exists for candidate {candidate_id} and job {job_id}")]
    Conflict { candidate_id: Uuid, job_id: Uuid },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence collaborator of the matching engine
///
/// Implementations own match identity and must enforce the uniqueness of
/// (candidate, job): `insert_match` on an existing pair returns
/// [`StoreError::Conflict`] and leaves the stored record untouched.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>, StoreError>;

    async fn get_job(&self, id: Uuid) -> Result<Option<JobPosting>, StoreError>;

    /// Job postings with status `open`
    async fn open_jobs(&self) -> Result<Vec<JobPosting>, StoreError>;

    async fn all_jobs(&self) -> Result<Vec<JobPosting>, StoreError>;

    async fn all_candidates(&self) -> Result<Vec<Candidate>, StoreError>;

    async fn get_match(&self, id: Uuid) -> Result<Option<Match>, StoreError>;

    async fn find_match(&self, candidate_id: Uuid, job_id: Uuid) -> Result<Option<Match>, StoreError>;

    async fn insert_match(&self, new_match: NewMatch) -> Result<Match, StoreError>;

    async fn update_match_score(&self, id: Uuid, score: u8) -> Result<Match, StoreError>;

    async fn update_match_status(&self, id: Uuid, status: MatchStatus) -> Result<Match, StoreError>;

    async fn update_match_interest(
        &self,
        id: Uuid,
        side: InterestSide,
        interested: bool,
    ) -> Result<Match, StoreError>;

    /// A page of all matches ordered by id
    ///
    /// Offset paging: rows inserted while a sweep runs can shift later
    /// pages, so a sweep may skip or revisit a few rows. New rows are scored
    /// at creation, so nothing is left stale.
    async fn list_matches(&self, offset: usize, limit: usize) -> Result<Vec<Match>, StoreError>;

    async fn matches_for_candidate(&self, candidate_id: Uuid) -> Result<Vec<Match>, StoreError>;

    async fn matches_for_job(&self, job_id: Uuid) -> Result<Vec<Match>, StoreError>;

    async fn record_notification(&self, notification: Notification) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
