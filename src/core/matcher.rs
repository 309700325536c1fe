use crate::core::scoring::compute_compatibility;
use crate::models::{
    Candidate, InterestSide, JobPosting, Match, MatchStatus, NewMatch, Notification, RecipientKind,
    WeightSet,
};
use crate::services::store::{MatchStore, StoreError};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Threshold used by the per-candidate and per-job generators
pub const DEFAULT_MIN_SCORE: u8 = 50;

/// Threshold used by the bulk seeding pass
pub const DEFAULT_SEED_MIN_SCORE: u8 = 40;

/// New matches at or above this score notify both parties
pub const DEFAULT_NOTIFY_MIN_SCORE: u8 = 60;

pub const DEFAULT_SWEEP_BATCH_SIZE: usize = 500;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: MatchStatus, to: MatchStatus },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Creates and refreshes match records between candidates and job postings
///
/// # Generation
/// For every counterpart of the subject:
/// 1. An existing match gets its score recomputed and stored, keeping its
///    status and interest flags.
/// 2. Otherwise a pending match is created when the score reaches the
///    caller's threshold.
/// 3. Results are ranked by score, highest first.
///
/// Pair uniqueness is owned by the store. Losing an insert race is not an
/// error: the materializer re-reads the winner's row and updates it.
#[derive(Clone)]
pub struct MatchMaterializer {
    store: Arc<dyn MatchStore>,
    weights: WeightSet,
    notify_min_score: u8,
    sweep_batch_size: usize,
}

impl MatchMaterializer {
    pub fn new(store: Arc<dyn MatchStore>, weights: WeightSet) -> Self {
        Self {
            store,
            weights,
            notify_min_score: DEFAULT_NOTIFY_MIN_SCORE,
            sweep_batch_size: DEFAULT_SWEEP_BATCH_SIZE,
        }
    }

    pub fn with_default_weights(store: Arc<dyn MatchStore>) -> Self {
        Self::new(store, WeightSet::default())
    }

    pub fn with_notify_min_score(mut self, score: u8) -> Self {
        self.notify_min_score = score;
        self
    }

    pub fn with_sweep_batch_size(mut self, size: usize) -> Self {
        self.sweep_batch_size = size.max(1);
        self
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn store(&self) -> &Arc<dyn MatchStore> {
        &self.store
    }

    /// Generate matches for one candidate against every open job
    ///
    /// An unknown candidate yields an empty list.
    pub async fn generate_matches_for_candidate(
        &self,
        candidate_id: Uuid,
        min_score: u8,
    ) -> Result<Vec<Match>, MatchError> {
        let Some(candidate) = self.store.get_candidate(candidate_id).await? else {
            tracing::warn!("Candidate {} not found, no matches generated", candidate_id);
            return Ok(Vec::new());
        };

        let jobs = self.store.open_jobs().await?;
        let mut matches = Vec::with_capacity(jobs.len());

        for job in &jobs {
            if let Some(record) = self.materialize_pair(&candidate, job, min_score).await? {
                matches.push(record);
            }
        }

        rank_matches(&mut matches);

        tracing::info!(
            "Generated {} matches for candidate {} (from {} open jobs, min score {})",
            matches.len(),
            candidate_id,
            jobs.len(),
            min_score
        );

        Ok(matches)
    }

    /// Generate matches for one job against every candidate
    ///
    /// The job itself is not required to be open. An unknown job yields an
    /// empty list.
    pub async fn generate_matches_for_job(
        &self,
        job_id: Uuid,
        min_score: u8,
    ) -> Result<Vec<Match>, MatchError> {
        let Some(job) = self.store.get_job(job_id).await? else {
            tracing::warn!("Job {} not found, no matches generated", job_id);
            return Ok(Vec::new());
        };

        let candidates = self.store.all_candidates().await?;
        let mut matches = Vec::with_capacity(candidates.len());

        for candidate in &candidates {
            if let Some(record) = self.materialize_pair(candidate, &job, min_score).await? {
                matches.push(record);
            }
        }

        rank_matches(&mut matches);

        tracing::info!(
            "Generated {} matches for job {} (from {} candidates, min score {})",
            matches.len(),
            job_id,
            candidates.len(),
            min_score
        );

        Ok(matches)
    }

    /// Recompute every stored match, returning how many scores changed
    pub async fn recompute_all_matches(&self) -> Result<usize, MatchError> {
        let mut offset = 0;
        let mut updated = 0;

        loop {
            let (seen, changed) = self.recompute_page(offset, self.sweep_batch_size).await?;
            updated += changed;
            offset += seen;

            if seen < self.sweep_batch_size {
                break;
            }
        }

        tracing::info!("Recompute sweep finished: {} of {} matches updated", updated, offset);
        Ok(updated)
    }

    /// Recompute a single page of stored matches (ordered by id)
    ///
    /// Lets callers shard the sweep across workers or requests.
    pub async fn recompute_matches_page(&self, offset: usize, limit: usize) -> Result<usize, MatchError> {
        let (_, changed) = self.recompute_page(offset, limit).await?;
        Ok(changed)
    }

    async fn recompute_page(&self, offset: usize, limit: usize) -> Result<(usize, usize), MatchError> {
        let page = self.store.list_matches(offset, limit).await?;

        let mut candidates: HashMap<Uuid, Option<Candidate>> = HashMap::new();
        let mut jobs: HashMap<Uuid, Option<JobPosting>> = HashMap::new();
        let mut changed = 0;

        for record in &page {
            if !candidates.contains_key(&record.candidate_id) {
                let candidate = self.store.get_candidate(record.candidate_id).await?;
                candidates.insert(record.candidate_id, candidate);
            }
            if !jobs.contains_key(&record.job_id) {
                let job = self.store.get_job(record.job_id).await?;
                jobs.insert(record.job_id, job);
            }

            let (Some(Some(candidate)), Some(Some(job))) =
                (candidates.get(&record.candidate_id), jobs.get(&record.job_id))
            else {
                tracing::debug!("Skipping match {}: candidate or job no longer exists", record.id);
                continue;
            };

            let score = compute_compatibility(candidate, job, &self.weights);
            if score != record.score {
                self.store.update_match_score(record.id, score).await?;
                changed += 1;
            }
        }

        Ok((page.len(), changed))
    }

    /// Create missing matches for every candidate and job pair
    ///
    /// Existing matches are left untouched. Returns the number created.
    pub async fn generate_all_matches(&self, min_score: u8) -> Result<usize, MatchError> {
        let candidates = self.store.all_candidates().await?;
        let jobs = self.store.all_jobs().await?;
        let mut created = 0;

        for candidate in &candidates {
            for job in &jobs {
                if self.store.find_match(candidate.id, job.id).await?.is_some() {
                    continue;
                }

                let score = compute_compatibility(candidate, job, &self.weights);
                if score < min_score {
                    continue;
                }

                let new_match = NewMatch {
                    candidate_id: candidate.id,
                    job_id: job.id,
                    score,
                };

                match self.store.insert_match(new_match).await {
                    Ok(record) => {
                        self.notify_new_match(&record, candidate, job).await;
                        created += 1;
                    }
                    // Someone else created it in the meantime
                    Err(StoreError::Conflict { .. }) => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        tracing::info!(
            "Seeded {} matches ({} candidates x {} jobs, min score {})",
            created,
            candidates.len(),
            jobs.len(),
            min_score
        );

        Ok(created)
    }

    pub async fn get_match(&self, id: Uuid) -> Result<Match, MatchError> {
        self.store
            .get_match(id)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("match {}", id)))
    }

    /// Stored matches of a candidate, highest score first
    pub async fn ranked_matches_for_candidate(&self, candidate_id: Uuid) -> Result<Vec<Match>, MatchError> {
        let mut matches = self.store.matches_for_candidate(candidate_id).await?;
        rank_matches(&mut matches);
        Ok(matches)
    }

    /// Stored matches of a job, highest score first
    pub async fn ranked_matches_for_job(&self, job_id: Uuid) -> Result<Vec<Match>, MatchError> {
        let mut matches = self.store.matches_for_job(job_id).await?;
        rank_matches(&mut matches);
        Ok(matches)
    }

    /// Move a match along its workflow
    pub async fn update_status(&self, id: Uuid, status: MatchStatus) -> Result<Match, MatchError> {
        let current = self.get_match(id).await?;

        if !current.status.can_transition_to(status) {
            return Err(MatchError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        Ok(self.store.update_match_status(id, status).await?)
    }

    pub async fn set_interest(
        &self,
        id: Uuid,
        side: InterestSide,
        interested: bool,
    ) -> Result<Match, MatchError> {
        match self.store.update_match_interest(id, side, interested).await {
            Ok(record) => Ok(record),
            Err(StoreError::NotFound(what)) => Err(MatchError::NotFound(what)),
            Err(e) => Err(e.into()),
        }
    }

    async fn materialize_pair(
        &self,
        candidate: &Candidate,
        job: &JobPosting,
        min_score: u8,
    ) -> Result<Option<Match>, MatchError> {
        let score = compute_compatibility(candidate, job, &self.weights);

        tracing::debug!("Scored candidate {} against job {}: {}", candidate.id, job.id, score);

        if let Some(existing) = self.store.find_match(candidate.id, job.id).await? {
            let record = self.store.update_match_score(existing.id, score).await?;
            return Ok(Some(record));
        }

        if score < min_score {
            return Ok(None);
        }

        let new_match = NewMatch {
            candidate_id: candidate.id,
            job_id: job.id,
            score,
        };

        match self.store.insert_match(new_match).await {
            Ok(record) => {
                self.notify_new_match(&record, candidate, job).await;
                Ok(Some(record))
            }
            Err(StoreError::Conflict { .. }) => self.recover_conflict(candidate, job, new_match).await,
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve a lost insert race without failing the batch
    ///
    /// Normally the winner's row is re-read and rescored. When it vanished
    /// in between, the insert is tried once more; a second conflict skips
    /// the pair.
    async fn recover_conflict(
        &self,
        candidate: &Candidate,
        job: &JobPosting,
        new_match: NewMatch,
    ) -> Result<Option<Match>, MatchError> {
        tracing::warn!(
            "Concurrent match creation for candidate {} and job {}, updating instead",
            candidate.id,
            job.id
        );

        if let Some(existing) = self.store.find_match(candidate.id, job.id).await? {
            return Ok(Some(self.store.update_match_score(existing.id, new_match.score).await?));
        }

        match self.store.insert_match(new_match).await {
            Ok(record) => {
                self.notify_new_match(&record, candidate, job).await;
                Ok(Some(record))
            }
            Err(StoreError::Conflict { .. }) => {
                tracing::warn!(
                    "Match for candidate {} and job {} keeps conflicting but cannot be read, skipping",
                    candidate.id,
                    job.id
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Record in-app notifications for a freshly created strong match
    ///
    /// Failures are logged and swallowed.
    async fn notify_new_match(&self, record: &Match, candidate: &Candidate, job: &JobPosting) {
        if record.score < self.notify_min_score {
            return;
        }

        let now = Utc::now();
        let notifications = [
            Notification {
                id: Uuid::new_v4(),
                recipient_kind: RecipientKind::Candidate,
                recipient_id: candidate.id,
                match_id: record.id,
                title: "New match found!".to_string(),
                message: format!(
                    "You are {}% compatible with the job \"{}\"",
                    record.score, job.title
                ),
                created_at: now,
            },
            Notification {
                id: Uuid::new_v4(),
                recipient_kind: RecipientKind::Employer,
                recipient_id: job.employer_id,
                match_id: record.id,
                title: "New compatible candidate!".to_string(),
                message: format!(
                    "Candidate {} is {}% compatible with your job \"{}\"",
                    candidate.name, record.score, job.title
                ),
                created_at: now,
            },
        ];

        for notification in notifications {
            if let Err(e) = self.store.record_notification(notification).await {
                tracing::warn!("Failed to record notification for match {}: {}", record.id, e);
            }
        }
    }
}

/// Sort by score descending; ties keep their current order
fn rank_matches(matches: &mut [Match]) {
    matches.sort_by(|a, b| b.score.cmp(&a.score));
}
