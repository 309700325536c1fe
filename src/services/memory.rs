use crate::models::{
    Candidate, InterestSide, JobPosting, JobStatus, Match, MatchStatus, NewMatch, Notification,
};
use crate::services::store::{MatchStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
struct StoreState {
    candidates: Vec<Candidate>,
    jobs: Vec<JobPosting>,
    matches: Vec<Match>,
    notifications: Vec<Notification>,
}

/// Mutex-guarded store for tests, benchmarks and database-less runs
///
/// Records keep insertion order. Pair uniqueness is checked under the same
/// lock as the insert, mirroring a unique constraint.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }

    /// Insert or replace a candidate profile
    pub fn put_candidate(&self, candidate: Candidate) -> Result<(), StoreError> {
        let mut state = self.state()?;
        match state.candidates.iter_mut().find(|c| c.id == candidate.id) {
            Some(existing) => *existing = candidate,
            None => state.candidates.push(candidate),
        }
        Ok(())
    }

    /// Insert or replace a job posting
    pub fn put_job(&self, job: JobPosting) -> Result<(), StoreError> {
        let mut state = self.state()?;
        match state.jobs.iter_mut().find(|j| j.id == job.id) {
            Some(existing) => *existing = job,
            None => state.jobs.push(job),
        }
        Ok(())
    }

    pub fn notifications(&self) -> Result<Vec<Notification>, StoreError> {
        Ok(self.state()?.notifications.clone())
    }

    pub fn match_count(&self) -> Result<usize, StoreError> {
        Ok(self.state()?.matches.len())
    }

    fn modify_match<F>(&self, id: Uuid, apply: F) -> Result<Match, StoreError>
    where
        F: FnOnce(&mut Match),
    {
        let mut state = self.state()?;
        let record = state
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("match {}", id)))?;
        apply(record);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>, StoreError> {
        Ok(self.state()?.candidates.iter().find(|c| c.id == id).cloned())
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobPosting>, StoreError> {
        Ok(self.state()?.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn open_jobs(&self) -> Result<Vec<JobPosting>, StoreError> {
        Ok(self
            .state()?
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::Open)
            .cloned()
            .collect())
    }

    async fn all_jobs(&self) -> Result<Vec<JobPosting>, StoreError> {
        Ok(self.state()?.jobs.clone())
    }

    async fn all_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(self.state()?.candidates.clone())
    }

    async fn get_match(&self, id: Uuid) -> Result<Option<Match>, StoreError> {
        Ok(self.state()?.matches.iter().find(|m| m.id == id).cloned())
    }

    async fn find_match(&self, candidate_id: Uuid, job_id: Uuid) -> Result<Option<Match>, StoreError> {
        Ok(self
            .state()?
            .matches
            .iter()
            .find(|m| m.candidate_id == candidate_id && m.job_id == job_id)
            .cloned())
    }

    async fn insert_match(&self, new_match: NewMatch) -> Result<Match, StoreError> {
        let mut state = self.state()?;

        if state
            .matches
            .iter()
            .any(|m| m.candidate_id == new_match.candidate_id && m.job_id == new_match.job_id)
        {
            return Err(StoreError::Conflict {
                candidate_id: new_match.candidate_id,
                job_id: new_match.job_id,
            });
        }

        let now = Utc::now();
        let record = Match {
            id: Uuid::new_v4(),
            candidate_id: new_match.candidate_id,
            job_id: new_match.job_id,
            score: new_match.score,
            status: MatchStatus::Pending,
            candidate_interested: false,
            employer_interested: false,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        };
        state.matches.push(record.clone());

        Ok(record)
    }

    async fn update_match_score(&self, id: Uuid, score: u8) -> Result<Match, StoreError> {
        self.modify_match(id, |m| m.score = score)
    }

    async fn update_match_status(&self, id: Uuid, status: MatchStatus) -> Result<Match, StoreError> {
        self.modify_match(id, |m| m.status = status)
    }

    async fn update_match_interest(
        &self,
        id: Uuid,
        side: InterestSide,
        interested: bool,
    ) -> Result<Match, StoreError> {
        self.modify_match(id, |m| match side {
            InterestSide::Candidate => m.candidate_interested = interested,
            InterestSide::Employer => m.employer_interested = interested,
        })
    }

    async fn list_matches(&self, offset: usize, limit: usize) -> Result<Vec<Match>, StoreError> {
        let mut matches = self.state()?.matches.clone();
        matches.sort_by_key(|m| m.id);
        Ok(matches.into_iter().skip(offset).take(limit).collect())
    }

    async fn matches_for_candidate(&self, candidate_id: Uuid) -> Result<Vec<Match>, StoreError> {
        Ok(self
            .state()?
            .matches
            .iter()
            .filter(|m| m.candidate_id == candidate_id)
            .cloned()
            .collect())
    }

    async fn matches_for_job(&self, job_id: Uuid) -> Result<Vec<Match>, StoreError> {
        Ok(self
            .state()?
            .matches
            .iter()
            .filter(|m| m.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn record_notification(&self, notification: Notification) -> Result<(), StoreError> {
        self.state()?.notifications.push(notification);
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.state().map(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn test_insert_rejects_duplicate_pair() {
        let store = InMemoryStore::new();
        let pair = NewMatch {
            candidate_id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            score: 70,
        };

        let created = block_on(store.insert_match(pair)).unwrap();
        assert_eq!(created.status, MatchStatus::Pending);
        assert!(!created.candidate_interested && !created.employer_interested);

        let duplicate = block_on(store.insert_match(NewMatch { score: 90, ..pair }));
        assert!(matches!(duplicate, Err(StoreError::Conflict { .. })));
        assert_eq!(store.match_count().unwrap(), 1);
        assert_eq!(block_on(store.get_match(created.id)).unwrap().unwrap().score, 70);
    }

    #[test]
    fn test_update_unknown_match() {
        let store = InMemoryStore::new();
        let result = block_on(store.update_match_score(Uuid::new_v4(), 10));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_interest_flags_are_independent() {
        let store = InMemoryStore::new();
        let created = block_on(store.insert_match(NewMatch {
            candidate_id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            score: 55,
        }))
        .unwrap();

        let updated = block_on(store.update_match_interest(created.id, InterestSide::Employer, true)).unwrap();
        assert!(updated.employer_interested);
        assert!(!updated.candidate_interested);
    }

    #[test]
    fn test_list_matches_pages() {
        let store = InMemoryStore::new();
        for score in 0..5 {
            block_on(store.insert_match(NewMatch {
                candidate_id: Uuid::new_v4(),
                job_id: Uuid::new_v4(),
                score,
            }))
            .unwrap();
        }

        assert_eq!(block_on(store.list_matches(0, 2)).unwrap().len(), 2);
        assert_eq!(block_on(store.list_matches(4, 2)).unwrap().len(), 1);
        assert!(block_on(store.list_matches(5, 2)).unwrap().is_empty());
    }

    #[test]
    fn test_list_matches_is_ordered_by_id() {
        let store = InMemoryStore::new();
        for score in 0..6 {
            block_on(store.insert_match(NewMatch {
                candidate_id: Uuid::new_v4(),
                job_id: Uuid::new_v4(),
                score,
            }))
            .unwrap();
        }

        let first = block_on(store.list_matches(0, 3)).unwrap();
        let second = block_on(store.list_matches(3, 3)).unwrap();
        let ids: Vec<Uuid> = first.iter().chain(second.iter()).map(|m| m.id).collect();

        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
