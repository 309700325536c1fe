use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Job-seeker profile as seen by the scoring engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    /// Free-text, comma separated
    #[serde(default)]
    pub skills: String,
    #[serde(rename = "experienceYears", default)]
    pub experience_years: u32,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(rename = "desiredSalary", default)]
    pub desired_salary: Option<Decimal>,
}

/// Job posting published by an employer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub id: Uuid,
    #[serde(rename = "employerId", default)]
    pub employer_id: Uuid,
    #[serde(default)]
    pub title: String,
    /// Free-text, comma separated
    #[serde(rename = "requiredSkills", default)]
    pub required_skills: String,
    #[serde(rename = "minExperienceYears", default)]
    pub min_experience_years: u32,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(rename = "workMode")]
    pub work_mode: WorkMode,
    #[serde(rename = "salaryMin", default)]
    pub salary_min: Option<Decimal>,
    #[serde(rename = "salaryMax", default)]
    pub salary_max: Option<Decimal>,
    #[serde(default)]
    pub status: JobStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "work_mode", rename_all = "kebab-case")]
pub enum WorkMode {
    Remote,
    OnSite,
    Hybrid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
    Paused,
}

/// Workflow status of a match
///
/// The engine only ever creates `Pending` matches. Everything else is driven
/// by user actions and must follow [`MatchStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "match_status", rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Interviewing,
    Hired,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Accepted => "accepted",
            MatchStatus::Rejected => "rejected",
            MatchStatus::Interviewing => "interviewing",
            MatchStatus::Hired => "hired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Hired | MatchStatus::Rejected)
    }

    pub fn can_transition_to(&self, next: MatchStatus) -> bool {
        use MatchStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted)
                | (Pending, Rejected)
                | (Pending, Interviewing)
                | (Accepted, Interviewing)
                | (Accepted, Hired)
                | (Accepted, Rejected)
                | (Interviewing, Hired)
                | (Interviewing, Rejected)
        )
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted compatibility record for a (candidate, job) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    #[serde(rename = "candidateId")]
    pub candidate_id: Uuid,
    #[serde(rename = "jobId")]
    pub job_id: Uuid,
    pub score: u8,
    pub status: MatchStatus,
    #[serde(rename = "candidateInterested")]
    pub candidate_interested: bool,
    #[serde(rename = "employerInterested")]
    pub employer_interested: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a freshly materialized match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMatch {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub score: u8,
}

/// Which party flags interest in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestSide {
    Candidate,
    Employer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "recipient_kind", rename_all = "lowercase")]
pub enum RecipientKind {
    Candidate,
    Employer,
}

/// In-app notification recorded when a strong match appears
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "recipientKind")]
    pub recipient_kind: RecipientKind,
    #[serde(rename = "recipientId")]
    pub recipient_id: Uuid,
    #[serde(rename = "matchId")]
    pub match_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Maximum points per factor
///
/// Values are not required to add up to 100; each is bounded to [0, 100]
/// by the weight resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub salary: f64,
}

impl Default for WeightSet {
    fn default() -> Self {
        Self {
            skills: 40.0,
            experience: 25.0,
            location: 20.0,
            salary: 15.0,
        }
    }
}

/// Per-factor points plus the clamped total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills: u32,
    pub experience: u32,
    pub location: u32,
    pub salary: u32,
    pub total: u8,
}
