use crate::models::{Candidate, JobPosting, ScoreBreakdown, WeightSet, WorkMode};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Upper bound of the aggregated compatibility score
pub const MAX_SCORE: u32 = 100;

/// Calculate the compatibility score (0-100) between a candidate and a job
///
/// Scoring formula:
/// score = min(
///     skills_points +      # share of the job's required skills the candidate has
///     experience_points +  # tiered by how close the candidate is to the minimum
///     location_points +    # remote, same city, same region, hybrid
///     salary_points,       # desired salary against the offered range
///     100
/// )
///
/// Each factor is bounded by its weight, so the clamp only matters when the
/// configured weights add up to more than 100.
pub fn compute_compatibility(candidate: &Candidate, job: &JobPosting, weights: &WeightSet) -> u8 {
    score_breakdown(candidate, job, weights).total
}

/// Same as [`compute_compatibility`] but keeps the per-factor points
pub fn score_breakdown(candidate: &Candidate, job: &JobPosting, weights: &WeightSet) -> ScoreBreakdown {
    let skills = skills_score(&candidate.skills, &job.required_skills, weights.skills);
    let experience = experience_score(
        candidate.experience_years,
        job.min_experience_years,
        weights.experience,
    );
    let location = location_score(
        &candidate.city,
        &candidate.region,
        &job.city,
        &job.region,
        job.work_mode,
        weights.location,
    );
    let salary = salary_score(
        candidate.desired_salary,
        job.salary_min,
        job.salary_max,
        weights.salary,
    );

    let total = (skills + experience + location + salary).min(MAX_SCORE);
    debug_assert!(total <= MAX_SCORE, "compatibility score out of range: {}", total);

    ScoreBreakdown {
        skills,
        experience,
        location,
        salary,
        total: total as u8,
    }
}

/// Skills factor: overlap relative to the job's required skills
///
/// Both lists are comma separated; tokens are trimmed and lower-cased and
/// empty tokens dropped. Returns 0 when either side has no skills.
pub fn skills_score(candidate_skills: &str, job_skills: &str, max_points: f64) -> u32 {
    let candidate_set = skill_set(candidate_skills);
    let job_set = skill_set(job_skills);

    if candidate_set.is_empty() || job_set.is_empty() {
        return 0;
    }

    let shared = candidate_set.intersection(&job_set).count();
    let percentage = (shared as f64 / job_set.len() as f64) * 100.0;

    floor_points(percentage * max_points / 100.0).min(floor_points(max_points))
}

/// Normalised set of skills from a comma separated list
pub fn skill_set(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|skill| skill.trim().to_lowercase())
        .filter(|skill| !skill.is_empty())
        .collect()
}

/// Experience factor, tiered against the job minimum
#[inline]
pub fn experience_score(candidate_years: u32, min_years: u32, max_points: f64) -> u32 {
    let years = candidate_years as f64;
    let min = min_years as f64;

    if years >= min {
        floor_points(max_points)
    } else if years >= min * 0.7 {
        floor_points(max_points * 0.75)
    } else if years >= min * 0.5 {
        floor_points(max_points * 0.5)
    } else {
        floor_points(max_points * 0.2)
    }
}

/// Location factor; first matching rule wins
#[inline]
pub fn location_score(
    candidate_city: &str,
    candidate_region: &str,
    job_city: &str,
    job_region: &str,
    work_mode: WorkMode,
    max_points: f64,
) -> u32 {
    if work_mode == WorkMode::Remote {
        return floor_points(max_points);
    }

    if same_place(candidate_city, job_city) {
        return floor_points(max_points);
    }

    if same_place(candidate_region, job_region) {
        return floor_points(max_points * 0.75);
    }

    if work_mode == WorkMode::Hybrid {
        return floor_points(max_points * 0.25);
    }

    0
}

/// Case-insensitive comparison that never matches on blank values
fn same_place(a: &str, b: &str) -> bool {
    let a = a.trim();
    let b = b.trim();
    !a.is_empty() && !b.is_empty() && a.to_lowercase() == b.to_lowercase()
}

/// Salary factor: desired salary against the offered range
///
/// A missing desired salary or a missing minimum is the neutral case and
/// scores half. Zero amounts count as missing.
#[inline]
pub fn salary_score(
    desired: Option<Decimal>,
    job_min: Option<Decimal>,
    job_max: Option<Decimal>,
    max_points: f64,
) -> u32 {
    let (Some(desired), Some(min)) = (to_amount(desired), to_amount(job_min)) else {
        return floor_points(max_points * 0.5);
    };
    let max = to_amount(job_max);

    if let Some(max) = max {
        if min <= desired && desired <= max {
            return floor_points(max_points);
        }
        if desired <= max * 1.2 {
            return floor_points(max_points * 0.75);
        }
    }

    if desired <= min * 1.5 {
        return floor_points(max_points * 0.5);
    }

    floor_points(max_points * 0.2)
}

fn to_amount(value: Option<Decimal>) -> Option<f64> {
    value.filter(|amount| !amount.is_zero()).and_then(|amount| amount.to_f64())
}

/// Truncate fractional points; negative and NaN inputs give 0
#[inline]
fn floor_points(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobStatus;
    use uuid::Uuid;

    fn create_test_candidate() -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            name: "Ana Souza".to_string(),
            skills: "Python, Django, React".to_string(),
            experience_years: 3,
            city: "São Paulo".to_string(),
            region: "SP".to_string(),
            desired_salary: Some(Decimal::new(5000, 0)),
        }
    }

    fn create_test_job() -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            employer_id: Uuid::new_v4(),
            title: "Backend Developer".to_string(),
            required_skills: "Python, Django, PostgreSQL".to_string(),
            min_experience_years: 3,
            city: "São Paulo".to_string(),
            region: "SP".to_string(),
            work_mode: WorkMode::OnSite,
            salary_min: Some(Decimal::new(5000, 0)),
            salary_max: Some(Decimal::new(8000, 0)),
            status: JobStatus::Open,
        }
    }

    #[test]
    fn test_reference_pair_breakdown() {
        let breakdown = score_breakdown(&create_test_candidate(), &create_test_job(), &WeightSet::default());

        assert_eq!(breakdown.skills, 26);
        assert_eq!(breakdown.experience, 25);
        assert_eq!(breakdown.location, 20);
        assert_eq!(breakdown.salary, 15);
        assert_eq!(breakdown.total, 86);
    }

    #[test]
    fn test_skills_score() {
        assert_eq!(skills_score("rust, go", " Go ,RUST", 40.0), 40);
        assert_eq!(skills_score("java", "rust, go", 40.0), 0);
        assert_eq!(skills_score("", "rust", 40.0), 0);
        assert_eq!(skills_score("rust", " , ,", 40.0), 0);
        // 1 of 4 required skills
        assert_eq!(skills_score("rust, java, kotlin", "rust, go, c, zig", 40.0), 10);
    }

    #[test]
    fn test_skills_score_is_relative_to_job() {
        // Extra candidate skills don't dilute the score
        assert_eq!(skills_score("rust, go, java, c", "rust", 40.0), 40);
        assert_eq!(skills_score("rust", "rust, go, java, c", 40.0), 10);
    }

    #[test]
    fn test_experience_tiers() {
        assert_eq!(experience_score(5, 5, 25.0), 25);
        assert_eq!(experience_score(4, 5, 25.0), 18);
        assert_eq!(experience_score(3, 5, 25.0), 12);
        assert_eq!(experience_score(2, 5, 25.0), 5);
        assert_eq!(experience_score(0, 0, 25.0), 25);
    }

    #[test]
    fn test_location_rules() {
        assert_eq!(location_score("Recife", "PE", "Porto Alegre", "RS", WorkMode::Remote, 20.0), 20);
        assert_eq!(location_score(" recife ", "PE", "Recife", "RS", WorkMode::OnSite, 20.0), 20);
        assert_eq!(location_score("Olinda", "pe", "Recife", "PE", WorkMode::OnSite, 20.0), 15);
        assert_eq!(location_score("Olinda", "PE", "Porto Alegre", "RS", WorkMode::Hybrid, 20.0), 5);
        assert_eq!(location_score("Olinda", "PE", "Porto Alegre", "RS", WorkMode::OnSite, 20.0), 0);
        assert_eq!(location_score("", "", "", "", WorkMode::OnSite, 20.0), 0);
    }

    #[test]
    fn test_salary_rules() {
        let amount = |v: i64| Some(Decimal::new(v, 0));

        assert_eq!(salary_score(amount(6000), amount(5000), amount(8000), 15.0), 15);
        assert_eq!(salary_score(amount(9000), amount(5000), amount(8000), 15.0), 11);
        assert_eq!(salary_score(amount(4000), amount(5000), amount(8000), 15.0), 11);
        assert_eq!(salary_score(amount(7000), amount(5000), None, 15.0), 7);
        assert_eq!(salary_score(amount(20000), amount(5000), amount(8000), 15.0), 3);
        assert_eq!(salary_score(None, amount(5000), amount(8000), 15.0), 7);
        assert_eq!(salary_score(amount(5000), None, amount(8000), 15.0), 7);
        assert_eq!(salary_score(Some(Decimal::ZERO), amount(5000), amount(8000), 15.0), 7);
    }

    #[test]
    fn test_total_is_clamped() {
        let weights = WeightSet {
            skills: 100.0,
            experience: 100.0,
            location: 100.0,
            salary: 100.0,
        };
        let score = compute_compatibility(&create_test_candidate(), &create_test_job(), &weights);
        assert_eq!(score, 100);
    }

    #[test]
    fn test_floor_points() {
        assert_eq!(floor_points(26.66), 26);
        assert_eq!(floor_points(-3.0), 0);
        assert_eq!(floor_points(f64::NAN), 0);
    }
}
