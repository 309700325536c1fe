// Criterion benchmarks for TalentMatch

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use std::sync::Arc;
use talentmatch::core::scoring::{compute_compatibility, skill_set};
use talentmatch::core::MatchMaterializer;
use talentmatch::models::{Candidate, JobPosting, JobStatus, WeightSet, WorkMode};
use talentmatch::services::InMemoryStore;
use tokio::runtime::Runtime;
use uuid::Uuid;

const SKILL_POOL: [&str; 8] = ["Python", "Django", "React", "Rust", "SQL", "Go", "Docker", "AWS"];
const CITIES: [(&str, &str); 4] = [
    ("São Paulo", "SP"),
    ("Campinas", "SP"),
    ("Recife", "PE"),
    ("Curitiba", "PR"),
];

fn skills_for(i: usize, count: usize) -> String {
    (0..count)
        .map(|k| SKILL_POOL[(i + k * 3) % SKILL_POOL.len()])
        .collect::<Vec<_>>()
        .join(", ")
}

fn create_candidate(i: usize) -> Candidate {
    let (city, region) = CITIES[i % CITIES.len()];
    Candidate {
        id: Uuid::new_v4(),
        name: format!("Candidate {}", i),
        skills: skills_for(i, 4),
        experience_years: (i % 8) as u32,
        city: city.to_string(),
        region: region.to_string(),
        desired_salary: Some(Decimal::new(4000 + (i as i64 % 6) * 1000, 0)),
    }
}

fn create_job(i: usize) -> JobPosting {
    let (city, region) = CITIES[(i + 1) % CITIES.len()];
    let work_mode = match i % 3 {
        0 => WorkMode::Remote,
        1 => WorkMode::Hybrid,
        _ => WorkMode::OnSite,
    };
    JobPosting {
        id: Uuid::new_v4(),
        employer_id: Uuid::new_v4(),
        title: format!("Job {}", i),
        required_skills: skills_for(i + 1, 3),
        min_experience_years: (i % 5) as u32,
        city: city.to_string(),
        region: region.to_string(),
        work_mode,
        salary_min: Some(Decimal::new(5000, 0)),
        salary_max: Some(Decimal::new(8000, 0)),
        status: JobStatus::Open,
    }
}

fn bench_compute_compatibility(c: &mut Criterion) {
    let candidate = create_candidate(1);
    let job = create_job(1);
    let weights = WeightSet::default();

    c.bench_function("compute_compatibility", |b| {
        b.iter(|| compute_compatibility(black_box(&candidate), black_box(&job), black_box(&weights)));
    });
}

fn bench_skill_set(c: &mut Criterion) {
    let raw = skills_for(0, 8);

    c.bench_function("skill_set_parsing", |b| {
        b.iter(|| skill_set(black_box(&raw)));
    });
}

fn bench_generation(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let mut group = c.benchmark_group("generation");

    for job_count in [10, 100, 500].iter() {
        let store = InMemoryStore::new();
        let candidate = create_candidate(0);
        store.put_candidate(candidate.clone()).unwrap();
        for i in 0..*job_count {
            store.put_job(create_job(i)).unwrap();
        }
        let materializer = MatchMaterializer::with_default_weights(Arc::new(store));

        // First pass creates the records, the measured passes refresh them
        runtime
            .block_on(materializer.generate_matches_for_candidate(candidate.id, 50))
            .unwrap();

        group.bench_with_input(
            BenchmarkId::new("generate_matches_for_candidate", job_count),
            job_count,
            |b, _| {
                b.iter(|| {
                    runtime
                        .block_on(materializer.generate_matches_for_candidate(black_box(candidate.id), 50))
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_compute_compatibility, bench_skill_set, bench_generation);

criterion_main!(benches);
