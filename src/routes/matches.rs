use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{resolve_weights, score_breakdown, MatchError, MatchMaterializer};
use crate::models::{
    CompatibilityRequest, CompatibilityResponse, ErrorResponse, GenerateQuery, HealthResponse, Match,
    MatchListResponse, RecomputeQuery, RecomputeResponse, SeedResponse, UpdateInterestRequest,
    UpdateStatusRequest,
};
use crate::services::{CacheKey, CacheManager};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub materializer: Arc<MatchMaterializer>,
    /// Absent when Redis was unreachable at startup
    pub cache: Option<Arc<CacheManager>>,
    pub matching: MatchingSettings,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/compatibility", web::post().to(compatibility))
        .route("/matches/candidates/{id}/generate", web::post().to(generate_for_candidate))
        .route("/matches/jobs/{id}/generate", web::post().to(generate_for_job))
        .route("/matches/candidates/{id}", web::get().to(list_for_candidate))
        .route("/matches/jobs/{id}", web::get().to(list_for_job))
        .route("/matches/recompute", web::post().to(recompute))
        .route("/matches/seed", web::post().to(seed))
        .route("/matches/{id}/status", web::patch().to(update_status))
        .route("/matches/{id}/interest", web::patch().to(update_interest));
}

fn error_body(status: u16, error: &str, message: String) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status,
    }
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(error_body(400, "Validation failed", errors.to_string()))
}

fn match_error_response(err: MatchError) -> HttpResponse {
    match err {
        MatchError::NotFound(what) => {
            HttpResponse::NotFound().json(error_body(404, "Not found", what))
        }
        err @ MatchError::InvalidTransition { .. } => {
            HttpResponse::Conflict().json(error_body(409, "Invalid status transition", err.to_string()))
        }
        MatchError::Store(e) => {
            tracing::error!("Store failure: {}", e);
            HttpResponse::InternalServerError().json(error_body(500, "Store failure", e.to_string()))
        }
    }
}

/// Drop cached listings touched by a set of matches
async fn invalidate_listings(state: &AppState, matches: &[Match]) {
    if let Some(cache) = &state.cache {
        if let Err(e) = cache.invalidate_matches(matches).await {
            tracing::warn!("Failed to invalidate cache: {}", e);
        }
    }
}

async fn invalidate_all_listings(state: &AppState) {
    if let Some(cache) = &state.cache {
        if let Err(e) = cache.invalidate_all().await {
            tracing::warn!("Failed to invalidate cache: {}", e);
        }
    }
}

/// Cached listing for a key; cache failures read as a miss
async fn cached_listing(state: &AppState, key: &str) -> Option<MatchListResponse> {
    let cache = state.cache.as_ref()?;
    match cache.listing(key).await {
        Ok(listing) => listing,
        Err(e) => {
            tracing::warn!("Failed to read cached listing {}: {}", key, e);
            None
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state
        .materializer
        .store()
        .health_check()
        .await
        .unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: state.cache.is_some(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score an inline candidate/job pair
///
/// POST /api/v1/compatibility
///
/// Request body:
/// ```json
/// {
///   "candidate": { "skills": "Python, Django", "experienceYears": 3, ... },
///   "job": { "requiredSkills": "Python", "workMode": "remote", ... },
///   "weights": { "skills": 40, "experience": 25, "location": 20, "salary": 15 }
/// }
/// ```
async fn compatibility(
    state: web::Data<AppState>,
    req: web::Json<CompatibilityRequest>,
) -> impl Responder {
    let weights = match &req.weights {
        Some(raw) => resolve_weights(raw),
        None => *state.materializer.weights(),
    };

    let breakdown = score_breakdown(&req.candidate, &req.job, &weights);

    tracing::debug!("Ad-hoc compatibility: {:?}", breakdown);

    HttpResponse::Ok().json(CompatibilityResponse {
        score: breakdown.total,
        breakdown,
        weights,
    })
}

/// Generate matches for a candidate against all open jobs
///
/// POST /api/v1/matches/candidates/{id}/generate?minScore=50
async fn generate_for_candidate(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<GenerateQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let candidate_id = path.into_inner();
    let min_score = query.min_score.unwrap_or(state.matching.default_min_score);

    match state
        .materializer
        .generate_matches_for_candidate(candidate_id, min_score)
        .await
    {
        Ok(matches) => {
            invalidate_listings(&state, &matches).await;
            HttpResponse::Ok().json(MatchListResponse::new(matches))
        }
        Err(e) => match_error_response(e),
    }
}

/// Generate matches for a job against all candidates
///
/// POST /api/v1/matches/jobs/{id}/generate?minScore=50
async fn generate_for_job(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<GenerateQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let job_id = path.into_inner();
    let min_score = query.min_score.unwrap_or(state.matching.default_min_score);

    match state.materializer.generate_matches_for_job(job_id, min_score).await {
        Ok(matches) => {
            invalidate_listings(&state, &matches).await;
            HttpResponse::Ok().json(MatchListResponse::new(matches))
        }
        Err(e) => match_error_response(e),
    }
}

/// Stored matches of a candidate, cached
///
/// GET /api/v1/matches/candidates/{id}
async fn list_for_candidate(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let candidate_id = path.into_inner();
    let key = CacheKey::candidate_matches(candidate_id);

    if let Some(cached) = cached_listing(&state, &key).await {
        return HttpResponse::Ok().json(cached);
    }

    match state.materializer.ranked_matches_for_candidate(candidate_id).await {
        Ok(matches) => respond_and_cache(&state, &key, MatchListResponse::new(matches)).await,
        Err(e) => match_error_response(e),
    }
}

/// Stored matches of a job, cached
///
/// GET /api/v1/matches/jobs/{id}
async fn list_for_job(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let job_id = path.into_inner();
    let key = CacheKey::job_matches(job_id);

    if let Some(cached) = cached_listing(&state, &key).await {
        return HttpResponse::Ok().json(cached);
    }

    match state.materializer.ranked_matches_for_job(job_id).await {
        Ok(matches) => respond_and_cache(&state, &key, MatchListResponse::new(matches)).await,
        Err(e) => match_error_response(e),
    }
}

async fn respond_and_cache(state: &AppState, key: &str, response: MatchListResponse) -> HttpResponse {
    if let Some(cache) = &state.cache {
        if let Err(e) = cache.store_listing(key, &response).await {
            tracing::warn!("Failed to cache {}: {}", key, e);
        }
    }

    HttpResponse::Ok().json(response)
}

/// Recompute stored scores
///
/// POST /api/v1/matches/recompute[?offset=0&limit=500]
///
/// Without a page the whole match table is swept.
async fn recompute(state: web::Data<AppState>, query: web::Query<RecomputeQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let result = match (query.offset, query.limit) {
        (Some(offset), Some(limit)) => state.materializer.recompute_matches_page(offset, limit).await,
        _ => state.materializer.recompute_all_matches().await,
    };

    match result {
        Ok(updated) => {
            if updated > 0 {
                invalidate_all_listings(&state).await;
            }
            HttpResponse::Ok().json(RecomputeResponse { updated })
        }
        Err(e) => match_error_response(e),
    }
}

/// Create missing matches for every candidate/job pair
///
/// POST /api/v1/matches/seed?minScore=40
async fn seed(state: web::Data<AppState>, query: web::Query<GenerateQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let min_score = query.min_score.unwrap_or(state.matching.seed_min_score);

    match state.materializer.generate_all_matches(min_score).await {
        Ok(created) => {
            if created > 0 {
                invalidate_all_listings(&state).await;
            }
            HttpResponse::Ok().json(SeedResponse { created })
        }
        Err(e) => match_error_response(e),
    }
}

/// Move a match along its workflow
///
/// PATCH /api/v1/matches/{id}/status
///
/// Request body:
/// ```json
/// { "status": "accepted|rejected|interviewing|hired" }
/// ```
async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateStatusRequest>,
) -> impl Responder {
    match state.materializer.update_status(path.into_inner(), req.status).await {
        Ok(record) => {
            invalidate_listings(&state, std::slice::from_ref(&record)).await;
            HttpResponse::Ok().json(record)
        }
        Err(e) => match_error_response(e),
    }
}

/// Flag interest from one side of a match
///
/// PATCH /api/v1/matches/{id}/interest
///
/// Request body:
/// ```json
/// { "side": "candidate|employer", "interested": true }
/// ```
async fn update_interest(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateInterestRequest>,
) -> impl Responder {
    match state
        .materializer
        .set_interest(path.into_inner(), req.side, req.interested)
        .await
    {
        Ok(record) => {
            invalidate_listings(&state, std::slice::from_ref(&record)).await;
            HttpResponse::Ok().json(record)
        }
        Err(e) => match_error_response(e),
    }
}
