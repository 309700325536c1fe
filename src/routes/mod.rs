// Route exports
pub mod matches;

use actix_web::{web, HttpRequest, HttpResponse};

use crate::models::ErrorResponse;

/// Mount the API under `/api/v1`; unknown paths get a JSON 404
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .default_service(web::to(not_found)),
    );
}

async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Not found".to_string(),
        message: format!("No route for {} {}", req.method(), req.path()),
        status_code: 404,
    })
}
