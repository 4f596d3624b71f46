use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest, HttpResponse};
use log::warn;
use utoipa::OpenApi;

use crate::constants::{
    CODE_INVALID_BODY, CODE_NOT_FOUND, ERR_NOT_FOUND, MSG_SERVER_RUNNING,
};
use crate::errors::ApiError;
use crate::handlers;
use crate::models::HealthResponse;
use crate::openapi::ApiDoc;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        // Health check
        .route("/health", web::get().to(health_check))
        // Generated API document
        .route("/api-docs/openapi.json", web::get().to(openapi_json))
        .service(
            web::scope("/api/users")
                // List users with pagination
                .route("", web::get().to(handlers::get_users))
                // Create a user
                .route("", web::post().to(handlers::create_user))
                // Get specific user by ID
                .route("/{id}", web::get().to(handlers::get_user))
                // Update user fields
                .route("/{id}", web::put().to(handlers::update_user))
                // Delete user
                .route("/{id}", web::delete().to(handlers::delete_user)),
        )
        .default_service(web::to(not_found));
}

/// Body decode failures answer with the standard 400 envelope.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected request body: {}", err);
    ApiError::BadRequest {
        code: CODE_INVALID_BODY.to_string(),
        message: err.to_string(),
    }
    .into()
}

async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound {
        code: CODE_NOT_FOUND.to_string(),
        message: ERR_NOT_FOUND.to_string(),
    })
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server is running", body = HealthResponse)
    )
)]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
        message: MSG_SERVER_RUNNING.to_string(),
    })
}

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
