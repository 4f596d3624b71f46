//! User handlers for the CRUD endpoints.

use actix_web::{web, HttpResponse};
use log::{debug, info, warn};
use validator::Validate;

use crate::constants::{
    CODE_INVALID_USER_ID, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, ERR_INVALID_USER_ID,
    MAX_PAGE_SIZE, MSG_USERS_RETRIEVED, MSG_USER_CREATED, MSG_USER_DELETED, MSG_USER_RETRIEVED,
    MSG_USER_UPDATED,
};
use crate::errors::ApiError;
use crate::models::{
    ApiResponse, CreateUserRequest, DeletedUserResponse, PaginatedResponse, UpdateUserRequest,
    UserResponse,
};
use crate::services::UserService;
use crate::validators::validation_errors_to_api_error;

/// Query parameters for listing users.
///
/// Built from the raw key/value pairs so that malformed or repeated values
/// fall back to defaults instead of failing extraction.
#[derive(Debug, Default)]
pub struct UserListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl UserListQuery {
    /// The first occurrence of each key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" if query.page.is_none() => query.page = Some(value),
                "limit" if query.limit.is_none() => query.limit = Some(value),
                _ => {}
            }
        }
        query
    }

    pub fn page(&self) -> i64 {
        positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE_NUMBER as i64)
    }

    pub fn limit(&self) -> i64 {
        positive(self.limit.as_deref())
            .unwrap_or(DEFAULT_PAGE_SIZE as i64)
            .min(MAX_PAGE_SIZE as i64)
    }
}

fn positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
}

fn parse_user_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| {
        warn!("Rejected malformed user id: {:?}", raw);
        ApiError::BadRequest {
            code: CODE_INVALID_USER_ID.to_string(),
            message: ERR_INVALID_USER_ID.to_string(),
        }
    })
}

/// List users with pagination
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "One page of users with total, page, limit and total_pages", body = [UserResponse]),
        (status = 504, description = "Data store timeout", body = crate::models::ErrorResponse)
    )
)]
pub async fn get_users(
    user_service: web::Data<UserService>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, ApiError> {
    let query = UserListQuery::from_pairs(query.into_inner());
    let page = query.page();
    let limit = query.limit();
    debug!("Listing users page {} limit {}", page, limit);

    let result = user_service
        .get_all_users(page, limit)
        .await?;
    let users: Vec<UserResponse> = result.users.into_iter().map(UserResponse::from).collect();

    Ok(HttpResponse::Ok().json(PaginatedResponse::new(
        MSG_USERS_RETRIEVED,
        users,
        result.total,
        result.page,
        result.limit,
    )))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Malformed ID", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    )
)]
pub async fn get_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = parse_user_id(&path.into_inner())?;
    debug!("Fetching user with id: {}", user_id);

    let user = user_service.get_user_by_id(user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_USER_RETRIEVED,
        UserResponse::from(user),
    )))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 409, description = "Email already exists", body = crate::models::ErrorResponse)
    )
)]
pub async fn create_user(
    user_service: web::Data<UserService>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(|e| {
        let err = validation_errors_to_api_error(e);
        warn!("Validation failed for create user: {}", err);
        err
    })?;

    let user = user_service.create_user(body.into_inner()).await?;
    info!("Created user: {}", user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        MSG_USER_CREATED,
        UserResponse::from(user),
    )))
}

/// Update a user
///
/// Only the fields present in the body are changed.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse),
        (status = 409, description = "Email already exists", body = crate::models::ErrorResponse)
    )
)]
pub async fn update_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let user_id = parse_user_id(&path.into_inner())?;

    body.validate().map_err(|e| {
        let err = validation_errors_to_api_error(e);
        warn!("Validation failed for update user {}: {}", user_id, err);
        err
    })?;

    let user = user_service
        .update_user(user_id, body.into_inner())
        .await?;
    info!("Updated user: {}", user_id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_USER_UPDATED,
        UserResponse::from(user),
    )))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = DeletedUserResponse),
        (status = 400, description = "Malformed ID", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    )
)]
pub async fn delete_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = parse_user_id(&path.into_inner())?;

    user_service.delete_user(user_id).await?;
    info!("Deleted user: {}", user_id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_USER_DELETED,
        DeletedUserResponse { id: user_id },
    )))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        CODE_EMAIL_EXISTS, CODE_INVALID_BODY, CODE_USER_NOT_FOUND, CODE_VALIDATION_FAILED,
    };
    use crate::repositories::memory::InMemoryUserRepository;
    use crate::routes::configure_routes;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    fn user_service(repo: Arc<InMemoryUserRepository>) -> web::Data<UserService> {
        web::Data::new(UserService::new(repo, Duration::from_secs(5), 4))
    }

    macro_rules! app {
        ($repo:expr) => {
            test::init_service(
                App::new()
                    .app_data(user_service($repo.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_create_user_returns_201_without_hash() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(repo);

        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "password": "secret1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], MSG_USER_CREATED);
        assert_eq!(body["data"]["email"], "jane@example.com");
        assert!(body["data"]["id"].as_i64().unwrap() > 0);
        assert!(body["data"].get("password_hash").is_none());
        assert!(body["data"].get("password").is_none());
        assert_eq!(repo.len(), 1);
    }

    #[actix_web::test]
    async fn test_create_user_validation_failure() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(repo);

        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({ "name": "", "email": "nope", "password": "123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], CODE_VALIDATION_FAILED);
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);
        assert_eq!(repo.len(), 0);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_400_envelope() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(repo);

        let req = test::TestRequest::post()
            .uri("/api/users")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"name\": \"Jane\",")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], CODE_INVALID_BODY);
    }

    #[actix_web::test]
    async fn test_duplicate_email_is_409() {
        let repo = Arc::new(InMemoryUserRepository::new());
        repo.seed("Jane", "jane@example.com");
        let app = app!(repo);

        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({
                "name": "Other Jane",
                "email": "jane@example.com",
                "password": "secret1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], CODE_EMAIL_EXISTS);
        assert_eq!(repo.len(), 1);
    }

    #[actix_web::test]
    async fn test_get_user_by_id() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = repo.seed("Jane", "jane@example.com");
        let app = app!(repo);

        let req = test::TestRequest::get()
            .uri(&format!("/api/users/{}", user.id))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["id"], user.id);
        assert_eq!(body["data"]["name"], "Jane");
    }

    #[actix_web::test]
    async fn test_malformed_id_is_400() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(repo);

        for req in [
            test::TestRequest::get().uri("/api/users/abc").to_request(),
            test::TestRequest::delete().uri("/api/users/1.5").to_request(),
            test::TestRequest::put()
                .uri("/api/users/x")
                .set_json(json!({ "name": "Jane" }))
                .to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["code"], CODE_INVALID_USER_ID);
        }
    }

    #[actix_web::test]
    async fn test_missing_user_is_404() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(repo);

        let req = test::TestRequest::get().uri("/api/users/42").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], CODE_USER_NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_list_pagination_pages_are_disjoint() {
        let repo = Arc::new(InMemoryUserRepository::new());
        for i in 0..25 {
            repo.seed(&format!("User {}", i), &format!("user{}@example.com", i));
        }
        let app = app!(repo);

        let mut seen = Vec::new();
        for (page, expected) in [(1, 10), (2, 10), (3, 5)] {
            let req = test::TestRequest::get()
                .uri(&format!("/api/users?page={}&limit=10", page))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;

            assert_eq!(body["total"], 25);
            assert_eq!(body["page"], page);
            assert_eq!(body["limit"], 10);
            assert_eq!(body["total_pages"], 3);

            let ids: Vec<i64> = body["data"]
                .as_array()
                .unwrap()
                .iter()
                .map(|u| u["id"].as_i64().unwrap())
                .collect();
            assert_eq!(ids.len(), expected);
            assert!(ids.iter().all(|id| !seen.contains(id)));
            seen.extend(ids);
        }
        assert_eq!(seen.len(), 25);
    }

    #[actix_web::test]
    async fn test_list_ignores_invalid_pagination() {
        let repo = Arc::new(InMemoryUserRepository::new());
        for i in 0..12 {
            repo.seed(&format!("User {}", i), &format!("user{}@example.com", i));
        }
        let app = app!(repo);

        let req = test::TestRequest::get()
            .uri("/api/users?page=-1&limit=abc")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 10);
        assert_eq!(body["data"].as_array().unwrap().len(), 10);
    }

    #[actix_web::test]
    async fn test_list_with_repeated_keys_uses_envelope() {
        let repo = Arc::new(InMemoryUserRepository::new());
        for i in 0..3 {
            repo.seed(&format!("User {}", i), &format!("user{}@example.com", i));
        }
        let app = app!(repo);

        let req = test::TestRequest::get()
            .uri("/api/users?page=1&page=2&limit=2&limit=50")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_list_far_past_the_end_is_empty() {
        let repo = Arc::new(InMemoryUserRepository::new());
        repo.seed("Jane", "jane@example.com");
        let app = app!(repo);

        let req = test::TestRequest::get()
            .uri("/api/users?page=9223372036854775807")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["page"], i64::MAX);
        assert_eq!(body["total"], 1);
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_update_user_partial() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = repo.seed("Jane", "jane@example.com");
        let app = app!(repo);

        let req = test::TestRequest::put()
            .uri(&format!("/api/users/{}", user.id))
            .set_json(json!({ "name": "Jane Smith" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], MSG_USER_UPDATED);
        assert_eq!(body["data"]["name"], "Jane Smith");
        assert_eq!(body["data"]["email"], "jane@example.com");
    }

    #[actix_web::test]
    async fn test_update_to_taken_email_is_409() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let jane = repo.seed("Jane", "jane@example.com");
        repo.seed("John", "john@example.com");
        let app = app!(repo);

        let req = test::TestRequest::put()
            .uri(&format!("/api/users/{}", jane.id))
            .set_json(json!({ "email": "john@example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(repo.get(jane.id).unwrap().email, "jane@example.com");
    }

    #[actix_web::test]
    async fn test_delete_then_get_is_404() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = repo.seed("Jane", "jane@example.com");
        let app = app!(repo);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", user.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["id"], user.id);

        let req = test::TestRequest::get()
            .uri(&format!("/api/users/{}", user.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", user.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
