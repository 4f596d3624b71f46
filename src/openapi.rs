use utoipa::OpenApi;

use crate::models::{
    CreateUserRequest, DeletedUserResponse, ErrorResponse, HealthResponse, UpdateUserRequest,
    UserResponse,
};

/// OpenAPI documentation for the User CRUD API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User CRUD API",
        version = "1.0.0",
        description = "REST API for creating, listing, updating and deleting users backed by PostgreSQL."
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Users", description = "User CRUD endpoints")
    ),
    paths(
        crate::handlers::get_users,
        crate::handlers::get_user,
        crate::handlers::create_user,
        crate::handlers::update_user,
        crate::handlers::delete_user,
        crate::routes::health_check
    ),
    components(
        schemas(
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            DeletedUserResponse,
            ErrorResponse,
            HealthResponse
        )
    )
)]
pub struct ApiDoc;
