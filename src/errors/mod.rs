use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use std::fmt;

use crate::constants::{
    CODE_EMAIL_EXISTS, CODE_INTERNAL_ERROR, CODE_TIMEOUT, CODE_USER_NOT_FOUND, ERR_BAD_REQUEST,
    ERR_CONFLICT, ERR_EMAIL_EXISTS, ERR_INTERNAL, ERR_NOT_FOUND, ERR_STORE_TIMEOUT, ERR_TIMEOUT,
    ERR_UNEXPECTED, ERR_USER_NOT_FOUND, ERR_VALIDATION_FAILED,
};
use crate::models::ErrorResponse;
use crate::repositories::RepositoryError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    ValidationError { code: String, errors: Vec<String> },
    NotFound { code: String, message: String },
    Conflict { code: String, message: String },
    Timeout { code: String, message: String },
    InternalServerError { code: String, message: String },
}

impl ApiError {
    pub fn user_not_found() -> Self {
        ApiError::NotFound {
            code: CODE_USER_NOT_FOUND.to_string(),
            message: ERR_USER_NOT_FOUND.to_string(),
        }
    }

    pub fn email_exists() -> Self {
        ApiError::Conflict {
            code: CODE_EMAIL_EXISTS.to_string(),
            message: ERR_EMAIL_EXISTS.to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::InternalServerError {
            code: CODE_INTERNAL_ERROR.to_string(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ApiError::BadRequest { code, .. }
            | ApiError::ValidationError { code, .. }
            | ApiError::NotFound { code, .. }
            | ApiError::Conflict { code, .. }
            | ApiError::Timeout { code, .. }
            | ApiError::InternalServerError { code, .. } => code,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest { code, message } => {
                write!(f, "Bad Request [{}]: {}", code, message)
            }
            ApiError::ValidationError { code, errors } => {
                write!(f, "Validation Error [{}]: {:?}", code, errors)
            }
            ApiError::NotFound { code, message } => {
                write!(f, "Not Found [{}]: {}", code, message)
            }
            ApiError::Conflict { code, message } => {
                write!(f, "Conflict [{}]: {}", code, message)
            }
            ApiError::Timeout { code, message } => {
                write!(f, "Timeout [{}]: {}", code, message)
            }
            ApiError::InternalServerError { code, message } => {
                write!(f, "Internal Server Error [{}]: {}", code, message)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } | ApiError::ValidationError { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (message, detail, errors) = match self {
            ApiError::BadRequest { message, .. } => (ERR_BAD_REQUEST, message.clone(), None),
            ApiError::ValidationError { errors, .. } => (
                ERR_VALIDATION_FAILED,
                errors.join("; "),
                Some(errors.clone()),
            ),
            ApiError::NotFound { message, .. } => (ERR_NOT_FOUND, message.clone(), None),
            ApiError::Conflict { message, .. } => (ERR_CONFLICT, message.clone(), None),
            ApiError::Timeout { message, .. } => (ERR_TIMEOUT, message.clone(), None),
            ApiError::InternalServerError { code, message } => {
                // Driver and store detail stays in the logs.
                error!("Internal server error [{}]: {}", code, message);
                (ERR_INTERNAL, ERR_UNEXPECTED.to_string(), None)
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            code: self.code().to_string(),
            message: message.to_string(),
            error: detail,
            errors,
        })
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => ApiError::user_not_found(),
            RepositoryError::UniqueViolation(_) => ApiError::email_exists(),
            RepositoryError::Timeout { .. } => ApiError::Timeout {
                code: CODE_TIMEOUT.to_string(),
                message: ERR_STORE_TIMEOUT.to_string(),
            },
            RepositoryError::Query { .. } => ApiError::internal(err.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::internal(err.to_string())
    }
}
