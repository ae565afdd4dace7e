use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Menu item {0} does not exist or is unavailable")]
    InvalidMenuItem(i64),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message): (StatusCode, &str, String) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                (StatusCode::UNAUTHORIZED, "AUTH_ERROR", msg.clone())
            }
            AppError::JwtError(err) => {
                log::warn!("Token rejected: {err}");
                (
                    StatusCode::UNAUTHORIZED,
                    "AUTH_ERROR",
                    "Could not validate credentials".to_string(),
                )
            }
            AppError::Forbidden(msg) => {
                log::warn!("Forbidden: {msg}");
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Conflict(msg) => {
                log::warn!("Conflict: {msg}");
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::InvalidMenuItem(id) => {
                log::warn!("Order referenced invalid menu item {id}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INVALID_MENU_ITEM",
                    self.to_string(),
                )
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        let cases = [
            (
                AppError::ValidationError("bad".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::AuthError("no token".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::Forbidden("admin only".into()),
                StatusCode::FORBIDDEN,
            ),
            (AppError::NotFound("order".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                AppError::InvalidMenuItem(7),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::InternalError("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.error_response().status(), status, "{err}");
        }
    }

    #[test]
    fn test_invalid_menu_item_message_names_the_id() {
        let err = AppError::InvalidMenuItem(42);
        assert!(err.to_string().contains("42"));
    }
}
