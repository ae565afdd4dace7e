pub mod auth;
pub mod menu;
pub mod order;

pub use auth::auth_config;
pub use menu::menu_config;
pub use order::order_config;

use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::middlewares::current_username;
use crate::services::AuthService;
use actix_web::{HttpRequest, HttpResponse, Result};
use serde_json::json;

/// Resolves the middleware-verified token subject to a live, active user.
pub(crate) async fn resolve_user(
    auth_service: &AuthService,
    req: &HttpRequest,
) -> AppResult<users::Model> {
    let username = current_username(req)
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))?;
    auth_service.resolve_active_user(&username).await
}

pub async fn service_info() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "name": "Food Order Backend",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/swagger-ui/",
        "api": "/api/v1"
    })))
}
