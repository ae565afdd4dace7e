pub mod auth;
pub mod cors;

pub use auth::{AuthMiddleware, current_username};
pub use cors::create_cors;
