use crate::config::CorsConfig;
use actix_cors::Cors;

/// CORS layer driven by the configured allow-list; an empty list means any
/// origin is reflected (local development).
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    if config.allowed_origins.is_empty() {
        cors = cors.allowed_origin_fn(|_, _req_head| true);
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
