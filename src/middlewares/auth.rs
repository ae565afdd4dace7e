use crate::error::AppError;
use crate::utils::{Claims, JwtService};
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

// Routes reachable without a bearer token.
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
    // Authenticated even when they sit under a public prefix.
    excluded_paths: Vec<&'static str>,
    // Public for reads only; mutating verbs still need a token.
    read_only_prefixes: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec!["/", "/swagger-ui", "/swagger-ui/", "/api-docs/openapi.json"],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/", "/api/v1/auth/"],
            excluded_paths: vec![
                "/api/v1/auth/me",
                "/api/v1/auth/profile",
                "/api/v1/auth/change-password",
            ],
            read_only_prefixes: vec!["/api/v1/menu"],
        }
    }

    fn is_public(&self, method: &Method, path: &str) -> bool {
        if self
            .excluded_paths
            .iter()
            .any(|&excluded| path.starts_with(excluded))
        {
            return false;
        }

        if self.exact_paths.contains(&path) {
            return true;
        }

        if self
            .prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
        {
            return true;
        }

        (method == Method::GET || method == Method::HEAD)
            && self
                .read_only_prefixes
                .iter()
                .any(|&prefix| path.starts_with(prefix))
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS preflights carry no credentials.
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        if self.public_paths.is_public(req.method(), req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let auth_header = req.headers().get("Authorization");

        let token = if let Some(auth_value) = auth_header {
            if let Ok(auth_str) = auth_value.to_str() {
                auth_str.strip_prefix("Bearer ")
            } else {
                None
            }
        } else {
            None
        };

        if let Some(token) = token {
            match self.jwt_service.verify_access_token(token) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    let fut = self.service.call(req);
                    Box::pin(fut)
                }
                Err(_) => {
                    let error = AppError::AuthError("Invalid access token".to_string());
                    Box::pin(async move { Err(error.into()) })
                }
            }
        } else {
            let error = AppError::AuthError("Missing access token".to_string());
            Box::pin(async move { Err(error.into()) })
        }
    }
}

/// Token subject stashed by the middleware, if the request carried one.
pub fn current_username(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<Claims>().map(|c| c.sub.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_routes_are_public_but_me_is_not() {
        let paths = PublicPaths::new();
        assert!(paths.is_public(&Method::POST, "/api/v1/auth/register"));
        assert!(paths.is_public(&Method::POST, "/api/v1/auth/login"));
        assert!(!paths.is_public(&Method::GET, "/api/v1/auth/me"));
        assert!(!paths.is_public(&Method::PUT, "/api/v1/auth/profile"));
        assert!(!paths.is_public(&Method::PUT, "/api/v1/auth/change-password"));
    }

    #[test]
    fn test_menu_reads_public_writes_gated() {
        let paths = PublicPaths::new();
        assert!(paths.is_public(&Method::GET, "/api/v1/menu"));
        assert!(paths.is_public(&Method::GET, "/api/v1/menu/categories"));
        assert!(paths.is_public(&Method::GET, "/api/v1/menu/5"));
        assert!(!paths.is_public(&Method::POST, "/api/v1/menu"));
        assert!(!paths.is_public(&Method::PUT, "/api/v1/menu/5"));
        assert!(!paths.is_public(&Method::DELETE, "/api/v1/menu/5"));
    }

    #[test]
    fn test_orders_always_require_token() {
        let paths = PublicPaths::new();
        assert!(!paths.is_public(&Method::GET, "/api/v1/orders"));
        assert!(!paths.is_public(&Method::POST, "/api/v1/orders"));
        assert!(!paths.is_public(&Method::GET, "/api/v1/orders/3"));
    }
}
