use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::OrderStatus;
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::update_profile,
        handlers::auth::change_password,
        handlers::menu::list_items,
        handlers::menu::list_categories,
        handlers::menu::get_item,
        handlers::menu::create_item,
        handlers::menu::update_item,
        handlers::menu::delete_item,
        handlers::order::list_orders,
        handlers::order::order_history,
        handlers::order::create_order,
        handlers::order::get_order,
        handlers::order::update_order,
        handlers::order::delete_order,
        handlers::order::update_order_status,
        handlers::order::list_orders_by_status,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            UserResponse,
            AuthResponse,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuItemResponse,
            OrderStatus,
            OrderItemRequest,
            CreateOrderRequest,
            UpdateOrderRequest,
            UpdateOrderStatusRequest,
            OrderItemResponse,
            OrderResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and profile"),
        (name = "menu", description = "Menu catalog"),
        (name = "order", description = "Order workflow")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
