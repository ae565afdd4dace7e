use crate::entities::OrderStatus;
use crate::error::AppError;
use crate::handlers::resolve_user;
use crate::models::*;
use crate::services::{AuthService, OrderService, policy};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("page_size" = Option<u32>, Query, description = "Orders per page"),
        ("status" = Option<String>, Query, description = "Filter by order status")
    ),
    responses(
        (status = 200, description = "Orders visible to the caller"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    let user = match resolve_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.list_orders(&user, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/history",
    tag = "order",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("page_size" = Option<u32>, Query, description = "Orders per page")
    ),
    responses(
        (status = 200, description = "Caller's order history, newest first"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn order_history(
    order_service: web::Data<OrderService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    let user = match resolve_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    let params = PaginationParams::new(query.page, query.page_size);
    match order_service.order_history(user.id, &params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "order",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid request or invalid menu item")
    )
)]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    let user = match resolve_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.create_order(user.id, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "order",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match resolve_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.get_order(&user, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/orders/{id}",
    tag = "order",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn update_order(
    order_service: web::Data<OrderService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse> {
    let user = match resolve_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service
        .update_order(&user, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "order",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn delete_order(
    order_service: web::Data<OrderService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match resolve_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.delete_order(&user, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Order deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    tag = "order",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Illegal status transition")
    )
)]
pub async fn update_order_status(
    order_service: web::Data<OrderService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    let user = match resolve_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = policy::require_admin(&user) {
        return Ok(e.error_response());
    }

    match order_service
        .update_status(path.into_inner(), request.status)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/status/{status}",
    tag = "order",
    security(("bearer_auth" = [])),
    params(
        ("status" = String, Path, description = "Order status"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("page_size" = Option<u32>, Query, description = "Orders per page")
    ),
    responses(
        (status = 200, description = "All orders with the given status"),
        (status = 403, description = "Administrator privileges required"),
        (status = 422, description = "Unknown status")
    )
)]
pub async fn list_orders_by_status(
    order_service: web::Data<OrderService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    let user = match resolve_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = policy::require_admin(&user) {
        return Ok(e.error_response());
    }

    let raw = path.into_inner();
    let Some(status) = OrderStatus::parse(&raw) else {
        return Ok(
            AppError::ValidationError(format!("Unknown order status: {raw}")).error_response(),
        );
    };

    let params = PaginationParams::new(query.page, query.page_size);
    match order_service.list_by_status(status, &params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(list_orders))
            .route("", web::post().to(create_order))
            .route("/history", web::get().to(order_history))
            .route("/status/{status}", web::get().to(list_orders_by_status))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}", web::put().to(update_order))
            .route("/{id}", web::delete().to(delete_order))
            .route("/{id}/status", web::patch().to(update_order_status)),
    );
}
