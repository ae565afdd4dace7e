use crate::handlers::resolve_user;
use crate::models::*;
use crate::services::{AuthService, MenuService, policy};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/menu",
    tag = "menu",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("page_size" = Option<u32>, Query, description = "Items per page"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("available_only" = Option<bool>, Query, description = "Only available items"),
        ("search" = Option<String>, Query, description = "Search in name and description")
    ),
    responses(
        (status = 200, description = "Menu items page")
    )
)]
pub async fn list_items(
    menu_service: web::Data<MenuService>,
    query: web::Query<MenuQuery>,
) -> Result<HttpResponse> {
    match menu_service.list_items(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/menu/categories",
    tag = "menu",
    responses(
        (status = 200, description = "Distinct category names")
    )
)]
pub async fn list_categories(menu_service: web::Data<MenuService>) -> Result<HttpResponse> {
    match menu_service.list_categories().await {
        Ok(categories) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": categories
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/menu/{id}",
    tag = "menu",
    params(("id" = i64, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item", body = MenuItemResponse),
        (status = 404, description = "Menu item not found")
    )
)]
pub async fn get_item(
    menu_service: web::Data<MenuService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match menu_service.get_item(path.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": item
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/menu",
    tag = "menu",
    security(("bearer_auth" = [])),
    request_body = CreateMenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = MenuItemResponse),
        (status = 403, description = "Administrator privileges required"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn create_item(
    menu_service: web::Data<MenuService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    request: web::Json<CreateMenuItemRequest>,
) -> Result<HttpResponse> {
    let user = match resolve_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = policy::require_admin(&user) {
        return Ok(e.error_response());
    }

    match menu_service.create_item(request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": item
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/menu/{id}",
    tag = "menu",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Menu item id")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated", body = MenuItemResponse),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Menu item not found")
    )
)]
pub async fn update_item(
    menu_service: web::Data<MenuService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateMenuItemRequest>,
) -> Result<HttpResponse> {
    let user = match resolve_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = policy::require_admin(&user) {
        return Ok(e.error_response());
    }

    match menu_service
        .update_item(path.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": item
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/menu/{id}",
    tag = "menu",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item deleted"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Menu item not found"),
        (status = 409, description = "Menu item is referenced by existing orders")
    )
)]
pub async fn delete_item(
    menu_service: web::Data<MenuService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = match resolve_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = policy::require_admin(&user) {
        return Ok(e.error_response());
    }

    match menu_service.delete_item(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Menu item deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn menu_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/menu")
            .route("", web::get().to(list_items))
            .route("", web::post().to(create_item))
            .route("/categories", web::get().to(list_categories))
            .route("/{id}", web::get().to(get_item))
            .route("/{id}", web::put().to(update_item))
            .route("/{id}", web::delete().to(delete_item)),
    );
}
