use crate::entities::{menu_item_entity as menu_items, order_item_entity as order_items};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct MenuService {
    pool: DatabaseConnection,
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::ValidationError("Name cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> AppResult<()> {
    if price <= Decimal::ZERO {
        return Err(AppError::ValidationError("Price must be positive".to_string()));
    }
    Ok(())
}

impl MenuService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_item(&self, request: CreateMenuItemRequest) -> AppResult<MenuItemResponse> {
        validate_name(&request.name)?;
        validate_price(request.price)?;

        let item = menu_items::ActiveModel {
            name: Set(request.name.trim().to_string()),
            description: Set(request.description),
            price: Set(request.price),
            category: Set(request.category),
            is_available: Set(request.is_available.unwrap_or(true)),
            image_url: Set(request.image_url),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(MenuItemResponse::from(item))
    }

    /// Category, availability and search compose as AND predicates; search
    /// matches name OR description, case-insensitively.
    pub async fn list_items(
        &self,
        query: &MenuQuery,
    ) -> AppResult<PaginatedResponse<MenuItemResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut condition = Condition::all();
        if let Some(category) = &query.category {
            condition = condition.add(menu_items::Column::Category.eq(category.as_str()));
        }
        if query.available_only.unwrap_or(false) {
            condition = condition.add(menu_items::Column::IsAvailable.eq(true));
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{search}%");
            condition = condition.add(
                Condition::any()
                    .add(
                        Expr::col((menu_items::Entity, menu_items::Column::Name))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((menu_items::Entity, menu_items::Column::Description))
                            .ilike(pattern),
                    ),
            );
        }

        let base_query = menu_items::Entity::find().filter(condition);
        let total = base_query.clone().count(&self.pool).await? as i64;

        let items = base_query
            .order_by_asc(menu_items::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(MenuItemResponse::from).collect(),
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    pub async fn get_item(&self, item_id: i64) -> AppResult<MenuItemResponse> {
        let item = menu_items::Entity::find_by_id(item_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))?;
        Ok(MenuItemResponse::from(item))
    }

    /// Partial update: only supplied fields change.
    pub async fn update_item(
        &self,
        item_id: i64,
        request: UpdateMenuItemRequest,
    ) -> AppResult<MenuItemResponse> {
        if let Some(name) = &request.name {
            validate_name(name)?;
        }
        if let Some(price) = request.price {
            validate_price(price)?;
        }

        let mut model = menu_items::Entity::find_by_id(item_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))?
            .into_active_model();

        if let Some(name) = request.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = request.description {
            model.description = Set(description);
        }
        if let Some(price) = request.price {
            model.price = Set(price);
        }
        if let Some(category) = request.category {
            model.category = Set(category);
        }
        if let Some(is_available) = request.is_available {
            model.is_available = Set(is_available);
        }
        if let Some(image_url) = request.image_url {
            model.image_url = Set(Some(image_url));
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        Ok(MenuItemResponse::from(updated))
    }

    /// Deleting a catalog row that order history still references would
    /// corrupt past orders, so it is rejected instead of cascaded.
    pub async fn delete_item(&self, item_id: i64) -> AppResult<()> {
        let item = menu_items::Entity::find_by_id(item_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))?;

        let referencing_lines = order_items::Entity::find()
            .filter(order_items::Column::MenuItemId.eq(item_id))
            .count(&self.pool)
            .await?;
        if referencing_lines > 0 {
            return Err(AppError::Conflict(
                "Menu item is referenced by existing orders".to_string(),
            ));
        }

        item.delete(&self.pool).await?;
        Ok(())
    }

    pub async fn list_categories(&self) -> AppResult<Vec<String>> {
        #[derive(Debug, FromQueryResult)]
        struct CategoryRow {
            category: String,
        }

        let rows = menu_items::Entity::find()
            .select_only()
            .column(menu_items::Column::Category)
            .distinct()
            .order_by_asc(menu_items::Column::Category)
            .into_model::<CategoryRow>()
            .all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.category).collect())
    }
}
