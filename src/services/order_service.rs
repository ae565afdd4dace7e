use crate::entities::{
    OrderStatus, menu_item_entity as menu_items, order_entity as orders,
    order_item_entity as order_items, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::policy;
use crate::utils::{validate_delivery_address, validate_phone_number};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
}

/// Request-shape checks, all performed before anything touches the store.
fn validate_create_order(request: &CreateOrderRequest) -> AppResult<()> {
    validate_delivery_address(&request.delivery_address)?;
    validate_phone_number(&request.phone_number)?;
    if request.items.is_empty() {
        return Err(AppError::ValidationError(
            "Order must contain at least one item".to_string(),
        ));
    }
    for item in &request.items {
        if item.quantity <= 0 {
            return Err(AppError::ValidationError(
                "Quantity must be positive".to_string(),
            ));
        }
    }
    Ok(())
}

fn order_total(lines: &[(i64, i32, Decimal)]) -> Decimal {
    lines
        .iter()
        .fold(Decimal::ZERO, |acc, (_, quantity, price)| {
            acc + *price * Decimal::from(*quantity)
        })
}

impl OrderService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Creates an order and its line items as one atomic unit.
    ///
    /// Every referenced menu item must exist and be available; a single bad
    /// reference aborts the whole order. Unit prices are snapshotted from
    /// the catalog inside the same transaction, so later catalog edits
    /// never change what was billed.
    pub async fn create_order(
        &self,
        user_id: i64,
        request: CreateOrderRequest,
    ) -> AppResult<OrderResponse> {
        validate_create_order(&request)?;

        let txn = self.pool.begin().await?;

        let mut lines: Vec<(i64, i32, Decimal)> = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let menu_item = menu_items::Entity::find_by_id(item.menu_item_id)
                .one(&txn)
                .await?;
            match menu_item {
                Some(menu_item) if menu_item.is_available => {
                    lines.push((item.menu_item_id, item.quantity, menu_item.price));
                }
                _ => {
                    txn.rollback().await?;
                    return Err(AppError::InvalidMenuItem(item.menu_item_id));
                }
            }
        }

        let total_amount = order_total(&lines);

        let order = orders::ActiveModel {
            user_id: Set(user_id),
            total_amount: Set(total_amount),
            status: Set(OrderStatus::Pending),
            delivery_address: Set(request.delivery_address.trim().to_string()),
            phone_number: Set(request.phone_number),
            notes: Set(request.notes),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let line_models: Vec<order_items::ActiveModel> = lines
            .into_iter()
            .map(|(menu_item_id, quantity, price)| order_items::ActiveModel {
                order_id: Set(order.id),
                menu_item_id: Set(menu_item_id),
                quantity: Set(quantity),
                price: Set(price),
                ..Default::default()
            })
            .collect();
        order_items::Entity::insert_many(line_models).exec(&txn).await?;

        txn.commit().await?;

        self.load_order_response(order.id).await
    }

    pub async fn list_orders(
        &self,
        user: &users::Model,
        query: &OrderQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut base_query = orders::Entity::find();
        if let Some(owner_id) = policy::order_scope(user) {
            base_query = base_query.filter(orders::Column::UserId.eq(owner_id));
        }
        if let Some(status) = query.status {
            base_query = base_query.filter(orders::Column::Status.eq(status));
        }

        let total = base_query.clone().count(&self.pool).await? as i64;

        let order_models = base_query
            .order_by_desc(orders::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items = self.hydrate_orders(&self.pool, order_models).await?;

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    /// The caller's own orders, newest first. Admins get their own history
    /// here too; the unscoped view is `list_orders`.
    pub async fn order_history(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let base_query = orders::Entity::find().filter(orders::Column::UserId.eq(user_id));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let order_models = base_query
            .order_by_desc(orders::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items = self.hydrate_orders(&self.pool, order_models).await?;

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    pub async fn get_order(&self, user: &users::Model, order_id: i64) -> AppResult<OrderResponse> {
        let order = self.find_scoped(user, order_id).await?;
        let mut hydrated = self.hydrate_orders(&self.pool, vec![order]).await?;
        Ok(hydrated.remove(0))
    }

    /// Owner-editable fields only; the status column is untouchable here.
    pub async fn update_order(
        &self,
        user: &users::Model,
        order_id: i64,
        request: UpdateOrderRequest,
    ) -> AppResult<OrderResponse> {
        if let Some(address) = &request.delivery_address {
            validate_delivery_address(address)?;
        }
        if let Some(phone) = &request.phone_number {
            validate_phone_number(phone)?;
        }

        let order = self.find_scoped(user, order_id).await?;

        let mut model = order.into_active_model();
        if let Some(address) = request.delivery_address {
            model.delivery_address = Set(address.trim().to_string());
        }
        if let Some(phone) = request.phone_number {
            model.phone_number = Set(phone);
        }
        if let Some(notes) = request.notes {
            model.notes = Set(Some(notes));
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        let mut hydrated = self.hydrate_orders(&self.pool, vec![updated]).await?;
        Ok(hydrated.remove(0))
    }

    /// Line items go with the order via the store's cascade.
    pub async fn delete_order(&self, user: &users::Model, order_id: i64) -> AppResult<()> {
        let order = self.find_scoped(user, order_id).await?;
        order.delete(&self.pool).await?;
        Ok(())
    }

    /// Admin-only status move, validated against the transition table.
    pub async fn update_status(
        &self,
        order_id: i64,
        next: OrderStatus,
    ) -> AppResult<OrderResponse> {
        let order = orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let current = order.status;
        if !current.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Cannot transition order from {current} to {next}"
            )));
        }

        let mut model = order.into_active_model();
        model.status = Set(next);
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(&self.pool).await?;

        let mut hydrated = self.hydrate_orders(&self.pool, vec![updated]).await?;
        Ok(hydrated.remove(0))
    }

    pub async fn list_by_status(
        &self,
        status: OrderStatus,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let base_query = orders::Entity::find().filter(orders::Column::Status.eq(status));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let order_models = base_query
            .order_by_desc(orders::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items = self.hydrate_orders(&self.pool, order_models).await?;

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    /// Scoped fetch behind every single-order operation: out-of-scope ids
    /// are indistinguishable from absent ones.
    async fn find_scoped(&self, user: &users::Model, order_id: i64) -> AppResult<orders::Model> {
        let mut query = orders::Entity::find_by_id(order_id);
        if let Some(owner_id) = policy::order_scope(user) {
            query = query.filter(orders::Column::UserId.eq(owner_id));
        }
        query
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    async fn load_order_response(&self, order_id: i64) -> AppResult<OrderResponse> {
        let order = orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        let mut hydrated = self.hydrate_orders(&self.pool, vec![order]).await?;
        Ok(hydrated.remove(0))
    }

    /// Attaches line items (and their menu items) to a page of orders with
    /// one batched query instead of one round trip per order.
    async fn hydrate_orders<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_models: Vec<orders::Model>,
    ) -> AppResult<Vec<OrderResponse>> {
        let order_ids: Vec<i64> = order_models.iter().map(|o| o.id).collect();

        let mut items_by_order: HashMap<i64, Vec<OrderItemResponse>> = HashMap::new();
        if !order_ids.is_empty() {
            let rows = order_items::Entity::find()
                .filter(order_items::Column::OrderId.is_in(order_ids))
                .find_also_related(menu_items::Entity)
                .all(conn)
                .await?;
            for (line, menu_item) in rows {
                items_by_order
                    .entry(line.order_id)
                    .or_default()
                    .push(OrderItemResponse::from_line(
                        line,
                        menu_item.map(MenuItemResponse::from),
                    ));
            }
        }

        Ok(order_models
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                OrderResponse::from_order(order, items)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(items: Vec<OrderItemRequest>) -> CreateOrderRequest {
        CreateOrderRequest {
            delivery_address: "1 Main St, Springfield".to_string(),
            phone_number: "+1 (555) 010-9999".to_string(),
            notes: None,
            items,
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_order_total_is_exact_decimal() {
        // 2 x 10.00 + 1 x 15.50 must be exactly 35.50.
        let lines = vec![(1, 2, dec("10.00")), (2, 1, dec("15.50"))];
        assert_eq!(order_total(&lines), dec("35.50"));
    }

    #[test]
    fn test_order_total_no_drift_across_many_lines() {
        // 100 lines of 0.10 each: binary floats would land near 10.000000002.
        let lines: Vec<(i64, i32, Decimal)> = (0..100).map(|i| (i, 1, dec("0.10"))).collect();
        assert_eq!(order_total(&lines), dec("10.00"));
    }

    #[test]
    fn test_order_total_multiplies_quantity() {
        let lines = vec![(1, 2, dec("12.99"))];
        assert_eq!(order_total(&lines), dec("25.98"));
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let req = request(vec![OrderItemRequest {
            menu_item_id: 1,
            quantity: 2,
        }]);
        assert!(validate_create_order(&req).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_items() {
        let req = request(vec![]);
        assert!(matches!(
            validate_create_order(&req),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_quantity() {
        for quantity in [0, -1] {
            let req = request(vec![OrderItemRequest {
                menu_item_id: 1,
                quantity,
            }]);
            assert!(validate_create_order(&req).is_err(), "quantity {quantity}");
        }
    }

    #[test]
    fn test_validate_rejects_blank_address() {
        let mut req = request(vec![OrderItemRequest {
            menu_item_id: 1,
            quantity: 1,
        }]);
        req.delivery_address = "   ".to_string();
        assert!(validate_create_order(&req).is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_phone() {
        let mut req = request(vec![OrderItemRequest {
            menu_item_id: 1,
            quantity: 1,
        }]);
        req.phone_number = "call me maybe".to_string();
        assert!(validate_create_order(&req).is_err());
    }
}
