use crate::entities::{OrderStatus, order_items, orders};
use crate::models::MenuItemResponse;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub menu_item_id: i64,
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[schema(example = "1 Main St, Springfield")]
    pub delivery_address: String,
    #[schema(example = "+1 (555) 010-9999")]
    pub phone_number: String,
    pub notes: Option<String>,
    pub items: Vec<OrderItemRequest>,
}

/// Owner-editable order fields. Status moves only through the admin
/// status endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub delivery_address: Option<String>,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i64,
    pub menu_item_id: i64,
    pub quantity: i32,
    /// Unit price captured at order-creation time.
    #[schema(value_type = String, example = "12.99")]
    pub price: Decimal,
    #[schema(value_type = String, example = "25.98")]
    pub line_total: Decimal,
    pub menu_item: Option<MenuItemResponse>,
}

impl OrderItemResponse {
    pub fn from_line(item: order_items::Model, menu_item: Option<MenuItemResponse>) -> Self {
        let line_total = item.price * Decimal::from(item.quantity);
        Self {
            id: item.id,
            menu_item_id: item.menu_item_id,
            quantity: item.quantity,
            price: item.price,
            line_total,
            menu_item,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    #[schema(value_type = String, example = "35.50")]
    pub total_amount: Decimal,
    pub delivery_address: String,
    pub phone_number: String,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    pub fn from_order(order: orders::Model, items: Vec<OrderItemResponse>) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            status: order.status,
            total_amount: order.total_amount,
            delivery_address: order.delivery_address,
            phone_number: order.phone_number,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
            items,
        }
    }
}
