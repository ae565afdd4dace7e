use crate::entities::menu_items;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMenuItemRequest {
    #[schema(example = "Margherita Pizza")]
    pub name: String,
    #[schema(example = "Tomato, mozzarella, basil")]
    pub description: String,
    #[schema(value_type = String, example = "12.99")]
    pub price: Decimal,
    #[schema(example = "pizza")]
    pub category: String,
    pub is_available: Option<bool>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "7.99")]
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MenuQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub category: Option<String>,
    pub available_only: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuItemResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "12.99")]
    pub price: Decimal,
    pub category: String,
    pub is_available: bool,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<menu_items::Model> for MenuItemResponse {
    fn from(item: menu_items::Model) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price,
            category: item.category,
            is_available: item.is_available,
            image_url: item.image_url,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}
