pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod users;

pub use menu_items as menu_item_entity;
pub use order_items as order_item_entity;
pub use orders as order_entity;
pub use users as user_entity;

pub use orders::OrderStatus;
