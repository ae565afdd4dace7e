pub mod common;
pub mod menu;
pub mod order;
pub mod pagination;
pub mod user;

pub use common::*;
pub use menu::*;
pub use order::*;
pub use pagination::*;
pub use user::*;
