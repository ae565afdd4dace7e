//! Authorization policy shared by every protected operation.
//!
//! The ownership-or-admin rule lives here instead of being repeated at
//! each call site: order queries are scoped through [`order_scope`], so a
//! caller probing another user's order falls off the query and surfaces as
//! `NotFound` rather than `Forbidden`.

use crate::entities::users;
use crate::error::{AppError, AppResult};

pub fn require_admin(user: &users::Model) -> AppResult<()> {
    if user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Administrator privileges required".to_string(),
        ))
    }
}

/// Row scope for order reads and writes: `None` means unrestricted (admin),
/// `Some(id)` restricts every query to the caller's own rows.
pub fn order_scope(user: &users::Model) -> Option<i64> {
    if user.is_admin { None } else { Some(user.id) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, is_admin: bool) -> users::Model {
        users::Model {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            is_active: true,
            is_admin,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_admin_is_unscoped() {
        assert_eq!(order_scope(&user(1, true)), None);
    }

    #[test]
    fn test_regular_user_sees_only_own_rows() {
        assert_eq!(order_scope(&user(7, false)), Some(7));
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&user(1, true)).is_ok());
        assert!(matches!(
            require_admin(&user(2, false)),
            Err(AppError::Forbidden(_))
        ));
    }
}
