use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[0-9+\-() ]+$").unwrap())
}

fn username_regex() -> &'static Regex {
    static USERNAME: OnceLock<Regex> = OnceLock::new();
    USERNAME.get_or_init(|| Regex::new(r"^[A-Za-z0-9_\-]{3,32}$").unwrap())
}

/// Digits plus the common separators, with at least one digit present.
pub fn validate_phone_number(phone: &str) -> AppResult<()> {
    if !phone_regex().is_match(phone) || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::ValidationError(
            "Phone number must contain only digits and common separators".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_delivery_address(address: &str) -> AppResult<()> {
    if address.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Delivery address cannot be empty".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> AppResult<()> {
    if !username_regex().is_match(username) {
        return Err(AppError::ValidationError(
            "Username must be 3-32 characters, alphanumeric with underscores and hyphens only"
                .to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> AppResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(AppError::ValidationError(
            "Invalid email address".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_number() {
        assert!(validate_phone_number("+1 (555) 010-9999").is_ok());
        assert!(validate_phone_number("5550109999").is_ok());
        assert!(validate_phone_number("call me").is_err());
        assert!(validate_phone_number("+- ()").is_err());
        assert!(validate_phone_number("").is_err());
    }

    #[test]
    fn test_validate_delivery_address() {
        assert!(validate_delivery_address("1 Main St").is_ok());
        assert!(validate_delivery_address("   ").is_err());
        assert!(validate_delivery_address("").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("a-b").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@nodot").is_err());
    }
}
