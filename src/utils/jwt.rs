use crate::error::AppResult;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub exp: i64,
    pub iat: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in: access_expires_in,
        }
    }

    pub fn generate_access_token(&self, username: &str) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expires_in);

        let claims = Claims {
            sub: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Verifies signature and expiry; every failure mode surfaces as the
    /// same `Unauthorized` outcome at the HTTP boundary.
    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    pub fn get_access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_token_round_trip() {
        let service = JwtService::new(SECRET, 1800);
        let token = service.generate_access_token("alice").unwrap();
        let claims = service.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Issued already an hour past its expiry, well outside any leeway.
        let service = JwtService::new(SECRET, -3600);
        let token = service.generate_access_token("alice").unwrap();
        assert!(service.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = JwtService::new(SECRET, 1800);
        let token = service.generate_access_token("alice").unwrap();
        let mut tampered = token;
        tampered.push('A');
        assert!(service.verify_access_token(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = JwtService::new(SECRET, 1800);
        let other = JwtService::new("another-secret-another-secret-32", 1800);
        let token = service.generate_access_token("alice").unwrap();
        assert!(other.verify_access_token(&token).is_err());
    }
}
