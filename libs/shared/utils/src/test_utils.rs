use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use shared_config::AppConfig;
use shared_models::auth::{JwtClaims, User};

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub api_domain: String,
    pub selection_count: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            api_domain: "api.care.test".to_string(),
            selection_count: 3,
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            api_domain: self.api_domain.clone(),
            selection_count: self.selection_count,
        }
    }
}

pub struct TestUser {
    pub account_id: i64,
    pub email: String,
    pub role: String,
}

impl TestUser {
    pub fn new(account_id: i64, email: &str, role: &str) -> Self {
        Self {
            account_id,
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn patient(account_id: i64) -> Self {
        Self::new(account_id, "patient@example.com", "patient")
    }

    pub fn doctor(account_id: i64) -> Self {
        Self::new(account_id, "doctor@example.com", "doctor")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.account_id.to_string(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let claims = JwtClaims {
            sub: user.account_id.to_string(),
            exp: Some(exp.timestamp() as u64),
            email: Some(user.email.clone()),
            role: Some(user.role.clone()),
            iat: Some(now.timestamp() as u64),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("test token encoding")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::validate_token;

    #[test]
    fn test_token_round_trip() {
        let config = TestConfig::default();
        let user = TestUser::patient(42);
        let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(1));

        let validated = validate_token(&token, &config.jwt_secret).unwrap();
        assert_eq!(validated.id, "42");
        assert_eq!(validated.role.as_deref(), Some("patient"));
        assert!(validated.is_patient());
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = TestConfig::default();
        let user = TestUser::patient(42);
        let token = JwtTestUtils::create_expired_token(&user, &config.jwt_secret);

        assert!(validate_token(&token, &config.jwt_secret).is_err());
    }

    #[test]
    fn test_wrong_signature_rejected() {
        let config = TestConfig::default();
        let user = TestUser::doctor(7);
        let token = JwtTestUtils::create_invalid_signature_token(&user);

        assert!(validate_token(&token, &config.jwt_secret).is_err());
    }
}
