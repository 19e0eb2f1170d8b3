use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub iat: Option<u64>,
}

/// Authenticated principal attached to a request. `id` is the account
/// identifier as carried in the token's `sub` claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl User {
    pub fn is_patient(&self) -> bool {
        self.role.as_deref() == Some("patient")
    }
}
