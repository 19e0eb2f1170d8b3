use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::debug;

use shared_models::auth::{JwtClaims, User};

/// Validates an HS256 bearer token and returns the principal it carries.
/// Authentication is optional on the selection endpoint, so callers decide
/// what an absent token means; an invalid one is always an error.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|err| {
        debug!("Token validation failed: {}", err);
        format!("Invalid token: {}", err)
    })?;

    let user = User {
        id: data.claims.sub,
        email: data.claims.email,
        role: data.claims.role,
    };

    debug!("Token validated successfully for account: {}", user.id);
    Ok(user)
}
