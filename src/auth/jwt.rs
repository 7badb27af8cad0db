use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

/// JWT claims: the subject is the username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs an HS256 bearer token for `username`, valid for
/// `expiration_secs` from now.
pub fn generate_token(
    username: &str,
    secret: &str,
    expiration_secs: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: username.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(expiration_secs)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to sign token: {}", e)))
}

/// Verifies signature and expiry only; any failure is an auth error.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::AuthError("Invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip() {
        let token = generate_token("alice", SECRET, 3600).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Expired an hour ago, well past the default decoding leeway.
        let token = generate_token("alice", SECRET, -3600).unwrap();
        assert!(decode_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = generate_token("alice", SECRET, 3600).unwrap();
        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(decode_token("not.a.jwt", SECRET).is_err());
    }
}
