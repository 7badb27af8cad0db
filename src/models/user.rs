use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 50;
const BIO_MAX: usize = 1000;

/// Database row. Never serialized directly; the password hash stays
/// server-side and clients get a [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            profile_picture: user.profile_picture,
            bio: user.bio,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub bio: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_username(&self.username)?;
        let password_len = self.password.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&password_len) {
            return Err(AppError::ValidationError(format!(
                "Password must be between {} and {} characters",
                PASSWORD_MIN, PASSWORD_MAX
            )));
        }
        validate_bio(self.bio.as_deref())?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_username(&self.username)?;
        validate_bio(self.bio.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub struct JwtResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
}

fn validate_username(username: &str) -> Result<(), AppError> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(AppError::ValidationError(format!(
            "Username must be between {} and {} characters",
            USERNAME_MIN, USERNAME_MAX
        )));
    }
    Ok(())
}

fn validate_bio(bio: Option<&str>) -> Result<(), AppError> {
    if let Some(bio) = bio {
        if bio.chars().count() > BIO_MAX {
            return Err(AppError::ValidationError(format!(
                "Bio must be at most {} characters",
                BIO_MAX
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            bio: None,
        }
    }

    #[test]
    fn test_register_request_accepts_valid_input() {
        assert!(request("alice", "hunter2hunter2").validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_short_username() {
        assert!(request("al", "hunter2hunter2").validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        assert!(request("alice", "short").validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_oversized_bio() {
        let mut req = request("alice", "hunter2hunter2");
        req.bio = Some("x".repeat(1001));
        assert!(req.validate().is_err());
    }
}
