use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::User;
use crate::utils::error::AppError;

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn exists_by_username(pool: &PgPool, username: &str) -> Result<bool, AppError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub async fn insert(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    bio: Option<&str>,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, password_hash, bio) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(username)
    .bind(password_hash)
    .bind(bio)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    username: &str,
    profile_picture: Option<&str>,
    bio: Option<&str>,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users
         SET username = $2, profile_picture = $3, bio = $4, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(username)
    .bind(profile_picture)
    .bind(bio)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test]
    async fn test_duplicate_username_is_detected(pool: PgPool) {
        insert(&pool, "alice", "hash", None).await.unwrap();

        // Registration rejects the name via this check before inserting.
        assert!(exists_by_username(&pool, "alice").await.unwrap());
        assert!(!exists_by_username(&pool, "bob").await.unwrap());
    }

    #[sqlx::test]
    async fn test_duplicate_username_insert_fails(pool: PgPool) {
        insert(&pool, "alice", "hash", None).await.unwrap();

        // The unique constraint backstops the existence check.
        assert!(insert(&pool, "alice", "other-hash", None).await.is_err());
    }
}
