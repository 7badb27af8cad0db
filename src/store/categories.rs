use sqlx::PgPool;
use uuid::Uuid;

use crate::models::category::EventCategory;
use crate::utils::error::AppError;

/// Categories seeded the first time the server starts against an empty
/// table.
const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Baseball", "Watching pro baseball games together"),
    ("Photography", "Photo walks and camera meetups"),
    ("Comedy", "Going to live comedy shows"),
    ("Other", "Everything that fits no other category"),
];

pub async fn list(pool: &PgPool) -> Result<Vec<EventCategory>, AppError> {
    let categories =
        sqlx::query_as::<_, EventCategory>("SELECT * FROM event_categories ORDER BY name")
            .fetch_all(pool)
            .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<EventCategory>, AppError> {
    let category = sqlx::query_as::<_, EventCategory>("SELECT * FROM event_categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(category)
}

pub async fn exists_by_name(pool: &PgPool, name: &str) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM event_categories WHERE name = $1)",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn insert(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
) -> Result<EventCategory, AppError> {
    let category = sqlx::query_as::<_, EventCategory>(
        "INSERT INTO event_categories (name, description) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;
    Ok(category)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<EventCategory, AppError> {
    let category = sqlx::query_as::<_, EventCategory>(
        "UPDATE event_categories SET name = $2, description = $3 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;
    Ok(category)
}

/// Fails while any event still references the category.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let event_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events WHERE category_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if event_count > 0 {
        return Err(AppError::ValidationError(
            "Category cannot be deleted while events reference it".to_string(),
        ));
    }

    sqlx::query("DELETE FROM event_categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Inserts the default categories when the table is empty. Idempotent
/// across restarts.
pub async fn seed_defaults(pool: &PgPool) -> Result<(), AppError> {
    let existing = list(pool).await?;
    if !existing.is_empty() {
        tracing::debug!("Categories already present, skipping seed");
        return Ok(());
    }

    for (name, description) in DEFAULT_CATEGORIES {
        if !exists_by_name(pool, name).await? {
            insert(pool, name, Some(description)).await?;
            tracing::info!(category = name, "Seeded initial category");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::models::event::EventRequest;
    use crate::store::{events, users};

    #[sqlx::test]
    async fn test_delete_fails_while_events_reference_category(pool: PgPool) {
        let creator = users::insert(&pool, "creator", "hash", None).await.unwrap();
        let category = insert(&pool, "Baseball", None).await.unwrap();
        let event = events::insert(
            &pool,
            &EventRequest {
                title: "Game night".to_string(),
                description: None,
                event_date: Utc::now() + Duration::days(7),
                location: None,
                capacity: None,
                category_id: category.id,
            },
            creator.id,
        )
        .await
        .unwrap();

        assert!(delete(&pool, category.id).await.is_err());

        // Once the last referencing event is gone the delete goes through.
        events::delete(&pool, event.id).await.unwrap();
        delete(&pool, category.id).await.unwrap();
        assert!(find_by_id(&pool, category.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_seed_defaults_is_idempotent(pool: PgPool) {
        seed_defaults(&pool).await.unwrap();
        let first = list(&pool).await.unwrap();
        assert_eq!(first.len(), DEFAULT_CATEGORIES.len());

        seed_defaults(&pool).await.unwrap();
        assert_eq!(list(&pool).await.unwrap().len(), first.len());
    }
}
