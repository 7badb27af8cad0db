use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::{Event, EventRequest};
use crate::utils::error::AppError;

pub async fn list_all(pool: &PgPool) -> Result<Vec<Event>, AppError> {
    let events = sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY event_date")
        .fetch_all(pool)
        .await?;
    Ok(events)
}

pub async fn list_by_category(pool: &PgPool, category_id: Uuid) -> Result<Vec<Event>, AppError> {
    let events = sqlx::query_as::<_, Event>(
        "SELECT * FROM events WHERE category_id = $1 ORDER BY event_date",
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

pub async fn list_by_creator(pool: &PgPool, creator_id: Uuid) -> Result<Vec<Event>, AppError> {
    let events =
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE creator_id = $1 ORDER BY event_date")
            .bind(creator_id)
            .fetch_all(pool)
            .await?;
    Ok(events)
}

/// Case-insensitive title substring search.
pub async fn list_by_keyword(pool: &PgPool, keyword: &str) -> Result<Vec<Event>, AppError> {
    let events = sqlx::query_as::<_, Event>(
        "SELECT * FROM events WHERE title ILIKE '%' || $1 || '%' ORDER BY event_date",
    )
    .bind(keyword)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

pub async fn list_after(pool: &PgPool, date: DateTime<Utc>) -> Result<Vec<Event>, AppError> {
    let events =
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE event_date > $1 ORDER BY event_date")
            .bind(date)
            .fetch_all(pool)
            .await?;
    Ok(events)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Event>, AppError> {
    let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

pub async fn insert(
    pool: &PgPool,
    request: &EventRequest,
    creator_id: Uuid,
) -> Result<Event, AppError> {
    let event = sqlx::query_as::<_, Event>(
        "INSERT INTO events (title, description, event_date, location, capacity, category_id, creator_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(&request.title)
    .bind(&request.description)
    .bind(request.event_date)
    .bind(&request.location)
    .bind(request.capacity)
    .bind(request.category_id)
    .bind(creator_id)
    .fetch_one(pool)
    .await?;
    Ok(event)
}

pub async fn update(pool: &PgPool, id: Uuid, request: &EventRequest) -> Result<Event, AppError> {
    let event = sqlx::query_as::<_, Event>(
        "UPDATE events
         SET title = $2, description = $3, event_date = $4, location = $5,
             capacity = $6, category_id = $7, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(&request.title)
    .bind(&request.description)
    .bind(request.event_date)
    .bind(&request.location)
    .bind(request.capacity)
    .bind(request.category_id)
    .fetch_one(pool)
    .await?;
    Ok(event)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
