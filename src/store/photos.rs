use sqlx::PgPool;
use uuid::Uuid;

use crate::models::photo::Photo;
use crate::utils::error::AppError;

pub struct NewPhoto<'a> {
    pub filename: &'a str,
    pub original_filename: &'a str,
    pub caption: Option<&'a str>,
    pub file_size: i64,
    pub content_type: &'a str,
    pub event_id: Uuid,
    pub uploaded_by: Uuid,
}

pub async fn insert(pool: &PgPool, photo: NewPhoto<'_>) -> Result<Photo, AppError> {
    let photo = sqlx::query_as::<_, Photo>(
        "INSERT INTO photos (filename, original_filename, caption, file_size, content_type, event_id, uploaded_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(photo.filename)
    .bind(photo.original_filename)
    .bind(photo.caption)
    .bind(photo.file_size)
    .bind(photo.content_type)
    .bind(photo.event_id)
    .bind(photo.uploaded_by)
    .fetch_one(pool)
    .await?;
    Ok(photo)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Photo>, AppError> {
    let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(photo)
}

pub async fn find_by_filename(pool: &PgPool, filename: &str) -> Result<Option<Photo>, AppError> {
    let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE filename = $1")
        .bind(filename)
        .fetch_optional(pool)
        .await?;
    Ok(photo)
}

pub async fn list_by_event(pool: &PgPool, event_id: Uuid) -> Result<Vec<Photo>, AppError> {
    let photos = sqlx::query_as::<_, Photo>(
        "SELECT * FROM photos WHERE event_id = $1 ORDER BY uploaded_at DESC",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;
    Ok(photos)
}

pub async fn list_by_uploader(pool: &PgPool, user_id: Uuid) -> Result<Vec<Photo>, AppError> {
    let photos = sqlx::query_as::<_, Photo>(
        "SELECT * FROM photos WHERE uploaded_by = $1 ORDER BY uploaded_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(photos)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM photos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
