use axum::extract::multipart::Multipart;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::handlers::events::find_event;
use crate::models::photo::{
    can_delete, file_extension, guess_content_type, validate_upload, Photo, PhotoResponse,
};
use crate::state::AppState;
use crate::store;
use crate::store::photos::NewPhoto;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

/// POST /api/photos/upload/:event_id
///
/// Multipart form: `file` (required) and `caption` (optional). The file
/// lands on disk first, then the metadata row; a DB failure leaves the
/// file behind rather than rolling it back.
pub async fn upload(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let event = find_event(&state, event_id).await?;

    let mut original_filename = None;
    let mut content_type = None;
    let mut bytes = None;
    let mut caption = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Malformed multipart body: {}", e)))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                original_filename = field.file_name().map(str::to_string);
                content_type = field.content_type().map(str::to_string);
                bytes = Some(field.bytes().await.map_err(|e| {
                    AppError::ValidationError(format!("Failed to read file field: {}", e))
                })?);
            }
            Some("caption") => {
                caption = Some(field.text().await.map_err(|e| {
                    AppError::ValidationError(format!("Failed to read caption field: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let bytes =
        bytes.ok_or_else(|| AppError::ValidationError("No file was provided".to_string()))?;
    validate_upload(bytes.len(), content_type.as_deref())?;
    let content_type = content_type.unwrap_or_default();
    let original_filename = original_filename.unwrap_or_else(|| "upload".to_string());

    // Generated name keeps the original extension for nicer URLs.
    let filename = format!("{}{}", Uuid::new_v4(), file_extension(&original_filename));

    tokio::fs::create_dir_all(&state.config.photo_upload_dir).await?;
    tokio::fs::write(state.config.photo_upload_dir.join(&filename), &bytes).await?;

    let photo = store::photos::insert(
        &state.pool,
        NewPhoto {
            filename: &filename,
            original_filename: &original_filename,
            caption: caption.as_deref(),
            file_size: bytes.len() as i64,
            content_type: &content_type,
            event_id: event.id,
            uploaded_by: user.id,
        },
    )
    .await?;

    tracing::info!(
        event_id = %event.id,
        uploader = %user.username,
        filename = %photo.filename,
        size = photo.file_size,
        "Photo uploaded"
    );
    Ok(created(PhotoResponse::from(photo), "Photo uploaded"))
}

/// GET /api/photos/event/:event_id
pub async fn by_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    find_event(&state, event_id).await?;
    let photos = store::photos::list_by_event(&state.pool, event_id).await?;
    Ok(success(to_responses(photos), "Event photos"))
}

/// GET /api/photos/user/me
pub async fn my_photos(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, AppError> {
    let photos = store::photos::list_by_uploader(&state.pool, user.id).await?;
    Ok(success(to_responses(photos), "My photos"))
}

/// GET /api/photos/file/:filename
///
/// Raw bytes with the stored content type; files whose metadata row is
/// gone are served with a type guessed from the extension.
pub async fn file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    // Generated names never contain path separators; anything else is
    // someone probing for traversal.
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(AppError::NotFound(format!("File not found: {}", filename)));
    }

    let content_type = match store::photos::find_by_filename(&state.pool, &filename).await? {
        Some(photo) => photo.content_type,
        None => guess_content_type(&filename).to_string(),
    };
    if !content_type.starts_with("image/") {
        return Err(AppError::ValidationError(
            "Requested file is not an image".to_string(),
        ));
    }

    let path = state.config.photo_upload_dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("File not found: {}", filename)));
        }
        Err(e) => return Err(AppError::StorageError(e)),
    };

    let headers = [
        (header::CONTENT_TYPE, content_type),
        (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
    ];
    Ok((headers, bytes).into_response())
}

/// DELETE /api/photos/:id
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let photo = store::photos::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Photo not found: {}", id)))?;
    let event = find_event(&state, photo.event_id).await?;

    if !can_delete(photo.uploaded_by, event.creator_id, user.id) {
        return Err(AppError::Forbidden(
            "Only the uploader or the event creator may delete this photo".to_string(),
        ));
    }

    // File first, then the row; a missing file is fine, the row is what
    // makes the photo visible.
    let path = state.config.photo_upload_dir.join(&photo.filename);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(filename = %photo.filename, "Photo file already missing on delete");
        }
        Err(e) => return Err(AppError::StorageError(e)),
    }
    store::photos::delete(&state.pool, id).await?;

    tracing::info!(photo_id = %id, user = %user.username, "Photo deleted");
    Ok(empty_success("Photo deleted"))
}

fn to_responses(photos: Vec<Photo>) -> Vec<PhotoResponse> {
    photos.into_iter().map(PhotoResponse::from).collect()
}
