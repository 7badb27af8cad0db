use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone, FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub caption: Option<String>,
    pub file_size: i64,
    pub content_type: String,
    pub event_id: Uuid,
    pub uploaded_by: Uuid,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub caption: Option<String>,
    pub file_size: i64,
    pub content_type: String,
    pub event_id: Uuid,
    pub uploaded_by: Uuid,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            filename: photo.filename,
            original_filename: photo.original_filename,
            caption: photo.caption,
            file_size: photo.file_size,
            content_type: photo.content_type,
            event_id: photo.event_id,
            uploaded_by: photo.uploaded_by,
            uploaded_at: photo.uploaded_at,
        }
    }
}

/// Rejects empty uploads, uploads over 10 MiB and anything outside the
/// image allow-list.
pub fn validate_upload(size: usize, content_type: Option<&str>) -> Result<(), AppError> {
    if size == 0 {
        return Err(AppError::ValidationError(
            "No file was provided".to_string(),
        ));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::ValidationError(
            "File size must be at most 10MB".to_string(),
        ));
    }
    match content_type {
        Some(content_type) if ALLOWED_IMAGE_TYPES.contains(&content_type) => Ok(()),
        _ => Err(AppError::ValidationError(
            "Unsupported file type. Only JPEG, PNG, GIF and WebP are allowed".to_string(),
        )),
    }
}

/// Only the uploader or the event creator may delete a photo.
pub fn can_delete(uploaded_by: Uuid, event_creator: Uuid, user: Uuid) -> bool {
    uploaded_by == user || event_creator == user
}

/// Extension of the original filename, dot included. Empty when there is
/// none, matching how the stored name is generated.
pub fn file_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => &filename[idx..],
        _ => "",
    }
}

/// Content type guess from the stored extension, used when serving raw
/// bytes for a filename whose metadata row is gone.
pub fn guess_content_type(filename: &str) -> &'static str {
    match file_extension(filename).to_ascii_lowercase().as_str() {
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_rejects_empty_file() {
        assert!(validate_upload(0, Some("image/png")).is_err());
    }

    #[test]
    fn test_upload_rejects_oversized_file() {
        assert!(validate_upload(MAX_UPLOAD_BYTES + 1, Some("image/png")).is_err());
    }

    #[test]
    fn test_upload_accepts_file_at_limit() {
        assert!(validate_upload(MAX_UPLOAD_BYTES, Some("image/jpeg")).is_ok());
    }

    #[test]
    fn test_upload_rejects_disallowed_type() {
        assert!(validate_upload(100, Some("application/pdf")).is_err());
        assert!(validate_upload(100, None).is_err());
    }

    #[test]
    fn test_uploader_may_delete() {
        let uploader = Uuid::new_v4();
        let creator = Uuid::new_v4();
        assert!(can_delete(uploader, creator, uploader));
    }

    #[test]
    fn test_event_creator_may_delete() {
        let uploader = Uuid::new_v4();
        let creator = Uuid::new_v4();
        assert!(can_delete(uploader, creator, creator));
    }

    #[test]
    fn test_other_users_may_not_delete() {
        let uploader = Uuid::new_v4();
        let creator = Uuid::new_v4();
        assert!(!can_delete(uploader, creator, Uuid::new_v4()));
    }

    #[test]
    fn test_file_extension_is_preserved() {
        assert_eq!(file_extension("sunset.JPG"), ".JPG");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("noext"), "");
        assert_eq!(file_extension(".hidden"), "");
    }

    #[test]
    fn test_content_type_guess_from_extension() {
        assert_eq!(guess_content_type("a.jpeg"), "image/jpeg");
        assert_eq!(guess_content_type("b.PNG"), "image/png");
        assert_eq!(guess_content_type("c.bin"), "application/octet-stream");
    }
}
