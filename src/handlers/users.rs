use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::user::{UpdateUserRequest, UserResponse};
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::response::success;

/// GET /api/user/me
pub async fn me(AuthUser(user): AuthUser) -> Response {
    success(UserResponse::from(user), "Current user")
}

/// PUT /api/user/me
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Response, AppError> {
    request.validate()?;

    // Renames must not collide with another account.
    if request.username != user.username
        && store::users::exists_by_username(&state.pool, &request.username).await?
    {
        return Err(AppError::ValidationError(format!(
            "Username is already taken: {}",
            request.username
        )));
    }

    let updated = store::users::update(
        &state.pool,
        user.id,
        &request.username,
        request.profile_picture.as_deref(),
        request.bio.as_deref(),
    )
    .await?;

    Ok(success(UserResponse::from(updated), "Profile updated"))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let user = store::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {}", id)))?;

    Ok(success(UserResponse::from(user), "User profile"))
}
