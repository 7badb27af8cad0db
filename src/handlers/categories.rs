use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::category::{CategoryRequest, EventCategory};
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let categories = store::categories::list(&state.pool).await?;
    Ok(success(categories, "Categories"))
}

/// GET /api/categories/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let category = find_category(&state, id).await?;
    Ok(success(category, "Category"))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(request): Json<CategoryRequest>,
) -> Result<Response, AppError> {
    request.validate()?;

    if store::categories::exists_by_name(&state.pool, &request.name).await? {
        return Err(AppError::ValidationError(format!(
            "Category name already exists: {}",
            request.name
        )));
    }

    let category =
        store::categories::insert(&state.pool, &request.name, request.description.as_deref())
            .await?;
    Ok(created(category, "Category created"))
}

/// PUT /api/categories/:id
pub async fn update(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CategoryRequest>,
) -> Result<Response, AppError> {
    request.validate()?;
    let existing = find_category(&state, id).await?;

    // A rename may not take a name that another category holds.
    if existing.name != request.name
        && store::categories::exists_by_name(&state.pool, &request.name).await?
    {
        return Err(AppError::ValidationError(format!(
            "Category name already exists: {}",
            request.name
        )));
    }

    let category =
        store::categories::update(&state.pool, id, &request.name, request.description.as_deref())
            .await?;
    Ok(success(category, "Category updated"))
}

/// DELETE /api/categories/:id
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    find_category(&state, id).await?;
    store::categories::delete(&state.pool, id).await?;
    Ok(empty_success("Category deleted"))
}

async fn find_category(state: &AppState, id: Uuid) -> Result<EventCategory, AppError> {
    store::categories::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category not found: {}", id)))
}
