use axum::extract::{Path, State};
use axum::response::Response;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::handlers::events::find_event;
use crate::models::participation::{ParticipationResponse, ParticipationStatusResponse};
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

/// POST /api/events/:id/participate
pub async fn participate(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = find_event(&state, event_id).await?;

    let participation =
        store::participations::participate(&state.pool, event_id, user.id).await?;

    tracing::info!(
        event_id = %event_id,
        user = %user.username,
        status = %participation.status,
        "Participation registered"
    );

    let response = ParticipationResponse {
        id: participation.id,
        event_id: event.id,
        event_title: event.title,
        user_id: user.id,
        username: user.username,
        status: participation.status,
        participated_at: participation.created_at,
    };
    Ok(created(response, "Participation registered"))
}

/// DELETE /api/events/:id/participate
pub async fn cancel(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    find_event(&state, event_id).await?;

    let cancelled = store::participations::cancel_active(&state.pool, event_id, user.id).await?;
    if !cancelled {
        return Err(AppError::ValidationError(
            "Not participating in this event".to_string(),
        ));
    }

    Ok(empty_success("Participation cancelled"))
}

/// GET /api/events/:id/participants
pub async fn participants(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    find_event(&state, event_id).await?;
    let participations = store::participations::list_by_event(&state.pool, event_id).await?;
    Ok(success(participations, "Event participants"))
}

/// GET /api/events/my-participations
pub async fn my_participations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, AppError> {
    let participations = store::participations::list_by_user(&state.pool, user.id).await?;
    Ok(success(participations, "My participations"))
}

/// GET /api/events/:id/participation-status
pub async fn participation_status(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    find_event(&state, event_id).await?;
    let participating =
        store::participations::is_participating(&state.pool, event_id, user.id).await?;
    Ok(success(
        ParticipationStatusResponse { participating },
        "Participation status",
    ))
}
