use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::event::{Event, EventRequest, EventResponse};
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct ListEventsParams {
    pub category_id: Option<Uuid>,
    pub creator_id: Option<Uuid>,
    pub keyword: Option<String>,
}

/// GET /api/events
///
/// At most one filter applies; category wins over creator wins over
/// keyword, mirroring how clients use the search form.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListEventsParams>,
) -> Result<Response, AppError> {
    let events = if let Some(category_id) = params.category_id {
        store::categories::find_by_id(&state.pool, category_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category not found: {}", category_id)))?;
        store::events::list_by_category(&state.pool, category_id).await?
    } else if let Some(creator_id) = params.creator_id {
        store::events::list_by_creator(&state.pool, creator_id).await?
    } else if let Some(keyword) = params.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
        store::events::list_by_keyword(&state.pool, keyword.trim()).await?
    } else {
        store::events::list_all(&state.pool).await?
    };

    Ok(success(to_responses(&state, events).await?, "Events"))
}

/// GET /api/events/upcoming
pub async fn upcoming(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = store::events::list_after(&state.pool, Utc::now()).await?;
    Ok(success(to_responses(&state, events).await?, "Upcoming events"))
}

/// GET /api/events/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = find_event(&state, id).await?;
    Ok(success(to_response(&state, event).await?, "Event"))
}

/// POST /api/events
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<EventRequest>,
) -> Result<Response, AppError> {
    request.validate(Utc::now())?;

    if store::categories::find_by_id(&state.pool, request.category_id)
        .await?
        .is_none()
    {
        return Err(AppError::ValidationError(format!(
            "Unknown category: {}",
            request.category_id
        )));
    }

    let event = store::events::insert(&state.pool, &request, user.id).await?;
    tracing::info!(event_id = %event.id, creator = %user.username, "Event created");
    Ok(created(to_response(&state, event).await?, "Event created"))
}

/// PUT /api/events/:id
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<EventRequest>,
) -> Result<Response, AppError> {
    let existing = find_event(&state, id).await?;
    if existing.creator_id != user.id {
        return Err(AppError::Forbidden(
            "Only the event creator may update this event".to_string(),
        ));
    }

    request.validate(Utc::now())?;

    if store::categories::find_by_id(&state.pool, request.category_id)
        .await?
        .is_none()
    {
        return Err(AppError::ValidationError(format!(
            "Unknown category: {}",
            request.category_id
        )));
    }

    let event = store::events::update(&state.pool, id, &request).await?;
    Ok(success(to_response(&state, event).await?, "Event updated"))
}

/// DELETE /api/events/:id
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let existing = find_event(&state, id).await?;
    if existing.creator_id != user.id {
        return Err(AppError::Forbidden(
            "Only the event creator may delete this event".to_string(),
        ));
    }

    store::events::delete(&state.pool, id).await?;
    Ok(empty_success("Event deleted"))
}

pub(crate) async fn find_event(state: &AppState, id: Uuid) -> Result<Event, AppError> {
    store::events::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event not found: {}", id)))
}

async fn to_response(state: &AppState, event: Event) -> Result<EventResponse, AppError> {
    // Foreign keys guarantee both rows exist; a miss here is data corruption.
    let category = store::categories::find_by_id(&state.pool, event.category_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalServerError("Event references a missing category".to_string())
        })?;
    let creator = store::users::find_by_id(&state.pool, event.creator_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalServerError("Event references a missing creator".to_string())
        })?;
    let participant_count = store::participations::confirmed_count(&state.pool, event.id).await?;

    Ok(EventResponse::new(event, category, creator, participant_count))
}

async fn to_responses(
    state: &AppState,
    events: Vec<Event>,
) -> Result<Vec<EventResponse>, AppError> {
    let mut responses = Vec::with_capacity(events.len());
    for event in events {
        responses.push(to_response(state, event).await?);
    }
    Ok(responses)
}
