//! Event listing endpoints.
//!
//! The listing is public so the landing page can render upcoming events
//! without a login. Management is admin-only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::{CreateEventRequest, EventResponse, UpdateEventRequest};
use persistence::entities::EventEntity;
use persistence::repositories::EventRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventListQuery {
    /// Include deactivated events. Honored only for admin callers.
    #[serde(default)]
    pub include_inactive: bool,
}

fn event_response(entity: EventEntity) -> EventResponse {
    EventResponse {
        id: entity.id,
        title: entity.title,
        date: entity.date,
        image_url: entity.image_url,
        category: entity.category,
        is_active: entity.is_active,
        created_at: entity.created_at,
    }
}

/// GET /api/v1/events
///
/// Public. Inactive events are only visible to admins who ask for them.
pub async fn list_events(
    State(state): State<AppState>,
    auth: Option<UserAuth>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let is_admin = auth
        .map(|a| a.role == shared::jwt::TokenRole::Admin)
        .unwrap_or(false);
    let include_inactive = query.include_inactive && is_admin;

    let repo = EventRepository::new(state.pool.clone());
    let entities = repo.list(include_inactive).await?;
    Ok(Json(entities.into_iter().map(event_response).collect()))
}

/// POST /api/v1/admin/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    request.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let entity = repo.create(&request).await?;

    tracing::info!(event_id = %entity.id, created_by = %auth.user_id, "Event created");
    Ok((StatusCode::CREATED, Json(event_response(entity))))
}

/// PUT /api/v1/admin/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    update.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let entity = repo
        .update(id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;
    Ok(Json(event_response(entity)))
}

/// DELETE /api/v1/admin/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Event not found".into()));
    }

    tracing::info!(event_id = %id, deleted_by = %auth.user_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}
