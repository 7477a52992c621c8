//! Equipment inventory endpoints.
//!
//! Reads are available to any authenticated user; writes are limited to
//! the lab in-charge routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use domain::models::{CreateEquipmentRequest, EquipmentResponse, UpdateEquipmentRequest};
use persistence::entities::EquipmentEntity;
use persistence::repositories::EquipmentRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

fn equipment_response(entity: EquipmentEntity) -> EquipmentResponse {
    EquipmentResponse {
        id: entity.id,
        name: entity.name,
        specification: entity.specification,
        description: entity.description,
        additional_info: entity.additional_info,
        image_url: entity.image_url,
        in_charge: entity.in_charge,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

/// GET /api/v1/equipment
pub async fn list_equipment(
    State(state): State<AppState>,
    _auth: UserAuth,
) -> Result<Json<Vec<EquipmentResponse>>, ApiError> {
    let repo = EquipmentRepository::new(state.pool.clone());
    let entities = repo.list().await?;
    Ok(Json(entities.into_iter().map(equipment_response).collect()))
}

/// GET /api/v1/equipment/:id
pub async fn get_equipment(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<EquipmentResponse>, ApiError> {
    let repo = EquipmentRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Equipment not found".into()))?;
    Ok(Json(equipment_response(entity)))
}

/// POST /api/v1/lab/equipment
pub async fn create_equipment(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateEquipmentRequest>,
) -> Result<(StatusCode, Json<EquipmentResponse>), ApiError> {
    request.validate()?;

    let repo = EquipmentRepository::new(state.pool.clone());
    let entity = repo.create(&request).await?;

    tracing::info!(equipment_id = %entity.id, created_by = %auth.user_id, "Equipment created");
    Ok((StatusCode::CREATED, Json(equipment_response(entity))))
}

/// PUT /api/v1/lab/equipment/:id
pub async fn update_equipment(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateEquipmentRequest>,
) -> Result<Json<EquipmentResponse>, ApiError> {
    update.validate()?;

    let repo = EquipmentRepository::new(state.pool.clone());
    let entity = repo
        .update(id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Equipment not found".into()))?;
    Ok(Json(equipment_response(entity)))
}

/// DELETE /api/v1/lab/equipment/:id
pub async fn delete_equipment(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = EquipmentRepository::new(state.pool.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Equipment not found".into()));
    }

    tracing::info!(equipment_id = %id, deleted_by = %auth.user_id, "Equipment deleted");
    Ok(StatusCode::NO_CONTENT)
}
