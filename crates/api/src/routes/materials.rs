//! Material inventory endpoints.
//!
//! Materials carry the coefficients the client-side impact calculators
//! consume. Reads are open to any authenticated user; writes are limited
//! to the lab in-charge routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use domain::models::{CreateMaterialRequest, MaterialForm, MaterialResponse, UpdateMaterialRequest};
use persistence::entities::MaterialEntity;
use persistence::repositories::MaterialRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

fn material_response(entity: MaterialEntity) -> MaterialResponse {
    MaterialResponse {
        id: entity.id,
        name: entity.name,
        dimension: entity.dimension,
        description: entity.description,
        image_url: entity.image_url,
        density: entity.density,
        embodied_energy: entity.embodied_energy,
        carbon_footprint_factor: entity.carbon_footprint_factor,
        fixed_dimension: entity.fixed_dimension,
        form_type: MaterialForm::from(entity.form_type),
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

/// GET /api/v1/materials
pub async fn list_materials(
    State(state): State<AppState>,
    _auth: UserAuth,
) -> Result<Json<Vec<MaterialResponse>>, ApiError> {
    let repo = MaterialRepository::new(state.pool.clone());
    let entities = repo.list().await?;
    Ok(Json(entities.into_iter().map(material_response).collect()))
}

/// GET /api/v1/materials/:id
pub async fn get_material(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<MaterialResponse>, ApiError> {
    let repo = MaterialRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Material not found".into()))?;
    Ok(Json(material_response(entity)))
}

/// POST /api/v1/lab/materials
pub async fn create_material(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateMaterialRequest>,
) -> Result<(StatusCode, Json<MaterialResponse>), ApiError> {
    request.validate()?;

    let repo = MaterialRepository::new(state.pool.clone());
    let entity = repo.create(&request).await?;

    tracing::info!(material_id = %entity.id, created_by = %auth.user_id, "Material created");
    Ok((StatusCode::CREATED, Json(material_response(entity))))
}

/// PUT /api/v1/lab/materials/:id
pub async fn update_material(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateMaterialRequest>,
) -> Result<Json<MaterialResponse>, ApiError> {
    update.validate()?;

    let repo = MaterialRepository::new(state.pool.clone());
    let entity = repo
        .update(id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Material not found".into()))?;
    Ok(Json(material_response(entity)))
}

/// DELETE /api/v1/lab/materials/:id
pub async fn delete_material(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = MaterialRepository::new(state.pool.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Material not found".into()));
    }

    tracing::info!(material_id = %id, deleted_by = %auth.user_id, "Material deleted");
    Ok(StatusCode::NO_CONTENT)
}
