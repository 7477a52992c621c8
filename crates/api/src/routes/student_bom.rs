//! Student-facing BOM request endpoints.
//!
//! Students submit, list, edit, delete, and export their own requests.
//! Edits and deletes are only allowed while the guide gate is open; after
//! guide approval or rejection the request is frozen for the student.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    BomListQuery, BomListResponse, BomResponse, CreateBomRequest, UpdateBomRequest, UserBrief,
};
use persistence::repositories::{BomRequestRepository, BomScope, UserRepository};
use shared::pagination::PageInfo;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_bom_request_created;
use crate::routes::{
    approval_state_of, bom_response, bom_response_with_student, page_from, parse_status_filter,
};
use crate::services::notifications::{BomEvent, BomEventKind};

/// POST /api/v1/student/bom
///
/// Creates a request in pending state under the student's assigned guide.
/// Students without a guide cannot submit.
pub async fn create_bom_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateBomRequest>,
) -> Result<(StatusCode, Json<BomResponse>), ApiError> {
    request.validate()?;

    let users = UserRepository::new(state.pool.clone());
    let student = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".into()))?;

    let guide_id = student.guide_id.ok_or_else(|| {
        ApiError::Conflict("No guide assigned. Join a team before submitting requests.".into())
    })?;

    let notify_guide = request.notify_guide;
    let repo = BomRequestRepository::new(state.pool.clone());
    let entity = repo
        .create(student.id, guide_id, student.team_id, &request)
        .await?;

    record_bom_request_created();
    tracing::info!(request_id = %entity.id, student_id = %student.id, "BOM request created");

    if notify_guide {
        state.notifications.publish(BomEvent::new(
            BomEventKind::Submitted,
            entity.id,
            entity.student_id,
            entity.guide_id,
            auth.user_id,
        ));
    }

    let brief = UserBrief {
        id: student.id,
        name: student.name,
        email: student.email,
    };
    Ok((StatusCode::CREATED, Json(bom_response(entity, brief))))
}

/// GET /api/v1/student/bom
pub async fn list_bom_requests(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<BomListQuery>,
) -> Result<Json<BomListResponse>, ApiError> {
    let status = parse_status_filter(query.status.as_deref())?;
    let page = page_from(query.page, query.per_page);

    let repo = BomRequestRepository::new(state.pool.clone());
    let scope = BomScope::Student(auth.user_id);
    let rows = repo
        .list(scope, status, page.limit(), page.offset())
        .await?;
    let total = repo.count(scope, status).await?;

    Ok(Json(BomListResponse {
        data: rows.into_iter().map(bom_response_with_student).collect(),
        pagination: PageInfo::new(page, total),
    }))
}

/// GET /api/v1/student/bom/export
///
/// Guide-approved, non-rejected requests. This is the data behind the
/// client-side PDF export.
pub async fn export_bom_requests(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<BomResponse>>, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let student = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".into()))?;
    let brief = UserBrief {
        id: student.id,
        name: student.name,
        email: student.email,
    };

    let repo = BomRequestRepository::new(state.pool.clone());
    let rows = repo.list_exportable_for_student(auth.user_id).await?;

    Ok(Json(
        rows.into_iter()
            .map(|e| bom_response(e, brief.clone()))
            .collect(),
    ))
}

/// PUT /api/v1/student/bom/:id
pub async fn update_bom_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateBomRequest>,
) -> Result<Json<BomResponse>, ApiError> {
    update.validate()?;
    if update.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }

    let repo = BomRequestRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("BOM request not found".into()))?;

    if entity.student_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "You can only modify your own requests".into(),
        ));
    }
    if !approval_state_of(&entity).student_can_modify() {
        return Err(ApiError::Conflict(
            "Request can no longer be modified after guide review".into(),
        ));
    }

    let updated = repo
        .update_fields(id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound("BOM request not found".into()))?;

    state.notifications.publish(BomEvent::new(
        BomEventKind::Updated,
        updated.id,
        updated.student_id,
        updated.guide_id,
        auth.user_id,
    ));

    let users = UserRepository::new(state.pool.clone());
    let student = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".into()))?;
    let brief = UserBrief {
        id: student.id,
        name: student.name,
        email: student.email,
    };
    Ok(Json(bom_response(updated, brief)))
}

/// DELETE /api/v1/student/bom/:id
pub async fn delete_bom_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = BomRequestRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("BOM request not found".into()))?;

    if entity.student_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "You can only delete your own requests".into(),
        ));
    }
    if !approval_state_of(&entity).student_can_modify() {
        return Err(ApiError::Conflict(
            "Request can no longer be deleted after guide review".into(),
        ));
    }

    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("BOM request not found".into()));
    }

    tracing::info!(request_id = %id, student_id = %auth.user_id, "BOM request deleted");

    state.notifications.publish(BomEvent::new(
        BomEventKind::Deleted,
        entity.id,
        entity.student_id,
        entity.guide_id,
        auth.user_id,
    ));

    Ok(StatusCode::NO_CONTENT)
}

