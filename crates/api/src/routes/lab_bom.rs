//! Lab in-charge BOM review endpoints.
//!
//! Any lab in-charge sees every request in the lab; the approving user is
//! recorded on the row. Lab rejection requires a reason since the student
//! acts on it to resubmit.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ApprovalGate, BomListQuery, BomListResponse, BomResponse, LabRejectRequest,
    PendingCountResponse, UserBrief,
};
use persistence::entities::BomRequestEntity;
use persistence::repositories::{BomRequestRepository, BomScope, UserRepository};
use shared::pagination::PageInfo;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_bom_decision;
use crate::routes::{
    approval_state_of, bom_response, bom_response_with_student, page_from, parse_status_filter,
};
use crate::services::notifications::{BomEvent, BomEventKind};

async fn response_with_student(
    state: &AppState,
    entity: BomRequestEntity,
) -> Result<BomResponse, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let student = users
        .find_by_id(entity.student_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;
    Ok(bom_response(
        entity,
        UserBrief {
            id: student.id,
            name: student.name,
            email: student.email,
        },
    ))
}

/// GET /api/v1/lab/bom
pub async fn list_bom_requests(
    State(state): State<AppState>,
    _auth: UserAuth,
    Query(query): Query<BomListQuery>,
) -> Result<Json<BomListResponse>, ApiError> {
    let status = parse_status_filter(query.status.as_deref())?;
    let page = page_from(query.page, query.per_page);

    let repo = BomRequestRepository::new(state.pool.clone());
    let rows = repo
        .list(BomScope::Lab, status, page.limit(), page.offset())
        .await?;
    let total = repo.count(BomScope::Lab, status).await?;

    Ok(Json(BomListResponse {
        data: rows.into_iter().map(bom_response_with_student).collect(),
        pagination: PageInfo::new(page, total),
    }))
}

/// GET /api/v1/lab/bom/pending-count
///
/// Lab-wide count of requests still awaiting the lab gate. Guide approval
/// does not clear a request from this count.
pub async fn pending_count(
    State(state): State<AppState>,
    _auth: UserAuth,
) -> Result<Json<PendingCountResponse>, ApiError> {
    let repo = BomRequestRepository::new(state.pool.clone());
    let pending = repo.pending_count_for_lab().await?;
    Ok(Json(PendingCountResponse { pending }))
}

/// POST /api/v1/lab/bom/:id/approve
pub async fn approve_bom_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<BomResponse>, ApiError> {
    let repo = BomRequestRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("BOM request not found".into()))?;

    if !approval_state_of(&entity).can_approve(ApprovalGate::Lab) {
        return Err(ApiError::Conflict(
            "Rejected requests cannot be approved".into(),
        ));
    }

    let updated = repo
        .lab_approve(id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Conflict("Request was rejected concurrently".into()))?;

    record_bom_decision("lab", "approve");
    tracing::info!(request_id = %id, lab_user_id = %auth.user_id, "Lab approved BOM request");

    state.notifications.publish(BomEvent::new(
        BomEventKind::LabApproved,
        updated.id,
        updated.student_id,
        updated.guide_id,
        auth.user_id,
    ));

    response_with_student(&state, updated).await.map(Json)
}

/// POST /api/v1/lab/bom/:id/reject
///
/// Rejection reason is mandatory on the lab path.
pub async fn reject_bom_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<LabRejectRequest>,
) -> Result<Json<BomResponse>, ApiError> {
    request.validate()?;

    let repo = BomRequestRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("BOM request not found".into()))?;

    if !approval_state_of(&entity).can_reject() {
        return Err(ApiError::Conflict("Request is already rejected".into()));
    }

    let updated = repo
        .lab_reject(id, request.reason.trim())
        .await?
        .ok_or_else(|| ApiError::Conflict("Request was rejected concurrently".into()))?;

    record_bom_decision("lab", "reject");
    tracing::info!(request_id = %id, lab_user_id = %auth.user_id, "Lab rejected BOM request");

    state.notifications.publish(BomEvent::new(
        BomEventKind::LabRejected,
        updated.id,
        updated.student_id,
        updated.guide_id,
        auth.user_id,
    ));

    response_with_student(&state, updated).await.map(Json)
}
