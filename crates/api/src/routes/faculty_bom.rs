//! Faculty guide BOM review endpoints.
//!
//! Guides see the requests of students they supervise, approve or reject
//! them, and may patch request fields on the student's behalf. The guide
//! gate is independent of the lab gate; only rejection is terminal.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ApprovalGate, BomListQuery, BomListResponse, BomResponse, BomStatus, GuideRejectRequest,
    PendingCountResponse, UpdateBomRequest, UserBrief,
};
use persistence::entities::{BomRequestEntity, BomStatusDb};
use persistence::repositories::{BomRequestRepository, BomScope, UserRepository};
use shared::pagination::PageInfo;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_bom_decision;
use crate::routes::{approval_state_of, bom_response, bom_response_with_student, parse_status_filter};
use crate::services::notifications::{BomEvent, BomEventKind};

/// PATCH body: any subset of request fields plus an optional coarse status.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FacultyPatchRequest {
    #[serde(flatten)]
    pub fields: UpdateBomRequest,
    pub status: Option<BomStatus>,
}

async fn load_supervised(
    repo: &BomRequestRepository,
    id: Uuid,
    guide_id: Uuid,
) -> Result<BomRequestEntity, ApiError> {
    let entity = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("BOM request not found".into()))?;
    if entity.guide_id != guide_id {
        return Err(ApiError::Forbidden(
            "You can only review requests of your own students".into(),
        ));
    }
    Ok(entity)
}

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

/// GET /api/v1/faculty/bom
pub async fn list_bom_requests(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<BomListQuery>,
) -> Result<Json<BomListResponse>, ApiError> {
    let status = parse_status_filter(query.status.as_deref())?;
    let page = super::page_from(query.page, query.per_page);

    let repo = BomRequestRepository::new(state.pool.clone());
    let scope = BomScope::Guide(auth.user_id);
    let rows = repo
        .list(scope, status, page.limit(), page.offset())
        .await?;
    let total = repo.count(scope, status).await?;

    Ok(Json(BomListResponse {
        data: rows.into_iter().map(bom_response_with_student).collect(),
        pagination: PageInfo::new(page, total),
    }))
}

/// GET /api/v1/faculty/bom/pending-count
///
/// Number of supervised requests still awaiting this guide's decision.
/// Lab approval does not clear a request from this count.
pub async fn pending_count(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<PendingCountResponse>, ApiError> {
    let repo = BomRequestRepository::new(state.pool.clone());
    let pending = repo.pending_count_for_guide(auth.user_id).await?;
    Ok(Json(PendingCountResponse { pending }))
}

/// POST /api/v1/faculty/bom/:id/approve
pub async fn approve_bom_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<BomResponse>, ApiError> {
    let repo = BomRequestRepository::new(state.pool.clone());
    let entity = load_supervised(&repo, id, auth.user_id).await?;

    if !approval_state_of(&entity).can_approve(ApprovalGate::Guide) {
        return Err(ApiError::Conflict(
            "Rejected requests cannot be approved".into(),
        ));
    }

    let updated = repo
        .guide_approve(id)
        .await?
        .ok_or_else(|| ApiError::Conflict("Request was rejected concurrently".into()))?;

    record_bom_decision("guide", "approve");
    tracing::info!(request_id = %id, guide_id = %auth.user_id, "Guide approved BOM request");

    state.notifications.publish(BomEvent::new(
        BomEventKind::GuideApproved,
        updated.id,
        updated.student_id,
        updated.guide_id,
        auth.user_id,
    ));

    response_with_student(&state, updated).await.map(Json)
}

/// POST /api/v1/faculty/bom/:id/reject
///
/// Rejection reason is optional on the faculty path.
pub async fn reject_bom_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<GuideRejectRequest>,
) -> Result<Json<BomResponse>, ApiError> {
    let repo = BomRequestRepository::new(state.pool.clone());
    let entity = load_supervised(&repo, id, auth.user_id).await?;

    if !approval_state_of(&entity).can_reject() {
        return Err(ApiError::Conflict("Request is already rejected".into()));
    }

    let reason = request
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());
    let updated = repo
        .guide_reject(id, reason)
        .await?
        .ok_or_else(|| ApiError::Conflict("Request was rejected concurrently".into()))?;

    record_bom_decision("guide", "reject");
    tracing::info!(request_id = %id, guide_id = %auth.user_id, "Guide rejected BOM request");

    state.notifications.publish(BomEvent::new(
        BomEventKind::GuideRejected,
        updated.id,
        updated.student_id,
        updated.guide_id,
        auth.user_id,
    ));

    response_with_student(&state, updated).await.map(Json)
}

/// PATCH /api/v1/faculty/bom/:id
///
/// Guides may correct request fields and may set the coarse status
/// directly. Setting `approved` also sets the guide approval flag.
pub async fn update_bom_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(patch): Json<FacultyPatchRequest>,
) -> Result<Json<BomResponse>, ApiError> {
    patch.fields.validate()?;
    if patch.fields.is_empty() && patch.status.is_none() {
        return Err(ApiError::validation("No fields to update"));
    }

    let repo = BomRequestRepository::new(state.pool.clone());
    let entity = load_supervised(&repo, id, auth.user_id).await?;

    if approval_state_of(&entity).is_terminal() {
        return Err(ApiError::Conflict(
            "Rejected requests cannot be modified".into(),
        ));
    }

    let mut current = entity;
    if !patch.fields.is_empty() {
        current = repo
            .update_fields(id, &patch.fields)
            .await?
            .ok_or_else(|| ApiError::NotFound("BOM request not found".into()))?;
    }

    if let Some(status) = patch.status {
        current = repo
            .set_status(id, BomStatusDb::from(status))
            .await?
            .ok_or_else(|| ApiError::Conflict("Request was rejected concurrently".into()))?;

        let kind = match status {
            BomStatus::Approved => Some(BomEventKind::GuideApproved),
            BomStatus::Rejected => Some(BomEventKind::GuideRejected),
            BomStatus::Pending => None,
        };
        if let Some(kind) = kind {
            match kind {
                BomEventKind::GuideApproved => record_bom_decision("guide", "approve"),
                BomEventKind::GuideRejected => record_bom_decision("guide", "reject"),
                _ => {}
            }
            state.notifications.publish(BomEvent::new(
                kind,
                current.id,
                current.student_id,
                current.guide_id,
                auth.user_id,
            ));
        }
    } else {
        state.notifications.publish(BomEvent::new(
            BomEventKind::Updated,
            current.id,
            current.student_id,
            current.guide_id,
            auth.user_id,
        ));
    }

    response_with_student(&state, current).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_request_flatten() {
        let json = r#"{"qty": 5, "status": "approved"}"#;
        let patch: FacultyPatchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(patch.fields.qty, Some(5));
        assert_eq!(patch.status, Some(BomStatus::Approved));
    }

    #[test]
    fn test_patch_request_fields_only() {
        let json = r#"{"specification": "3mm sheet"}"#;
        let patch: FacultyPatchRequest = serde_json::from_str(json).unwrap();
        assert!(patch.status.is_none());
        assert!(!patch.fields.is_empty());
    }
}
