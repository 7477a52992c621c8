//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod equipment;
pub mod events;
pub mod faculty_bom;
pub mod health;
pub mod lab_bom;
pub mod materials;
pub mod notifications;
pub mod student_bom;
pub mod teams;
pub mod users;

use domain::models::{ApprovalState, BomResponse, BomStatus, UserBrief};
use persistence::entities::{BomRequestEntity, BomRequestWithStudentEntity};
use shared::pagination::{PageQuery, DEFAULT_PER_PAGE};

/// Build a clamped page query from optional query-string values.
pub(crate) fn page_from(page: Option<u32>, per_page: Option<u32>) -> PageQuery {
    PageQuery {
        page: page.unwrap_or(1),
        per_page: per_page.unwrap_or(DEFAULT_PER_PAGE),
    }
    .clamped()
}

/// Assemble the API representation from a bare row plus the student brief.
pub(crate) fn bom_response(entity: BomRequestEntity, student: UserBrief) -> BomResponse {
    let status = BomStatus::from(entity.status);
    let approval_state = ApprovalState::derive(
        entity.guide_approved,
        entity.lab_approved,
        status,
        entity.rejection_reason.as_deref(),
    );
    BomResponse {
        id: entity.id,
        student,
        guide_id: entity.guide_id,
        team_id: entity.team_id,
        sl_no: entity.sl_no,
        sprint_no: entity.sprint_no,
        date: entity.date,
        part_name: entity.part_name,
        consumable_name: entity.consumable_name,
        specification: entity.specification,
        qty: entity.qty,
        length: entity.length,
        width: entity.width,
        weight: entity.weight,
        guide_approved: entity.guide_approved,
        guide_approved_at: entity.guide_approved_at,
        lab_approved: entity.lab_approved,
        lab_approved_by: entity.lab_approved_by,
        lab_approved_at: entity.lab_approved_at,
        status,
        rejection_reason: entity.rejection_reason,
        approval_state,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

/// Assemble the API representation from a listing row that already carries
/// the student's name and email.
pub(crate) fn bom_response_with_student(entity: BomRequestWithStudentEntity) -> BomResponse {
    let student = UserBrief {
        id: entity.student_id,
        name: entity.student_name,
        email: entity.student_email,
    };
    let status = BomStatus::from(entity.status);
    let approval_state = ApprovalState::derive(
        entity.guide_approved,
        entity.lab_approved,
        status,
        entity.rejection_reason.as_deref(),
    );
    BomResponse {
        id: entity.id,
        student,
        guide_id: entity.guide_id,
        team_id: entity.team_id,
        sl_no: entity.sl_no,
        sprint_no: entity.sprint_no,
        date: entity.date,
        part_name: entity.part_name,
        consumable_name: entity.consumable_name,
        specification: entity.specification,
        qty: entity.qty,
        length: entity.length,
        width: entity.width,
        weight: entity.weight,
        guide_approved: entity.guide_approved,
        guide_approved_at: entity.guide_approved_at,
        lab_approved: entity.lab_approved,
        lab_approved_by: entity.lab_approved_by,
        lab_approved_at: entity.lab_approved_at,
        status,
        rejection_reason: entity.rejection_reason,
        approval_state,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

/// Derive the combined approval state of a stored row.
pub(crate) fn approval_state_of(entity: &BomRequestEntity) -> ApprovalState {
    ApprovalState::derive(
        entity.guide_approved,
        entity.lab_approved,
        BomStatus::from(entity.status),
        entity.rejection_reason.as_deref(),
    )
}

/// Parse an optional `status` query string into the storage enum.
/// Unknown values are a validation error rather than an empty result.
pub(crate) fn parse_status_filter(
    status: Option<&str>,
) -> Result<Option<persistence::entities::BomStatusDb>, crate::error::ApiError> {
    use persistence::entities::BomStatusDb;
    match status {
        None => Ok(None),
        Some("pending") => Ok(Some(BomStatusDb::Pending)),
        Some("approved") => Ok(Some(BomStatusDb::Approved)),
        Some("rejected") => Ok(Some(BomStatusDb::Rejected)),
        Some(other) => Err(crate::error::ApiError::validation(format!(
            "Unknown status filter: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_filter() {
        assert!(parse_status_filter(None).unwrap().is_none());
        assert!(parse_status_filter(Some("pending")).unwrap().is_some());
        assert!(parse_status_filter(Some("archived")).is_err());
    }

    #[test]
    fn test_page_from_defaults_and_clamps() {
        let q = page_from(None, None);
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, DEFAULT_PER_PAGE);

        let q = page_from(Some(0), Some(10_000));
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, shared::pagination::MAX_PER_PAGE);
    }
}
