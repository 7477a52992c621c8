//! BOM request domain models and the approval state machine.
//!
//! A BOM (Bill of Materials) request is a student's itemized request for lab
//! consumables tied to a project sprint. It passes through two independent
//! approval gates: the supervising faculty guide and the lab in-charge.
//! Storage keeps the two boolean gates plus a coarse status column; this
//! module interprets them as a single tagged [`ApprovalState`] which is the
//! sole authority on which transitions are legal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::PageInfo;
use uuid::Uuid;
use validator::Validate;

use crate::models::user::UserBrief;

/// Coarse request status as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BomStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for BomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BomStatus::Pending => write!(f, "pending"),
            BomStatus::Approved => write!(f, "approved"),
            BomStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// The two approval dimensions a request moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalGate {
    Guide,
    Lab,
}

/// Combined approval state of a BOM request.
///
/// Derived from the stored `guide_approved`/`lab_approved` flags and the
/// `status` column. `Rejected` overrides both flags and is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ApprovalState {
    Pending,
    GuideApproved,
    LabApproved,
    FullyApproved,
    Rejected {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl ApprovalState {
    /// Derives the combined state from the stored columns.
    pub fn derive(
        guide_approved: bool,
        lab_approved: bool,
        status: BomStatus,
        rejection_reason: Option<&str>,
    ) -> Self {
        if status == BomStatus::Rejected {
            return ApprovalState::Rejected {
                reason: rejection_reason
                    .filter(|r| !r.is_empty())
                    .map(str::to_string),
            };
        }
        match (guide_approved, lab_approved) {
            (false, false) => ApprovalState::Pending,
            (true, false) => ApprovalState::GuideApproved,
            (false, true) => ApprovalState::LabApproved,
            (true, true) => ApprovalState::FullyApproved,
        }
    }

    /// Rejection is the only terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApprovalState::Rejected { .. })
    }

    /// Whether the given gate may still approve from this state.
    ///
    /// The two gates are independent: approving one never blocks the other.
    /// Re-approving an already-approved gate is idempotent and allowed.
    /// Only rejection closes both gates.
    pub fn can_approve(&self, _gate: ApprovalGate) -> bool {
        !self.is_terminal()
    }

    /// Whether either gate may still reject from this state.
    pub fn can_reject(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether the owning student may still edit or delete the request.
    ///
    /// Edits and deletes are gated on guide approval, not on the lab gate:
    /// a lab-approved but guide-pending request is still the student's to
    /// change. Rejected requests stay visible but frozen.
    pub fn student_can_modify(&self) -> bool {
        matches!(self, ApprovalState::Pending | ApprovalState::LabApproved)
    }

    /// Whether the request belongs in the export listing (the data behind
    /// the client-side PDF): guide approved and not rejected.
    pub fn exportable(&self) -> bool {
        matches!(
            self,
            ApprovalState::GuideApproved | ApprovalState::FullyApproved
        )
    }

    /// Whether the request still counts toward the given gate's pending
    /// dashboard count.
    pub fn pending_for(&self, gate: ApprovalGate) -> bool {
        match gate {
            ApprovalGate::Guide => matches!(
                self,
                ApprovalState::Pending | ApprovalState::LabApproved
            ),
            ApprovalGate::Lab => matches!(
                self,
                ApprovalState::Pending | ApprovalState::GuideApproved
            ),
        }
    }
}

/// Request body for creating a BOM request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateBomRequest {
    #[validate(length(min = 1, max = 20, message = "Serial number is required"))]
    pub sl_no: String,

    #[validate(length(min = 1, max = 20, message = "Sprint number is required"))]
    pub sprint_no: String,

    pub date: NaiveDate,

    #[validate(length(min = 1, max = 200, message = "Part name is required"))]
    pub part_name: String,

    #[validate(length(min = 1, max = 200, message = "Consumable name is required"))]
    pub consumable_name: String,

    #[validate(length(min = 1, max = 500, message = "Specification is required"))]
    pub specification: String,

    #[validate(custom(function = "shared::validation::validate_qty"))]
    pub qty: i32,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_dimension"))]
    pub length: f64,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_dimension"))]
    pub width: f64,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_dimension"))]
    pub weight: f64,

    /// Whether to notify the guide about the new request. Defaults to true.
    #[serde(default = "default_notify_guide")]
    pub notify_guide: bool,
}

fn default_notify_guide() -> bool {
    true
}

/// Request body for a student editing their own pending request.
/// All fields optional; only provided fields change.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateBomRequest {
    #[validate(length(min = 1, max = 20))]
    pub sl_no: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub sprint_no: Option<String>,
    pub date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 200))]
    pub part_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub consumable_name: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub specification: Option<String>,
    #[validate(custom(function = "validate_opt_qty"))]
    pub qty: Option<i32>,
    #[validate(custom(function = "validate_opt_dimension"))]
    pub length: Option<f64>,
    #[validate(custom(function = "validate_opt_dimension"))]
    pub width: Option<f64>,
    #[validate(custom(function = "validate_opt_dimension"))]
    pub weight: Option<f64>,
}

impl UpdateBomRequest {
    pub fn is_empty(&self) -> bool {
        self.sl_no.is_none()
            && self.sprint_no.is_none()
            && self.date.is_none()
            && self.part_name.is_none()
            && self.consumable_name.is_none()
            && self.specification.is_none()
            && self.qty.is_none()
            && self.length.is_none()
            && self.width.is_none()
            && self.weight.is_none()
    }
}

fn validate_opt_qty(qty: i32) -> Result<(), validator::ValidationError> {
    shared::validation::validate_qty(qty)
}

fn validate_opt_dimension(value: f64) -> Result<(), validator::ValidationError> {
    shared::validation::validate_dimension(value)
}

/// Request body for rejecting on the faculty path. Reason optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GuideRejectRequest {
    pub reason: Option<String>,
}

/// Request body for rejecting on the lab path. Reason mandatory.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LabRejectRequest {
    #[validate(
        custom(function = "validate_rejection_reason"),
        length(max = 500, message = "Rejection reason is too long")
    )]
    pub reason: String,
}

// Whitespace-only reasons would survive a plain min-length check.
fn validate_rejection_reason(reason: &str) -> Result<(), validator::ValidationError> {
    if reason.trim().is_empty() {
        let mut err = validator::ValidationError::new("reason_required");
        err.message = Some("Rejection reason is required".into());
        return Err(err);
    }
    Ok(())
}

/// Query parameters for BOM list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BomListQuery {
    /// Optional status filter: pending, approved, rejected.
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Full BOM request representation returned by every BOM endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BomResponse {
    pub id: Uuid,
    pub student: UserBrief,
    pub guide_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
    pub sl_no: String,
    pub sprint_no: String,
    pub date: NaiveDate,
    pub part_name: String,
    pub consumable_name: String,
    pub specification: String,
    pub qty: i32,
    pub length: f64,
    pub width: f64,
    pub weight: f64,
    pub guide_approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_approved_at: Option<DateTime<Utc>>,
    pub lab_approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_approved_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_approved_at: Option<DateTime<Utc>>,
    pub status: BomStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub approval_state: ApprovalState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response for paginated BOM listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BomListResponse {
    pub data: Vec<BomResponse>,
    pub pagination: PageInfo,
}

/// Response for the pending-count dashboard endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PendingCountResponse {
    pub pending: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_pending() {
        let state = ApprovalState::derive(false, false, BomStatus::Pending, None);
        assert_eq!(state, ApprovalState::Pending);
    }

    #[test]
    fn test_derive_guide_approved() {
        let state = ApprovalState::derive(true, false, BomStatus::Pending, None);
        assert_eq!(state, ApprovalState::GuideApproved);
    }

    #[test]
    fn test_derive_lab_approved_first() {
        // Lab may approve before the guide; no ordering dependency.
        let state = ApprovalState::derive(false, true, BomStatus::Pending, None);
        assert_eq!(state, ApprovalState::LabApproved);
    }

    #[test]
    fn test_derive_fully_approved() {
        let state = ApprovalState::derive(true, true, BomStatus::Approved, None);
        assert_eq!(state, ApprovalState::FullyApproved);
    }

    #[test]
    fn test_rejected_overrides_flags() {
        // Stored flags are not cleared on rejection; the derived state
        // must still read as rejected.
        let state = ApprovalState::derive(true, true, BomStatus::Rejected, Some("out of stock"));
        assert_eq!(
            state,
            ApprovalState::Rejected {
                reason: Some("out of stock".to_string())
            }
        );
    }

    #[test]
    fn test_rejected_empty_reason_normalized() {
        let state = ApprovalState::derive(false, false, BomStatus::Rejected, Some(""));
        assert_eq!(state, ApprovalState::Rejected { reason: None });
    }

    #[test]
    fn test_rejected_is_terminal() {
        let state = ApprovalState::Rejected { reason: None };
        assert!(state.is_terminal());
        assert!(!state.can_approve(ApprovalGate::Guide));
        assert!(!state.can_approve(ApprovalGate::Lab));
        assert!(!state.can_reject());
    }

    #[test]
    fn test_gates_are_independent() {
        // Approving one gate never blocks the other.
        let guide_done = ApprovalState::GuideApproved;
        assert!(guide_done.can_approve(ApprovalGate::Lab));

        let lab_done = ApprovalState::LabApproved;
        assert!(lab_done.can_approve(ApprovalGate::Guide));
    }

    #[test]
    fn test_reapproval_is_idempotent() {
        assert!(ApprovalState::GuideApproved.can_approve(ApprovalGate::Guide));
        assert!(ApprovalState::FullyApproved.can_approve(ApprovalGate::Lab));
    }

    #[test]
    fn test_reject_after_approval_allowed() {
        // Either role may reject a request the other already approved.
        assert!(ApprovalState::GuideApproved.can_reject());
        assert!(ApprovalState::LabApproved.can_reject());
        assert!(ApprovalState::FullyApproved.can_reject());
    }

    #[test]
    fn test_rejection_preserves_recorded_approvals() {
        // Rejecting never clears the stored approval flags; the derived
        // state reads rejected regardless of what they say.
        for (guide, lab) in [(true, false), (false, true), (true, true)] {
            let state = ApprovalState::derive(guide, lab, BomStatus::Rejected, Some("damaged"));
            assert!(state.is_terminal());
            assert!(!state.exportable());
        }
    }

    #[test]
    fn test_student_can_modify_until_guide_approval() {
        assert!(ApprovalState::Pending.student_can_modify());
        assert!(ApprovalState::LabApproved.student_can_modify());
        assert!(!ApprovalState::GuideApproved.student_can_modify());
        assert!(!ApprovalState::FullyApproved.student_can_modify());
        assert!(!ApprovalState::Rejected { reason: None }.student_can_modify());
    }

    #[test]
    fn test_exportable_requires_guide_approval_and_not_rejected() {
        assert!(ApprovalState::GuideApproved.exportable());
        assert!(ApprovalState::FullyApproved.exportable());
        assert!(!ApprovalState::Pending.exportable());
        assert!(!ApprovalState::LabApproved.exportable());
        assert!(!ApprovalState::Rejected {
            reason: Some("n/a".into())
        }
        .exportable());
    }

    #[test]
    fn test_rejection_leaves_both_pending_counts() {
        let rejected = ApprovalState::Rejected { reason: None };
        assert!(!rejected.pending_for(ApprovalGate::Guide));
        assert!(!rejected.pending_for(ApprovalGate::Lab));
    }

    #[test]
    fn test_pending_counts_track_own_gate_only() {
        // Lab approval does not clear the guide's pending count.
        let lab_done = ApprovalState::LabApproved;
        assert!(lab_done.pending_for(ApprovalGate::Guide));
        assert!(!lab_done.pending_for(ApprovalGate::Lab));

        let guide_done = ApprovalState::GuideApproved;
        assert!(!guide_done.pending_for(ApprovalGate::Guide));
        assert!(guide_done.pending_for(ApprovalGate::Lab));
    }

    #[test]
    fn test_approval_state_serialization() {
        let json = serde_json::to_value(ApprovalState::GuideApproved).unwrap();
        assert_eq!(json["state"], "guide_approved");

        let json = serde_json::to_value(ApprovalState::Rejected {
            reason: Some("Material not available in inventory".into()),
        })
        .unwrap();
        assert_eq!(json["state"], "rejected");
        assert_eq!(json["reason"], "Material not available in inventory");
    }

    #[test]
    fn test_create_bom_request_validation() {
        let req = CreateBomRequest {
            sl_no: "1".into(),
            sprint_no: "2".into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            part_name: "Chassis plate".into(),
            consumable_name: "Aluminium 6061".into(),
            specification: "2mm sheet".into(),
            qty: 4,
            length: 0.4,
            width: 0.2,
            weight: 0.0,
            notify_guide: true,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_bom_request_zero_qty_rejected() {
        let req = CreateBomRequest {
            sl_no: "1".into(),
            sprint_no: "2".into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            part_name: "Chassis plate".into(),
            consumable_name: "Aluminium 6061".into(),
            specification: "2mm sheet".into(),
            qty: 0,
            length: 0.0,
            width: 0.0,
            weight: 0.0,
            notify_guide: true,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_bom_request_is_empty() {
        assert!(UpdateBomRequest::default().is_empty());

        let update = UpdateBomRequest {
            qty: Some(3),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_lab_reject_requires_reason() {
        let req = LabRejectRequest { reason: "".into() };
        assert!(req.validate().is_err());

        let req = LabRejectRequest {
            reason: "Material not available in inventory".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_lab_reject_whitespace_reason_rejected() {
        let req = LabRejectRequest {
            reason: "   ".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_bom_status_display() {
        assert_eq!(BomStatus::Pending.to_string(), "pending");
        assert_eq!(BomStatus::Rejected.to_string(), "rejected");
    }
}
