//! Admin portal domain models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::Role;

/// Query parameters for the admin user listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminUserListQuery {
    /// Optional role filter: student, faculty, lab, admin.
    pub role: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Request body for pre-registering a user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct AdminCreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    pub role: Role,

    /// Temporary password the user must change on first login.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(max = 10))]
    pub division: Option<String>,
}

/// Request body for toggling a user's active flag.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// Per-role user counts.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserCounts {
    pub students: i64,
    pub faculty: i64,
    pub lab: i64,
    pub admins: i64,
}

/// Per-state BOM request counts.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BomCounts {
    pub pending: i64,
    pub guide_approved: i64,
    pub lab_approved: i64,
    pub fully_approved: i64,
    pub rejected: i64,
}

/// Aggregate portal statistics for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminStatsResponse {
    pub users: UserCounts,
    pub bom_requests: BomCounts,
    pub equipment: i64,
    pub materials: i64,
    pub events: i64,
    pub teams: i64,
}

/// Generic acknowledgement body for mutations without a richer payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

impl AckResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_create_user_validation() {
        let req = AdminCreateUserRequest {
            email: "faculty01@kletech.ac.in".into(),
            name: "Dr. Guide".into(),
            role: Role::Faculty,
            password: "TempPass1".into(),
            division: Some("B".into()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_admin_create_user_bad_email() {
        let req = AdminCreateUserRequest {
            email: "not-an-email".into(),
            name: "Dr. Guide".into(),
            role: Role::Faculty,
            password: "TempPass1".into(),
            division: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_ack_response() {
        let ack = AckResponse::ok("BOM request deleted");
        assert!(ack.success);
        assert_eq!(ack.message, "BOM request deleted");
    }
}
