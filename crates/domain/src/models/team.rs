//! Team domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::UserBrief;

/// Request body for creating a team.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 100))]
    pub team_name: Option<String>,

    #[validate(length(min = 1, max = 1000, message = "Problem statement is required"))]
    pub problem_statement: String,

    /// Faculty guide supervising the team.
    pub guide_id: Uuid,
}

/// Request body for assigning a student to a team.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AddTeamMemberRequest {
    pub student_id: Uuid,
}

/// Team representation with member briefs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    pub problem_statement: String,
    pub guide: UserBrief,
    pub members: Vec<UserBrief>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_team_requires_problem_statement() {
        let req = CreateTeamRequest {
            team_name: None,
            problem_statement: "".into(),
            guide_id: Uuid::new_v4(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_team_valid() {
        let req = CreateTeamRequest {
            team_name: Some("Team Hydra".into()),
            problem_statement: "Low-cost water quality monitor".into(),
            guide_id: Uuid::new_v4(),
        };
        assert!(req.validate().is_ok());
    }
}
