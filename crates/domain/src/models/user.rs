//! User domain models and role definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::jwt::TokenRole;
use uuid::Uuid;

/// Portal role. Mirrors the JWT `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Lab,
    Admin,
}

impl Role {
    /// Parses a role from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "faculty" => Some(Role::Faculty),
            "lab" => Some(Role::Lab),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Lab => "lab",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Role> for TokenRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Student => TokenRole::Student,
            Role::Faculty => TokenRole::Faculty,
            Role::Lab => TokenRole::Lab,
            Role::Admin => TokenRole::Admin,
        }
    }
}

impl From<TokenRole> for Role {
    fn from(role: TokenRole) -> Self {
        match role {
            TokenRole::Student => Role::Student,
            TokenRole::Faculty => Role::Faculty,
            TokenRole::Lab => Role::Lab,
            TokenRole::Admin => Role::Admin,
        }
    }
}

/// Brief user info embedded in other responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserBrief {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Full user profile response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in [Role::Student, Role::Faculty, Role::Lab, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_parse_unknown() {
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_role_token_role_roundtrip() {
        for role in [Role::Student, Role::Faculty, Role::Lab, Role::Admin] {
            let token_role: TokenRole = role.into();
            assert_eq!(Role::from(token_role), role);
        }
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Lab).unwrap(), "\"lab\"");
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
    }
}
