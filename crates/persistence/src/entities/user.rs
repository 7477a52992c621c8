//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Role;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for portal roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum RoleDb {
    Student,
    Faculty,
    Lab,
    Admin,
}

impl From<RoleDb> for Role {
    fn from(role: RoleDb) -> Self {
        match role {
            RoleDb::Student => Role::Student,
            RoleDb::Faculty => Role::Faculty,
            RoleDb::Lab => Role::Lab,
            RoleDb::Admin => Role::Admin,
        }
    }
}

impl From<Role> for RoleDb {
    fn from(role: Role) -> Self {
        match role {
            Role::Student => RoleDb::Student,
            Role::Faculty => RoleDb::Faculty,
            Role::Lab => RoleDb::Lab,
            Role::Admin => RoleDb::Admin,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: RoleDb,
    pub is_active: bool,
    pub must_change_password: bool,
    pub division: Option<String>,
    pub team_id: Option<Uuid>,
    pub guide_id: Option<Uuid>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_db_roundtrip() {
        for role in [Role::Student, Role::Faculty, Role::Lab, Role::Admin] {
            let db: RoleDb = role.into();
            assert_eq!(Role::from(db), role);
        }
    }
}
