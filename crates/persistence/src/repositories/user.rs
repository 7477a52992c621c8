//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{RoleDb, UserEntity};
use crate::metrics::QueryTimer;
use domain::models::UserCounts;

const SELECT_COLUMNS: &str = "id, email, name, password_hash, role, is_active, \
     must_change_password, division, team_id, guide_id, last_login, created_at, updated_at";

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user. Emails are stored lowercased so the unique
    /// constraint is case-insensitive in practice.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: RoleDb,
        division: Option<&str>,
        guide_id: Option<Uuid>,
        must_change_password: bool,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash, role, division, guide_id, must_change_password)
            VALUES (LOWER($1), $2, $3, $4, $5, $6, $7)
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role)
        .bind(division)
        .bind(guide_id)
        .bind(must_change_password)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE email = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Stamp the last successful login time.
    pub async fn update_last_login(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("update_user_last_login");
        let result = sqlx::query("UPDATE users SET last_login = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|_| ());
        timer.record();
        result
    }

    /// Replace the stored password hash and clear the forced-change flag.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_user_password");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, must_change_password = FALSE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Enable or disable an account. Disabled accounts cannot log in and
    /// their existing refresh sessions are revoked by the caller.
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("set_user_active");
        let result = sqlx::query("UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(is_active)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// List users, optionally filtered by role, newest first.
    pub async fn list(
        &self,
        role: Option<RoleDb>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_users");
        let result = match role {
            Some(role) => {
                sqlx::query_as::<_, UserEntity>(&format!(
                    r#"
                    SELECT {SELECT_COLUMNS} FROM users
                    WHERE role = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                ))
                .bind(role)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, UserEntity>(&format!(
                    r#"
                    SELECT {SELECT_COLUMNS} FROM users
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        result
    }

    /// Count users, optionally filtered by role.
    pub async fn count(&self, role: Option<RoleDb>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_users");
        let result = match role {
            Some(role) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
                    .bind(role)
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
                    .fetch_one(&self.pool)
                    .await
            }
        };
        timer.record();
        result
    }

    /// Active faculty members, for guide selection lists.
    pub async fn list_guides(&self) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_guides");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM users
            WHERE role = 'faculty' AND is_active = TRUE
            ORDER BY name
            "#,
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Attach a student to a team and its guide.
    pub async fn assign_team(
        &self,
        student_id: Uuid,
        team_id: Uuid,
        guide_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("assign_user_team");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET team_id = $2, guide_id = $3, updated_at = NOW()
            WHERE id = $1 AND role = 'student'
            "#,
        )
        .bind(student_id)
        .bind(team_id)
        .bind(guide_id)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Per-role user totals for the admin dashboard.
    pub async fn count_by_role(&self) -> Result<UserCounts, sqlx::Error> {
        let timer = QueryTimer::new("count_users_by_role");
        let rows = sqlx::query_as::<_, (RoleDb, i64)>(
            "SELECT role, COUNT(*) FROM users GROUP BY role",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        let mut counts = UserCounts::default();
        for (role, n) in rows? {
            match role {
                RoleDb::Student => counts.students = n,
                RoleDb::Faculty => counts.faculty = n,
                RoleDb::Lab => counts.lab = n,
                RoleDb::Admin => counts.admins = n,
            }
        }
        Ok(counts)
    }
}
