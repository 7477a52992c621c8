//! Team repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{TeamEntity, UserEntity};
use crate::metrics::QueryTimer;

const SELECT_COLUMNS: &str =
    "id, team_name, problem_statement, guide_id, created_at, updated_at";

const USER_COLUMNS: &str = "id, email, name, password_hash, role, is_active, \
     must_change_password, division, team_id, guide_id, last_login, created_at, updated_at";

/// Repository for team database operations.
#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    /// Creates a new TeamRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a team under a guide.
    pub async fn create(
        &self,
        team_name: Option<&str>,
        problem_statement: &str,
        guide_id: Uuid,
    ) -> Result<TeamEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_team");
        let result = sqlx::query_as::<_, TeamEntity>(&format!(
            r#"
            INSERT INTO teams (team_name, problem_statement, guide_id)
            VALUES ($1, $2, $3)
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(team_name)
        .bind(problem_statement)
        .bind(guide_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a team by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_by_id");
        let result = sqlx::query_as::<_, TeamEntity>(&format!(
            "SELECT {SELECT_COLUMNS} FROM teams WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all teams, newest first.
    pub async fn list(&self) -> Result<Vec<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_teams");
        let result = sqlx::query_as::<_, TeamEntity>(&format!(
            "SELECT {SELECT_COLUMNS} FROM teams ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Teams supervised by one guide.
    pub async fn list_for_guide(&self, guide_id: Uuid) -> Result<Vec<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_teams_for_guide");
        let result = sqlx::query_as::<_, TeamEntity>(&format!(
            "SELECT {SELECT_COLUMNS} FROM teams WHERE guide_id = $1 ORDER BY created_at DESC"
        ))
        .bind(guide_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Students currently assigned to a team.
    pub async fn members_of(&self, team_id: Uuid) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_team_members");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE team_id = $1 ORDER BY name"
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Total number of teams.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_teams");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teams")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }
}
