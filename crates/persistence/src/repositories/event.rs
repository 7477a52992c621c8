//! Event repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;
use domain::models::{CreateEventRequest, UpdateEventRequest};

const SELECT_COLUMNS: &str = "id, title, date, image_url, category, is_active, created_at";

/// Repository for event database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an event.
    pub async fn create(&self, request: &CreateEventRequest) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            INSERT INTO events (title, date, image_url, category)
            VALUES ($1, $2, $3, $4)
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(&request.title)
        .bind(&request.date)
        .bind(&request.image_url)
        .bind(&request.category)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            "SELECT {SELECT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List events, newest first. Non-admin callers see active events only.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events");
        let result = if include_inactive {
            sqlx::query_as::<_, EventEntity>(&format!(
                "SELECT {SELECT_COLUMNS} FROM events ORDER BY created_at DESC"
            ))
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, EventEntity>(&format!(
                "SELECT {SELECT_COLUMNS} FROM events WHERE is_active = TRUE ORDER BY created_at DESC"
            ))
            .fetch_all(&self.pool)
            .await
        };
        timer.record();
        result
    }

    /// Apply a partial update. Returns None if the event does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        update: &UpdateEventRequest,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            UPDATE events SET
                title = COALESCE($2, title),
                date = COALESCE($3, date),
                image_url = COALESCE($4, image_url),
                category = COALESCE($5, category),
                is_active = COALESCE($6, is_active)
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(update.title.as_deref())
        .bind(update.date.as_deref())
        .bind(update.image_url.as_deref())
        .bind(update.category.as_deref())
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an event.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Total number of events.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_events");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }
}
