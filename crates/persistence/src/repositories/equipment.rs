//! Equipment repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EquipmentEntity;
use crate::metrics::QueryTimer;
use domain::models::{CreateEquipmentRequest, UpdateEquipmentRequest};

const SELECT_COLUMNS: &str = "id, name, specification, description, additional_info, \
     image_url, in_charge, created_at, updated_at";

/// Repository for equipment database operations.
#[derive(Clone)]
pub struct EquipmentRepository {
    pool: PgPool,
}

impl EquipmentRepository {
    /// Creates a new EquipmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an equipment entry.
    pub async fn create(
        &self,
        request: &CreateEquipmentRequest,
    ) -> Result<EquipmentEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_equipment");
        let result = sqlx::query_as::<_, EquipmentEntity>(&format!(
            r#"
            INSERT INTO equipment (name, specification, description, additional_info, image_url, in_charge)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(&request.name)
        .bind(request.specification.as_deref())
        .bind(&request.description)
        .bind(request.additional_info.as_deref())
        .bind(&request.image_url)
        .bind(&request.in_charge)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an equipment entry by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EquipmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_equipment_by_id");
        let result = sqlx::query_as::<_, EquipmentEntity>(&format!(
            "SELECT {SELECT_COLUMNS} FROM equipment WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all equipment, alphabetical by name.
    pub async fn list(&self) -> Result<Vec<EquipmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_equipment");
        let result = sqlx::query_as::<_, EquipmentEntity>(&format!(
            "SELECT {SELECT_COLUMNS} FROM equipment ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update. Returns None if the entry does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        update: &UpdateEquipmentRequest,
    ) -> Result<Option<EquipmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_equipment");
        let result = sqlx::query_as::<_, EquipmentEntity>(&format!(
            r#"
            UPDATE equipment SET
                name = COALESCE($2, name),
                specification = COALESCE($3, specification),
                description = COALESCE($4, description),
                additional_info = COALESCE($5, additional_info),
                image_url = COALESCE($6, image_url),
                in_charge = COALESCE($7, in_charge),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.specification.as_deref())
        .bind(update.description.as_deref())
        .bind(update.additional_info.as_deref())
        .bind(update.image_url.as_deref())
        .bind(update.in_charge.as_deref())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an equipment entry.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_equipment");
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Total number of equipment entries.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_equipment");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM equipment")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }
}
