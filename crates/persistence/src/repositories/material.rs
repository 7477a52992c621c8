//! Material repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{MaterialEntity, MaterialFormDb};
use crate::metrics::QueryTimer;
use domain::models::{CreateMaterialRequest, UpdateMaterialRequest};

const SELECT_COLUMNS: &str = "id, name, dimension, description, image_url, density, \
     embodied_energy, carbon_footprint_factor, fixed_dimension, form_type, created_at, updated_at";

/// Repository for material database operations.
#[derive(Clone)]
pub struct MaterialRepository {
    pool: PgPool,
}

impl MaterialRepository {
    /// Creates a new MaterialRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a material entry.
    pub async fn create(
        &self,
        request: &CreateMaterialRequest,
    ) -> Result<MaterialEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_material");
        let result = sqlx::query_as::<_, MaterialEntity>(&format!(
            r#"
            INSERT INTO materials
                (name, dimension, description, image_url, density,
                 embodied_energy, carbon_footprint_factor, fixed_dimension, form_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(&request.name)
        .bind(&request.dimension)
        .bind(&request.description)
        .bind(&request.image_url)
        .bind(request.density)
        .bind(request.embodied_energy)
        .bind(request.carbon_footprint_factor)
        .bind(request.fixed_dimension)
        .bind(MaterialFormDb::from(request.form_type))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a material entry by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MaterialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_material_by_id");
        let result = sqlx::query_as::<_, MaterialEntity>(&format!(
            "SELECT {SELECT_COLUMNS} FROM materials WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all materials, alphabetical by name.
    pub async fn list(&self) -> Result<Vec<MaterialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_materials");
        let result = sqlx::query_as::<_, MaterialEntity>(&format!(
            "SELECT {SELECT_COLUMNS} FROM materials ORDER BY name"
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
        update: &UpdateMaterialRequest,
    ) -> Result<Option<MaterialEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_material");
        let result = sqlx::query_as::<_, MaterialEntity>(&format!(
            r#"
            UPDATE materials SET
                name = COALESCE($2, name),
                dimension = COALESCE($3, dimension),
                description = COALESCE($4, description),
                image_url = COALESCE($5, image_url),
                density = COALESCE($6, density),
                embodied_energy = COALESCE($7, embodied_energy),
                carbon_footprint_factor = COALESCE($8, carbon_footprint_factor),
                fixed_dimension = COALESCE($9, fixed_dimension),
                form_type = COALESCE($10, form_type),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.dimension.as_deref())
        .bind(update.description.as_deref())
        .bind(update.image_url.as_deref())
        .bind(update.density)
        .bind(update.embodied_energy)
        .bind(update.carbon_footprint_factor)
        .bind(update.fixed_dimension)
        .bind(update.form_type.map(MaterialFormDb::from))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a material entry.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_material");
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Total number of material entries.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_materials");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM materials")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }
}
