//! Material entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::MaterialForm;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for material physical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "material_form", rename_all = "lowercase")]
pub enum MaterialFormDb {
    Sheet,
    Rod,
    Unit,
}

impl From<MaterialFormDb> for MaterialForm {
    fn from(form: MaterialFormDb) -> Self {
        match form {
            MaterialFormDb::Sheet => MaterialForm::Sheet,
            MaterialFormDb::Rod => MaterialForm::Rod,
            MaterialFormDb::Unit => MaterialForm::Unit,
        }
    }
}

impl From<MaterialForm> for MaterialFormDb {
    fn from(form: MaterialForm) -> Self {
        match form {
            MaterialForm::Sheet => MaterialFormDb::Sheet,
            MaterialForm::Rod => MaterialFormDb::Rod,
            MaterialForm::Unit => MaterialFormDb::Unit,
        }
    }
}

/// Database row mapping for the materials table.
#[derive(Debug, Clone, FromRow)]
pub struct MaterialEntity {
    pub id: Uuid,
    pub name: String,
    pub dimension: String,
    pub description: String,
    pub image_url: String,
    pub density: f64,
    pub embodied_energy: f64,
    pub carbon_footprint_factor: f64,
    pub fixed_dimension: f64,
    pub form_type: MaterialFormDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
