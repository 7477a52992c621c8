//! Equipment entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the equipment table.
#[derive(Debug, Clone, FromRow)]
pub struct EquipmentEntity {
    pub id: Uuid,
    pub name: String,
    pub specification: Option<String>,
    pub description: String,
    pub additional_info: Option<String>,
    pub image_url: String,
    pub in_charge: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
