//! BOM request entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::BomStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for the coarse BOM request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "bom_status", rename_all = "lowercase")]
pub enum BomStatusDb {
    Pending,
    Approved,
    Rejected,
}

impl From<BomStatusDb> for BomStatus {
    fn from(status: BomStatusDb) -> Self {
        match status {
            BomStatusDb::Pending => BomStatus::Pending,
            BomStatusDb::Approved => BomStatus::Approved,
            BomStatusDb::Rejected => BomStatus::Rejected,
        }
    }
}

impl From<BomStatus> for BomStatusDb {
    fn from(status: BomStatus) -> Self {
        match status {
            BomStatus::Pending => BomStatusDb::Pending,
            BomStatus::Approved => BomStatusDb::Approved,
            BomStatus::Rejected => BomStatusDb::Rejected,
        }
    }
}

/// Database row mapping for the bom_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct BomRequestEntity {
    pub id: Uuid,
    pub student_id: Uuid,
    pub guide_id: Uuid,
    pub team_id: Option<Uuid>,
    pub sl_no: String,
    pub sprint_no: String,
    pub date: NaiveDate,
    pub part_name: String,
    pub consumable_name: String,
    pub specification: String,
    pub qty: i32,
    pub length: f64,
    pub width: f64,
    pub weight: f64,
    pub guide_approved: bool,
    pub guide_approved_at: Option<DateTime<Utc>>,
    pub lab_approved: bool,
    pub lab_approved_by: Option<Uuid>,
    pub lab_approved_at: Option<DateTime<Utc>>,
    pub status: BomStatusDb,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// BOM request joined with the requesting student for listings.
#[derive(Debug, Clone, FromRow)]
pub struct BomRequestWithStudentEntity {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub guide_id: Uuid,
    pub team_id: Option<Uuid>,
    pub sl_no: String,
    pub sprint_no: String,
    pub date: NaiveDate,
    pub part_name: String,
    pub consumable_name: String,
    pub specification: String,
    pub qty: i32,
    pub length: f64,
    pub width: f64,
    pub weight: f64,
    pub guide_approved: bool,
    pub guide_approved_at: Option<DateTime<Utc>>,
    pub lab_approved: bool,
    pub lab_approved_by: Option<Uuid>,
    pub lab_approved_at: Option<DateTime<Utc>>,
    pub status: BomStatusDb,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_status_db_roundtrip() {
        for status in [BomStatus::Pending, BomStatus::Approved, BomStatus::Rejected] {
            let db: BomStatusDb = status.into();
            assert_eq!(BomStatus::from(db), status);
        }
    }
}
