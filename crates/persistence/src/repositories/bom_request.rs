//! BOM request repository for database operations.
//!
//! Terminal rejection is enforced at the storage level: every approval or
//! rejection UPDATE carries `AND status <> 'rejected'`, so a racing reject
//! can never be overwritten by a late approve.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{BomRequestEntity, BomRequestWithStudentEntity, BomStatusDb};
use crate::metrics::QueryTimer;
use domain::models::{CreateBomRequest, UpdateBomRequest};

const SELECT_COLUMNS: &str = "id, student_id, guide_id, team_id, sl_no, sprint_no, date, \
     part_name, consumable_name, specification, qty, length, width, weight, \
     guide_approved, guide_approved_at, lab_approved, lab_approved_by, lab_approved_at, \
     status, rejection_reason, created_at, updated_at";

const SELECT_WITH_STUDENT: &str = "b.id, b.student_id, u.name AS student_name, u.email AS student_email, \
     b.guide_id, b.team_id, b.sl_no, b.sprint_no, b.date, \
     b.part_name, b.consumable_name, b.specification, b.qty, b.length, b.width, b.weight, \
     b.guide_approved, b.guide_approved_at, b.lab_approved, b.lab_approved_by, b.lab_approved_at, \
     b.status, b.rejection_reason, b.created_at, b.updated_at";

/// Which population of requests a listing targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomScope {
    /// Requests created by a student.
    Student(Uuid),
    /// Requests supervised by a faculty guide.
    Guide(Uuid),
    /// All requests, as seen by any lab in-charge.
    Lab,
}

/// Repository for BOM request database operations.
#[derive(Clone)]
pub struct BomRequestRepository {
    pool: PgPool,
}

impl BomRequestRepository {
    /// Creates a new BomRequestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new BOM request for a student in pending state.
    pub async fn create(
        &self,
        student_id: Uuid,
        guide_id: Uuid,
        team_id: Option<Uuid>,
        request: &CreateBomRequest,
    ) -> Result<BomRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_bom_request");
        let result = sqlx::query_as::<_, BomRequestEntity>(&format!(
            r#"
            INSERT INTO bom_requests
                (student_id, guide_id, team_id, sl_no, sprint_no, date,
                 part_name, consumable_name, specification, qty, length, width, weight)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(student_id)
        .bind(guide_id)
        .bind(team_id)
        .bind(&request.sl_no)
        .bind(&request.sprint_no)
        .bind(request.date)
        .bind(&request.part_name)
        .bind(&request.consumable_name)
        .bind(&request.specification)
        .bind(request.qty)
        .bind(request.length)
        .bind(request.width)
        .bind(request.weight)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a BOM request by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BomRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_bom_request_by_id");
        let result = sqlx::query_as::<_, BomRequestEntity>(&format!(
            "SELECT {SELECT_COLUMNS} FROM bom_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List BOM requests for a scope, newest first.
    pub async fn list(
        &self,
        scope: BomScope,
        status_filter: Option<BomStatusDb>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BomRequestWithStudentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_bom_requests");
        let (scope_clause, scope_id) = match scope {
            BomScope::Student(id) => ("b.student_id = $1", Some(id)),
            BomScope::Guide(id) => ("b.guide_id = $1", Some(id)),
            BomScope::Lab => ("TRUE", None),
        };

        // Four query shapes; sqlx has no dynamic bind list for query_as.
        let result = match (scope_id, status_filter) {
            (Some(id), Some(status)) => {
                sqlx::query_as::<_, BomRequestWithStudentEntity>(&format!(
                    r#"
                    SELECT {SELECT_WITH_STUDENT}
                    FROM bom_requests b
                    JOIN users u ON b.student_id = u.id
                    WHERE {scope_clause} AND b.status = $2
                    ORDER BY b.created_at DESC
                    LIMIT $3 OFFSET $4
                    "#,
                ))
                .bind(id)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            (Some(id), None) => {
                sqlx::query_as::<_, BomRequestWithStudentEntity>(&format!(
                    r#"
                    SELECT {SELECT_WITH_STUDENT}
                    FROM bom_requests b
                    JOIN users u ON b.student_id = u.id
                    WHERE {scope_clause}
                    ORDER BY b.created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                ))
                .bind(id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            (None, Some(status)) => {
                sqlx::query_as::<_, BomRequestWithStudentEntity>(&format!(
                    r#"
                    SELECT {SELECT_WITH_STUDENT}
                    FROM bom_requests b
                    JOIN users u ON b.student_id = u.id
                    WHERE b.status = $1
                    ORDER BY b.created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                ))
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            (None, None) => {
                sqlx::query_as::<_, BomRequestWithStudentEntity>(&format!(
                    r#"
                    SELECT {SELECT_WITH_STUDENT}
                    FROM bom_requests b
                    JOIN users u ON b.student_id = u.id
                    ORDER BY b.created_at DESC
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

    /// Count BOM requests for a scope.
    pub async fn count(
        &self,
        scope: BomScope,
        status_filter: Option<BomStatusDb>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_bom_requests");
        let (scope_clause, scope_id) = match scope {
            BomScope::Student(id) => ("student_id = $1", Some(id)),
            BomScope::Guide(id) => ("guide_id = $1", Some(id)),
            BomScope::Lab => ("TRUE", None),
        };

        let result = match (scope_id, status_filter) {
            (Some(id), Some(status)) => {
                sqlx::query_scalar::<_, i64>(&format!(
                    "SELECT COUNT(*) FROM bom_requests WHERE {scope_clause} AND status = $2"
                ))
                .bind(id)
                .bind(status)
                .fetch_one(&self.pool)
                .await
            }
            (Some(id), None) => {
                sqlx::query_scalar::<_, i64>(&format!(
                    "SELECT COUNT(*) FROM bom_requests WHERE {scope_clause}"
                ))
                .bind(id)
                .fetch_one(&self.pool)
                .await
            }
            (None, Some(status)) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM bom_requests WHERE status = $1",
                )
                .bind(status)
                .fetch_one(&self.pool)
                .await
            }
            (None, None) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bom_requests")
                    .fetch_one(&self.pool)
                    .await
            }
        };
        timer.record();
        result
    }

    /// Count requests still awaiting guide approval for a specific guide.
    pub async fn pending_count_for_guide(&self, guide_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("pending_count_for_guide");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM bom_requests
            WHERE guide_id = $1 AND guide_approved = FALSE AND status <> 'rejected'
            "#,
        )
        .bind(guide_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count requests still awaiting lab approval across the lab.
    pub async fn pending_count_for_lab(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("pending_count_for_lab");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM bom_requests
            WHERE lab_approved = FALSE AND status <> 'rejected'
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Rows backing the student's export view: guide approved and not rejected.
    pub async fn list_exportable_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<BomRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_exportable_bom_requests");
        let result = sqlx::query_as::<_, BomRequestEntity>(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM bom_requests
            WHERE student_id = $1 AND guide_approved = TRUE AND status <> 'rejected'
            ORDER BY created_at DESC
            "#,
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial field update. Returns the updated row, or None if the
    /// request no longer exists.
    pub async fn update_fields(
        &self,
        id: Uuid,
        update: &UpdateBomRequest,
    ) -> Result<Option<BomRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_bom_request_fields");
        let result = sqlx::query_as::<_, BomRequestEntity>(&format!(
            r#"
            UPDATE bom_requests SET
                sl_no = COALESCE($2, sl_no),
                sprint_no = COALESCE($3, sprint_no),
                date = COALESCE($4, date),
                part_name = COALESCE($5, part_name),
                consumable_name = COALESCE($6, consumable_name),
                specification = COALESCE($7, specification),
                qty = COALESCE($8, qty),
                length = COALESCE($9, length),
                width = COALESCE($10, width),
                weight = COALESCE($11, weight),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(update.sl_no.as_deref())
        .bind(update.sprint_no.as_deref())
        .bind(update.date)
        .bind(update.part_name.as_deref())
        .bind(update.consumable_name.as_deref())
        .bind(update.specification.as_deref())
        .bind(update.qty)
        .bind(update.length)
        .bind(update.width)
        .bind(update.weight)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set the guide approval flag. Idempotent; refuses rejected requests.
    pub async fn guide_approve(&self, id: Uuid) -> Result<Option<BomRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("guide_approve_bom_request");
        let result = sqlx::query_as::<_, BomRequestEntity>(&format!(
            r#"
            UPDATE bom_requests
            SET guide_approved = TRUE,
                guide_approved_at = COALESCE(guide_approved_at, NOW()),
                updated_at = NOW()
            WHERE id = $1 AND status <> 'rejected'
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Reject on the faculty path. Reason is optional. Recorded approval
    /// flags stay as they are; the derived state reads rejected regardless.
    pub async fn guide_reject(
        &self,
        id: Uuid,
        reason: Option<&str>,
    ) -> Result<Option<BomRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("guide_reject_bom_request");
        let result = sqlx::query_as::<_, BomRequestEntity>(&format!(
            r#"
            UPDATE bom_requests
            SET status = 'rejected',
                rejection_reason = COALESCE($2, rejection_reason),
                updated_at = NOW()
            WHERE id = $1 AND status <> 'rejected'
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set the lab approval flag and record the approving in-charge.
    /// Idempotent; refuses rejected requests.
    pub async fn lab_approve(
        &self,
        id: Uuid,
        lab_user_id: Uuid,
    ) -> Result<Option<BomRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lab_approve_bom_request");
        let result = sqlx::query_as::<_, BomRequestEntity>(&format!(
            r#"
            UPDATE bom_requests
            SET lab_approved = TRUE,
                lab_approved_by = $2,
                lab_approved_at = COALESCE(lab_approved_at, NOW()),
                updated_at = NOW()
            WHERE id = $1 AND status <> 'rejected'
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(lab_user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Reject on the lab path. Reason is mandatory (enforced by the API
    /// layer). Recorded approval columns stay as they are for audit; the
    /// rejecting user is carried in the log and the published event.
    pub async fn lab_reject(
        &self,
        id: Uuid,
        reason: &str,
    ) -> Result<Option<BomRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lab_reject_bom_request");
        let result = sqlx::query_as::<_, BomRequestEntity>(&format!(
            r#"
            UPDATE bom_requests
            SET status = 'rejected',
                rejection_reason = $2,
                updated_at = NOW()
            WHERE id = $1 AND status <> 'rejected'
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set the coarse status column directly (faculty PATCH with an explicit
    /// status). Approving this way also sets the guide flag, mirroring the
    /// flag/status redundancy the clients rely on.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: BomStatusDb,
    ) -> Result<Option<BomRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_bom_request_status");
        let result = sqlx::query_as::<_, BomRequestEntity>(&format!(
            r#"
            UPDATE bom_requests
            SET status = $2,
                guide_approved = CASE WHEN $2 = 'approved'::bom_status THEN TRUE ELSE guide_approved END,
                guide_approved_at = CASE WHEN $2 = 'approved'::bom_status
                                         THEN COALESCE(guide_approved_at, NOW())
                                         ELSE guide_approved_at END,
                updated_at = NOW()
            WHERE id = $1 AND status <> 'rejected'
            RETURNING {SELECT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Hard-delete a request (student-initiated, pre-approval only; the
    /// guard lives in the API layer next to the ownership check).
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_bom_request");
        let result = sqlx::query("DELETE FROM bom_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Per-state counts for the admin dashboard.
    pub async fn count_by_state(&self) -> Result<domain::models::BomCounts, sqlx::Error> {
        let timer = QueryTimer::new("count_bom_requests_by_state");
        let rows = sqlx::query_as::<_, (bool, bool, BomStatusDb, i64)>(
            r#"
            SELECT guide_approved, lab_approved, status, COUNT(*)
            FROM bom_requests
            GROUP BY guide_approved, lab_approved, status
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        let mut counts = domain::models::BomCounts::default();
        for (guide, lab, status, n) in rows? {
            if status == BomStatusDb::Rejected {
                counts.rejected += n;
            } else {
                match (guide, lab) {
                    (false, false) => counts.pending += n,
                    (true, false) => counts.guide_approved += n,
                    (false, true) => counts.lab_approved += n,
                    (true, true) => counts.fully_approved += n,
                }
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_clause_shapes() {
        // Structural check on scope variants; query execution needs a live DB.
        let student = BomScope::Student(Uuid::new_v4());
        let lab = BomScope::Lab;
        assert_ne!(student, lab);
    }
}
