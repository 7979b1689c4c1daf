//! Aggregate queries backing the reports endpoint.

use sqlx::PgPool;
use woundcare_core::types::Date;
use woundcare_core::wound::STATUS_HEALED;

use crate::models::report::{ReportSummary, TypeCount};
use crate::models::wound::StatusCount;

/// Read-only reporting queries.
pub struct ReportRepo;

impl ReportRepo {
    /// Build the clinic-wide summary relative to `today`.
    pub async fn summary(pool: &PgPool, today: Date) -> Result<ReportSummary, sqlx::Error> {
        let (active_patients,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM patients WHERE deleted_at IS NULL")
                .fetch_one(pool)
                .await?;

        let wounds_by_status = sqlx::query_as::<_, StatusCount>(
            "SELECT w.status AS status, COUNT(*) AS count
             FROM wounds w JOIN patients p ON p.id = w.patient_id
             WHERE p.deleted_at IS NULL
             GROUP BY w.status ORDER BY w.status ASC",
        )
        .fetch_all(pool)
        .await?;

        let wounds_by_type = sqlx::query_as::<_, TypeCount>(
            "SELECT w.wound_type AS wound_type, COUNT(*) AS count
             FROM wounds w JOIN patients p ON p.id = w.patient_id
             WHERE p.deleted_at IS NULL
             GROUP BY w.wound_type ORDER BY count DESC, w.wound_type ASC",
        )
        .fetch_all(pool)
        .await?;

        let total_wounds = wounds_by_status.iter().map(|s| s.count).sum();

        let (treatments_last_30_days,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*)
             FROM treatments t JOIN patients p ON p.id = t.patient_id
             WHERE p.deleted_at IS NULL
               AND t.performed_at >= NOW() - INTERVAL '30 days'",
        )
        .fetch_one(pool)
        .await?;

        // Latest treatment per open wound of a live patient decides when the
        // next change is due.
        let (changes_due_next_7_days, overdue_changes): (i64, i64) = sqlx::query_as(
            "SELECT
                COUNT(*) FILTER (WHERE t.next_change_date BETWEEN $1 AND $1 + 7),
                COUNT(*) FILTER (WHERE t.next_change_date < $1)
             FROM (
                 SELECT DISTINCT ON (wound_id) wound_id, next_change_date
                 FROM treatments
                 ORDER BY wound_id, performed_at DESC, id DESC
             ) t
             JOIN wounds w ON w.id = t.wound_id
             JOIN patients p ON p.id = w.patient_id
             WHERE w.status <> $2
               AND p.deleted_at IS NULL",
        )
        .bind(today)
        .bind(STATUS_HEALED)
        .fetch_one(pool)
        .await?;

        let (images_stored,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*)
             FROM wound_images i
             JOIN wounds w ON w.id = i.wound_id
             JOIN patients p ON p.id = w.patient_id
             WHERE p.deleted_at IS NULL",
        )
        .fetch_one(pool)
        .await?;

        Ok(ReportSummary {
            active_patients,
            total_wounds,
            wounds_by_status,
            wounds_by_type,
            treatments_last_30_days,
            changes_due_next_7_days,
            overdue_changes,
            images_stored,
        })
    }
}
