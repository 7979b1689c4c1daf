//! Repository for the `treatments` table.

use sqlx::PgPool;
use woundcare_core::types::{Date, DbId};
use woundcare_core::wound::STATUS_HEALED;

use crate::models::treatment::{
    NewTreatment, ScheduledChange, Treatment, TreatmentFilter, UpdateTreatment,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, wound_id, patient_id, user_id, performed_at, cleaning_solution, \
                       debridement, primary_dressing, secondary_dressing, topical_agent, \
                       change_frequency_days, next_change_date, observations, created_at, \
                       updated_at";

/// Shared `WHERE` clause. Binds: `$1` wound, `$2` patient, `$3` user,
/// `$4` due-before date.
const FILTER: &str = "($1::BIGINT IS NULL OR wound_id = $1)
    AND ($2::BIGINT IS NULL OR patient_id = $2)
    AND ($3::BIGINT IS NULL OR user_id = $3)
    AND ($4::DATE IS NULL OR next_change_date <= $4)";

/// Provides CRUD operations for treatments.
pub struct TreatmentRepo;

impl TreatmentRepo {
    /// Insert a fully resolved treatment, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewTreatment) -> Result<Treatment, sqlx::Error> {
        let query = format!(
            "INSERT INTO treatments (wound_id, patient_id, user_id, performed_at,
                                     cleaning_solution, debridement, primary_dressing,
                                     secondary_dressing, topical_agent, change_frequency_days,
                                     next_change_date, observations)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Treatment>(&query)
            .bind(input.wound_id)
            .bind(input.patient_id)
            .bind(input.user_id)
            .bind(input.performed_at)
            .bind(&input.cleaning_solution)
            .bind(&input.debridement)
            .bind(&input.primary_dressing)
            .bind(&input.secondary_dressing)
            .bind(&input.topical_agent)
            .bind(input.change_frequency_days)
            .bind(input.next_change_date)
            .bind(&input.observations)
            .fetch_one(pool)
            .await
    }

    /// Find a treatment by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Treatment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM treatments WHERE id = $1");
        sqlx::query_as::<_, Treatment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of treatments matching `filter`, most recent first.
    pub async fn list(
        pool: &PgPool,
        filter: &TreatmentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Treatment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM treatments WHERE {FILTER}
             ORDER BY performed_at DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Treatment>(&query)
            .bind(filter.wound_id)
            .bind(filter.patient_id)
            .bind(filter.user_id)
            .bind(filter.due_before)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count all treatments matching `filter`.
    pub async fn count(pool: &PgPool, filter: &TreatmentFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM treatments WHERE {FILTER}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(filter.wound_id)
            .bind(filter.patient_id)
            .bind(filter.user_id)
            .bind(filter.due_before)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Update a treatment. Only non-`None` fields in `input` are applied;
    /// `next_change_date` is the resolved value (explicit or derived).
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTreatment,
        next_change_date: Option<Date>,
    ) -> Result<Option<Treatment>, sqlx::Error> {
        let query = format!(
            "UPDATE treatments SET
                performed_at = COALESCE($2, performed_at),
                cleaning_solution = COALESCE($3, cleaning_solution),
                debridement = COALESCE($4, debridement),
                primary_dressing = COALESCE($5, primary_dressing),
                secondary_dressing = COALESCE($6, secondary_dressing),
                topical_agent = COALESCE($7, topical_agent),
                change_frequency_days = COALESCE($8, change_frequency_days),
                next_change_date = COALESCE($9, next_change_date),
                observations = COALESCE($10, observations)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Treatment>(&query)
            .bind(id)
            .bind(input.performed_at)
            .bind(&input.cleaning_solution)
            .bind(&input.debridement)
            .bind(&input.primary_dressing)
            .bind(&input.secondary_dressing)
            .bind(&input.topical_agent)
            .bind(input.change_frequency_days)
            .bind(next_change_date)
            .bind(&input.observations)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a treatment by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM treatments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Upcoming dressing changes between `from` and `to` (inclusive).
    ///
    /// Only the most recent treatment of each wound counts, and healed
    /// wounds or soft-deleted patients are left out. Earliest change first.
    pub async fn scheduled_changes(
        pool: &PgPool,
        from: Date,
        to: Date,
    ) -> Result<Vec<ScheduledChange>, sqlx::Error> {
        sqlx::query_as::<_, ScheduledChange>(
            "SELECT t.id AS treatment_id, t.wound_id, t.patient_id,
                    p.name AS patient_name, w.location AS wound_location,
                    w.status AS wound_status, t.performed_at AS last_performed_at,
                    t.next_change_date
             FROM (
                 SELECT DISTINCT ON (wound_id) id, wound_id, patient_id, performed_at,
                        next_change_date
                 FROM treatments
                 ORDER BY wound_id, performed_at DESC, id DESC
             ) t
             JOIN wounds w ON w.id = t.wound_id
             JOIN patients p ON p.id = t.patient_id
             WHERE t.next_change_date IS NOT NULL
               AND t.next_change_date BETWEEN $1 AND $2
               AND w.status <> $3
               AND p.deleted_at IS NULL
             ORDER BY t.next_change_date ASC, p.name ASC",
        )
        .bind(from)
        .bind(to)
        .bind(STATUS_HEALED)
        .fetch_all(pool)
        .await
    }
}
