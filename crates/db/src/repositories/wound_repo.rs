//! Repository for the `wounds` table.

use sqlx::PgPool;
use woundcare_core::types::DbId;
use woundcare_core::wound::DEFAULT_STATUS;

use super::like_pattern;
use crate::models::wound::{
    CreateWound, StatusCount, UpdateWound, Wound, WoundDeletion, WoundFilter, WoundListItem,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, patient_id, location, wound_type, stage, onset_date, length_cm, \
                       width_cm, depth_cm, area_cm2, exudate_amount, tissue_type, wound_edges, \
                       pain_level, odor, signs_of_infection, status, notes, assessed_at, \
                       created_by, created_at, updated_at";

/// [`COLUMNS`] qualified with the `w` alias, for joined queries.
const W_COLUMNS: &str = "w.id, w.patient_id, w.location, w.wound_type, w.stage, w.onset_date, \
                         w.length_cm, w.width_cm, w.depth_cm, w.area_cm2, w.exudate_amount, \
                         w.tissue_type, w.wound_edges, w.pain_level, w.odor, \
                         w.signs_of_infection, w.status, w.notes, w.assessed_at, w.created_by, \
                         w.created_at, w.updated_at";

/// Shared join + `WHERE` clause. Binds: `$1` patient, `$2` status,
/// `$3` wound type, `$4` search pattern.
const FILTERED_FROM: &str = "wounds w
    JOIN patients p ON p.id = w.patient_id
    WHERE p.deleted_at IS NULL
      AND ($1::BIGINT IS NULL OR w.patient_id = $1)
      AND ($2::TEXT IS NULL OR w.status = $2)
      AND ($3::TEXT IS NULL OR w.wound_type = $3)
      AND ($4::TEXT IS NULL
           OR w.location ILIKE $4 OR w.notes ILIKE $4 OR p.name ILIKE $4)";

/// Provides CRUD operations for wounds.
pub struct WoundRepo;

impl WoundRepo {
    /// Insert a new wound, returning the created row.
    ///
    /// `area_cm2` is the already-resolved area (explicit or derived).
    pub async fn create(
        pool: &PgPool,
        input: &CreateWound,
        area_cm2: Option<f64>,
        created_by: DbId,
    ) -> Result<Wound, sqlx::Error> {
        let query = format!(
            "INSERT INTO wounds (patient_id, location, wound_type, stage, onset_date, length_cm,
                                 width_cm, depth_cm, area_cm2, exudate_amount, tissue_type,
                                 wound_edges, pain_level, odor, signs_of_infection, status, notes,
                                 assessed_at, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                     COALESCE($14, false), COALESCE($15, false), COALESCE($16, $17), $18,
                     COALESCE($19, NOW()), $20)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wound>(&query)
            .bind(input.patient_id)
            .bind(input.location.trim())
            .bind(&input.wound_type)
            .bind(&input.stage)
            .bind(input.onset_date)
            .bind(input.length_cm)
            .bind(input.width_cm)
            .bind(input.depth_cm)
            .bind(area_cm2)
            .bind(&input.exudate_amount)
            .bind(&input.tissue_type)
            .bind(&input.wound_edges)
            .bind(input.pain_level)
            .bind(input.odor)
            .bind(input.signs_of_infection)
            .bind(&input.status)
            .bind(DEFAULT_STATUS)
            .bind(&input.notes)
            .bind(input.assessed_at)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a wound by its internal ID. Wounds of soft-deleted patients are
    /// treated as absent.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Wound>, sqlx::Error> {
        let query = format!(
            "SELECT {W_COLUMNS} FROM wounds w
             JOIN patients p ON p.id = w.patient_id
             WHERE w.id = $1 AND p.deleted_at IS NULL"
        );
        sqlx::query_as::<_, Wound>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of wounds matching `filter`, most recently assessed first.
    pub async fn list(
        pool: &PgPool,
        filter: &WoundFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WoundListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {W_COLUMNS}, p.name AS patient_name FROM {FILTERED_FROM}
             ORDER BY w.assessed_at DESC, w.id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, WoundListItem>(&query)
            .bind(filter.patient_id)
            .bind(&filter.status)
            .bind(&filter.wound_type)
            .bind(like_pattern(filter.search.as_deref()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count all wounds matching `filter`.
    pub async fn count(pool: &PgPool, filter: &WoundFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {FILTERED_FROM}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(filter.patient_id)
            .bind(&filter.status)
            .bind(&filter.wound_type)
            .bind(like_pattern(filter.search.as_deref()))
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Count-by-status breakdown under every filter except `status` itself,
    /// so a client filtering on one status still sees the other buckets.
    pub async fn status_counts(
        pool: &PgPool,
        filter: &WoundFilter,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        let query = format!(
            "SELECT w.status AS status, COUNT(*) AS count FROM {FILTERED_FROM}
             GROUP BY w.status
             ORDER BY w.status ASC"
        );
        sqlx::query_as::<_, StatusCount>(&query)
            .bind(filter.patient_id)
            .bind(None::<String>)
            .bind(&filter.wound_type)
            .bind(like_pattern(filter.search.as_deref()))
            .fetch_all(pool)
            .await
    }

    /// Update a wound. Only non-`None` fields in `input` are applied; the
    /// stored area is replaced by `area_cm2` when it is `Some`.
    ///
    /// Returns `None` if no row with the given `id` exists or its patient is
    /// soft-deleted.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWound,
        area_cm2: Option<f64>,
    ) -> Result<Option<Wound>, sqlx::Error> {
        let query = format!(
            "UPDATE wounds SET
                location = COALESCE($2, location),
                wound_type = COALESCE($3, wound_type),
                stage = COALESCE($4, stage),
                onset_date = COALESCE($5, onset_date),
                length_cm = COALESCE($6, length_cm),
                width_cm = COALESCE($7, width_cm),
                depth_cm = COALESCE($8, depth_cm),
                area_cm2 = COALESCE($9, area_cm2),
                exudate_amount = COALESCE($10, exudate_amount),
                tissue_type = COALESCE($11, tissue_type),
                wound_edges = COALESCE($12, wound_edges),
                pain_level = COALESCE($13, pain_level),
                odor = COALESCE($14, odor),
                signs_of_infection = COALESCE($15, signs_of_infection),
                status = COALESCE($16, status),
                notes = COALESCE($17, notes),
                assessed_at = COALESCE($18, assessed_at)
             WHERE id = $1
               AND EXISTS (SELECT 1 FROM patients p
                           WHERE p.id = wounds.patient_id AND p.deleted_at IS NULL)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wound>(&query)
            .bind(id)
            .bind(input.location.as_deref().map(str::trim))
            .bind(&input.wound_type)
            .bind(&input.stage)
            .bind(input.onset_date)
            .bind(input.length_cm)
            .bind(input.width_cm)
            .bind(input.depth_cm)
            .bind(area_cm2)
            .bind(&input.exudate_amount)
            .bind(&input.tissue_type)
            .bind(&input.wound_edges)
            .bind(input.pain_level)
            .bind(input.odor)
            .bind(input.signs_of_infection)
            .bind(&input.status)
            .bind(&input.notes)
            .bind(input.assessed_at)
            .fetch_optional(pool)
            .await
    }

    /// Return `(treatments, images)` referencing a wound.
    pub async fn dependent_counts(pool: &PgPool, id: DbId) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM treatments WHERE wound_id = $1),
                (SELECT COUNT(*) FROM wound_images WHERE wound_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Hard-delete a wound unless treatments or images still reference it.
    ///
    /// The existence check, dependent count and delete run in one
    /// transaction with the wound row locked.
    pub async fn delete_if_unreferenced(
        pool: &PgPool,
        id: DbId,
    ) -> Result<WoundDeletion, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> = sqlx::query_as(
            "SELECT w.id FROM wounds w
             JOIN patients p ON p.id = w.patient_id
             WHERE w.id = $1 AND p.deleted_at IS NULL
             FOR UPDATE OF w",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        if locked.is_none() {
            return Ok(WoundDeletion::NotFound);
        }

        let (treatments, images): (i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM treatments WHERE wound_id = $1),
                (SELECT COUNT(*) FROM wound_images WHERE wound_id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if treatments > 0 || images > 0 {
            tracing::debug!(wound_id = id, treatments, images, "Wound delete blocked by dependents");
            return Ok(WoundDeletion::Blocked { treatments, images });
        }

        sqlx::query("DELETE FROM wounds WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(WoundDeletion::Deleted)
    }
}
