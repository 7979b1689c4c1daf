//! Repository for the `patients` table.
//!
//! Patients are soft-deleted: every read filters on `deleted_at IS NULL`
//! except [`PatientRepo::find_by_cpf`], which must see deleted rows because
//! the CPF unique constraint still covers them.

use sqlx::PgPool;
use woundcare_core::patient::normalize_cpf;
use woundcare_core::types::DbId;
use woundcare_core::wound::STATUS_HEALED;

use super::like_pattern;
use crate::models::patient::{CreatePatient, Patient, PatientFilter, UpdatePatient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, cpf, name, birth_date, gender, phone, email, address, city, state, \
                       zip_code, comorbidities, allergies, medications, notes, \
                       responsible_user_id, created_at, updated_at";

/// Shared `WHERE` clause for list and count. Binds: `$1` text pattern,
/// `$2` CPF digit pattern, `$3` responsible user.
const FILTER: &str = "deleted_at IS NULL
    AND ($1::TEXT IS NULL
         OR name ILIKE $1 OR email ILIKE $1 OR phone ILIKE $1
         OR ($2::TEXT IS NOT NULL AND cpf LIKE $2))
    AND ($3::BIGINT IS NULL OR responsible_user_id = $3)";

/// Search patterns for a patient filter: free text, and the digits-only
/// form for matching formatted CPFs against stored ones.
fn search_patterns(filter: &PatientFilter) -> (Option<String>, Option<String>) {
    let text = like_pattern(filter.search.as_deref());
    let digits = filter
        .search
        .as_deref()
        .map(normalize_cpf)
        .and_then(|d| like_pattern(Some(&d)));
    (text, digits)
}

/// Provides CRUD operations for patients.
pub struct PatientRepo;

impl PatientRepo {
    /// Insert a new patient, returning the created row.
    ///
    /// The CPF is stored in normalised (digits-only) form and the state code
    /// uppercased.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePatient,
        responsible_user_id: DbId,
    ) -> Result<Patient, sqlx::Error> {
        let query = format!(
            "INSERT INTO patients (cpf, name, birth_date, gender, phone, email, address, city,
                                   state, zip_code, comorbidities, allergies, medications, notes,
                                   responsible_user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, UPPER($9), $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Patient>(&query)
            .bind(normalize_cpf(&input.cpf))
            .bind(input.name.trim())
            .bind(input.birth_date)
            .bind(&input.gender)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(&input.comorbidities)
            .bind(&input.allergies)
            .bind(&input.medications)
            .bind(&input.notes)
            .bind(responsible_user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a patient by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Patient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM patients WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Patient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a patient by CPF (any punctuation ignored), including
    /// soft-deleted rows.
    pub async fn find_by_cpf(pool: &PgPool, cpf: &str) -> Result<Option<Patient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM patients WHERE cpf = $1");
        sqlx::query_as::<_, Patient>(&query)
            .bind(normalize_cpf(cpf))
            .fetch_optional(pool)
            .await
    }

    /// List one page of patients matching `filter`, ordered by name.
    pub async fn list(
        pool: &PgPool,
        filter: &PatientFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Patient>, sqlx::Error> {
        let (text, digits) = search_patterns(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM patients WHERE {FILTER}
             ORDER BY name ASC, id ASC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Patient>(&query)
            .bind(text)
            .bind(digits)
            .bind(filter.responsible_user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count all patients matching `filter`.
    pub async fn count(pool: &PgPool, filter: &PatientFilter) -> Result<i64, sqlx::Error> {
        let (text, digits) = search_patterns(filter);
        let query = format!("SELECT COUNT(*) FROM patients WHERE {FILTER}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(text)
            .bind(digits)
            .bind(filter.responsible_user_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Update a patient. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePatient,
    ) -> Result<Option<Patient>, sqlx::Error> {
        let query = format!(
            "UPDATE patients SET
                cpf = COALESCE($2, cpf),
                name = COALESCE($3, name),
                birth_date = COALESCE($4, birth_date),
                gender = COALESCE($5, gender),
                phone = COALESCE($6, phone),
                email = COALESCE($7, email),
                address = COALESCE($8, address),
                city = COALESCE($9, city),
                state = COALESCE(UPPER($10), state),
                zip_code = COALESCE($11, zip_code),
                comorbidities = COALESCE($12, comorbidities),
                allergies = COALESCE($13, allergies),
                medications = COALESCE($14, medications),
                notes = COALESCE($15, notes),
                responsible_user_id = COALESCE($16, responsible_user_id)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Patient>(&query)
            .bind(id)
            .bind(input.cpf.as_deref().map(normalize_cpf))
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.birth_date)
            .bind(&input.gender)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(&input.comorbidities)
            .bind(&input.allergies)
            .bind(&input.medications)
            .bind(&input.notes)
            .bind(input.responsible_user_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a patient by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE patients SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Return `(total_wounds, open_wounds)` for a patient. A wound is open
    /// until its status is `healed`.
    pub async fn wound_counts(pool: &PgPool, id: DbId) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status <> $2)
             FROM wounds WHERE patient_id = $1",
        )
        .bind(id)
        .bind(STATUS_HEALED)
        .fetch_one(pool)
        .await
    }
}
