//! Treatment (dressing change / procedure) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use woundcare_core::types::{Date, DbId, Timestamp};

/// A treatment row from the `treatments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Treatment {
    pub id: DbId,
    pub wound_id: DbId,
    pub patient_id: DbId,
    /// Professional who performed the treatment.
    pub user_id: DbId,
    pub performed_at: Timestamp,
    pub cleaning_solution: Option<String>,
    pub debridement: Option<String>,
    pub primary_dressing: Option<String>,
    pub secondary_dressing: Option<String>,
    pub topical_agent: Option<String>,
    pub change_frequency_days: Option<i32>,
    pub next_change_date: Option<Date>,
    pub observations: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Upcoming dressing change, as listed by the schedule endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduledChange {
    pub treatment_id: DbId,
    pub wound_id: DbId,
    pub patient_id: DbId,
    pub patient_name: String,
    pub wound_location: String,
    pub wound_status: String,
    pub last_performed_at: Timestamp,
    pub next_change_date: Date,
}

/// Request body for creating a treatment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTreatment {
    pub wound_id: DbId,
    /// Defaults to the wound's patient; must match it when supplied.
    pub patient_id: Option<DbId>,
    /// Defaults to now.
    pub performed_at: Option<Timestamp>,
    #[validate(length(max = 200))]
    pub cleaning_solution: Option<String>,
    #[validate(length(max = 200))]
    pub debridement: Option<String>,
    #[validate(length(max = 200))]
    pub primary_dressing: Option<String>,
    #[validate(length(max = 200))]
    pub secondary_dressing: Option<String>,
    #[validate(length(max = 200))]
    pub topical_agent: Option<String>,
    #[validate(range(min = 1, max = 90, message = "Change frequency must be between 1 and 90 days"))]
    pub change_frequency_days: Option<i32>,
    /// Derived from `performed_at + change_frequency_days` when omitted.
    pub next_change_date: Option<Date>,
    pub observations: Option<String>,
}

/// Fully resolved insert for the `treatments` table.
#[derive(Debug, Clone)]
pub struct NewTreatment {
    pub wound_id: DbId,
    pub patient_id: DbId,
    pub user_id: DbId,
    pub performed_at: Timestamp,
    pub cleaning_solution: Option<String>,
    pub debridement: Option<String>,
    pub primary_dressing: Option<String>,
    pub secondary_dressing: Option<String>,
    pub topical_agent: Option<String>,
    pub change_frequency_days: Option<i32>,
    pub next_change_date: Option<Date>,
    pub observations: Option<String>,
}

/// DTO for updating an existing treatment. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTreatment {
    pub performed_at: Option<Timestamp>,
    #[validate(length(max = 200))]
    pub cleaning_solution: Option<String>,
    #[validate(length(max = 200))]
    pub debridement: Option<String>,
    #[validate(length(max = 200))]
    pub primary_dressing: Option<String>,
    #[validate(length(max = 200))]
    pub secondary_dressing: Option<String>,
    #[validate(length(max = 200))]
    pub topical_agent: Option<String>,
    #[validate(range(min = 1, max = 90, message = "Change frequency must be between 1 and 90 days"))]
    pub change_frequency_days: Option<i32>,
    pub next_change_date: Option<Date>,
    pub observations: Option<String>,
}

/// Filters accepted by [`crate::repositories::TreatmentRepo::list`].
#[derive(Debug, Clone, Default)]
pub struct TreatmentFilter {
    pub wound_id: Option<DbId>,
    pub patient_id: Option<DbId>,
    pub user_id: Option<DbId>,
    /// Only treatments whose next change is on or before this date.
    pub due_before: Option<Date>,
}
