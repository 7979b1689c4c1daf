//! Patient entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use woundcare_core::patient::{validate_cpf, validate_gender, validate_state};
use woundcare_core::types::{Date, DbId, Timestamp};
use woundcare_core::validation::validate_not_blank;

/// A patient row from the `patients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Patient {
    pub id: DbId,
    /// Eleven digits, no punctuation.
    pub cpf: String,
    pub name: String,
    pub birth_date: Option<Date>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub comorbidities: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub notes: Option<String>,
    pub responsible_user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Patient plus a summary of their wounds, returned by `GET /patients/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct PatientDetail {
    #[serde(flatten)]
    pub patient: Patient,
    pub wound_count: i64,
    pub open_wound_count: i64,
}

/// DTO for creating a new patient.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePatient {
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: String,
    #[validate(
        length(min = 1, max = 200, message = "Name is required"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    pub birth_date: Option<Date>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[validate(length(max = 120))]
    pub city: Option<String>,
    #[validate(custom(function = "validate_state"))]
    pub state: Option<String>,
    #[validate(length(max = 12))]
    pub zip_code: Option<String>,
    pub comorbidities: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub notes: Option<String>,
    /// Defaults to the authenticated caller when omitted.
    pub responsible_user_id: Option<DbId>,
}

/// DTO for updating an existing patient. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePatient {
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: Option<String>,
    #[validate(
        length(min = 1, max = 200, message = "Name cannot be empty"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    pub birth_date: Option<Date>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[validate(length(max = 120))]
    pub city: Option<String>,
    #[validate(custom(function = "validate_state"))]
    pub state: Option<String>,
    #[validate(length(max = 12))]
    pub zip_code: Option<String>,
    pub comorbidities: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub notes: Option<String>,
    pub responsible_user_id: Option<DbId>,
}

/// Filters accepted by [`crate::repositories::PatientRepo::list`].
#[derive(Debug, Clone, Default)]
pub struct PatientFilter {
    /// Case-insensitive substring over name, CPF, email and phone.
    pub search: Option<String>,
    pub responsible_user_id: Option<DbId>,
}
