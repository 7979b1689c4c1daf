//! Wound assessment model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use woundcare_core::types::{Date, DbId, Timestamp};
use woundcare_core::validation::validate_not_blank;
use woundcare_core::wound::{
    validate_exudate_amount, validate_status, validate_tissue_type, validate_wound_type,
};

/// A wound row from the `wounds` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wound {
    pub id: DbId,
    pub patient_id: DbId,
    pub location: String,
    pub wound_type: String,
    pub stage: Option<String>,
    pub onset_date: Option<Date>,
    pub length_cm: Option<f64>,
    pub width_cm: Option<f64>,
    pub depth_cm: Option<f64>,
    pub area_cm2: Option<f64>,
    pub exudate_amount: Option<String>,
    pub tissue_type: Option<String>,
    pub wound_edges: Option<String>,
    pub pain_level: Option<i32>,
    pub odor: bool,
    pub signs_of_infection: bool,
    pub status: String,
    pub notes: Option<String>,
    pub assessed_at: Timestamp,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Wound joined with its patient's name, used by list endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WoundListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub wound: Wound,
    pub patient_name: String,
}

/// Wound plus dependent-record counts, returned by `GET /wounds/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct WoundDetail {
    #[serde(flatten)]
    pub wound: Wound,
    pub treatment_count: i64,
    pub image_count: i64,
}

/// Count of wounds sharing one status value.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// DTO for creating a new wound record.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWound {
    pub patient_id: DbId,
    #[validate(
        length(min = 1, max = 200, message = "Location is required"),
        custom(function = "validate_not_blank")
    )]
    pub location: String,
    #[validate(custom(function = "validate_wound_type"))]
    pub wound_type: String,
    #[validate(length(max = 50))]
    pub stage: Option<String>,
    pub onset_date: Option<Date>,
    #[validate(range(min = 0.0, message = "Length cannot be negative"))]
    pub length_cm: Option<f64>,
    #[validate(range(min = 0.0, message = "Width cannot be negative"))]
    pub width_cm: Option<f64>,
    #[validate(range(min = 0.0, message = "Depth cannot be negative"))]
    pub depth_cm: Option<f64>,
    /// Derived from `length_cm × width_cm` when omitted.
    #[validate(range(min = 0.0, message = "Area cannot be negative"))]
    pub area_cm2: Option<f64>,
    #[validate(custom(function = "validate_exudate_amount"))]
    pub exudate_amount: Option<String>,
    #[validate(custom(function = "validate_tissue_type"))]
    pub tissue_type: Option<String>,
    #[validate(length(max = 200))]
    pub wound_edges: Option<String>,
    #[validate(range(min = 0, max = 10, message = "Pain level must be between 0 and 10"))]
    pub pain_level: Option<i32>,
    pub odor: Option<bool>,
    pub signs_of_infection: Option<bool>,
    /// Defaults to `active` when omitted.
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    pub notes: Option<String>,
    pub assessed_at: Option<Timestamp>,
}

/// DTO for updating an existing wound. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWound {
    #[validate(
        length(min = 1, max = 200, message = "Location cannot be empty"),
        custom(function = "validate_not_blank")
    )]
    pub location: Option<String>,
    #[validate(custom(function = "validate_wound_type"))]
    pub wound_type: Option<String>,
    #[validate(length(max = 50))]
    pub stage: Option<String>,
    pub onset_date: Option<Date>,
    #[validate(range(min = 0.0, message = "Length cannot be negative"))]
    pub length_cm: Option<f64>,
    #[validate(range(min = 0.0, message = "Width cannot be negative"))]
    pub width_cm: Option<f64>,
    #[validate(range(min = 0.0, message = "Depth cannot be negative"))]
    pub depth_cm: Option<f64>,
    #[validate(range(min = 0.0, message = "Area cannot be negative"))]
    pub area_cm2: Option<f64>,
    #[validate(custom(function = "validate_exudate_amount"))]
    pub exudate_amount: Option<String>,
    #[validate(custom(function = "validate_tissue_type"))]
    pub tissue_type: Option<String>,
    #[validate(length(max = 200))]
    pub wound_edges: Option<String>,
    #[validate(range(min = 0, max = 10, message = "Pain level must be between 0 and 10"))]
    pub pain_level: Option<i32>,
    pub odor: Option<bool>,
    pub signs_of_infection: Option<bool>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    pub notes: Option<String>,
    pub assessed_at: Option<Timestamp>,
}

/// Filters accepted by [`crate::repositories::WoundRepo::list`].
#[derive(Debug, Clone, Default)]
pub struct WoundFilter {
    /// Case-insensitive substring over location, notes and patient name.
    pub search: Option<String>,
    pub patient_id: Option<DbId>,
    pub status: Option<String>,
    pub wound_type: Option<String>,
}

/// Result of [`crate::repositories::WoundRepo::delete_if_unreferenced`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WoundDeletion {
    Deleted,
    NotFound,
    /// Dependent rows still reference the wound.
    Blocked { treatments: i64, images: i64 },
}
