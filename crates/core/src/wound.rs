//! Wound assessment vocabularies and the derived-area rule.

use std::borrow::Cow;

use validator::ValidationError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_HEALING: &str = "healing";
pub const STATUS_WORSENING: &str = "worsening";
pub const STATUS_INFECTED: &str = "infected";
pub const STATUS_HEALED: &str = "healed";

/// All wound statuses, in the order reports list them.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_ACTIVE,
    STATUS_HEALING,
    STATUS_WORSENING,
    STATUS_INFECTED,
    STATUS_HEALED,
];

/// Status assigned when a new wound omits one.
pub const DEFAULT_STATUS: &str = STATUS_ACTIVE;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

pub const VALID_WOUND_TYPES: &[&str] = &[
    "pressure_injury",
    "diabetic_foot",
    "venous_ulcer",
    "arterial_ulcer",
    "surgical",
    "traumatic",
    "burn",
    "other",
];

pub const VALID_EXUDATE_AMOUNTS: &[&str] = &["none", "scant", "small", "moderate", "large"];

pub const VALID_TISSUE_TYPES: &[&str] = &[
    "granulation",
    "epithelial",
    "slough",
    "necrotic",
    "eschar",
    "mixed",
];

// ---------------------------------------------------------------------------
// Derived area
// ---------------------------------------------------------------------------

/// `length × width` when both are present. Stored unrounded.
pub fn compute_area(length_cm: Option<f64>, width_cm: Option<f64>) -> Option<f64> {
    match (length_cm, width_cm) {
        (Some(l), Some(w)) => Some(l * w),
        _ => None,
    }
}

/// Resolve the area to store: an explicit value wins, otherwise it is
/// derived from the dimensions.
pub fn resolve_area(
    explicit_area: Option<f64>,
    length_cm: Option<f64>,
    width_cm: Option<f64>,
) -> Option<f64> {
    explicit_area.or_else(|| compute_area(length_cm, width_cm))
}

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

fn one_of(
    code: &'static str,
    label: &str,
    value: &str,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(code).with_message(Cow::Owned(format!(
            "Invalid {label} '{value}'. Must be one of: {}",
            allowed.join(", ")
        ))))
    }
}

pub fn validate_status(value: &str) -> Result<(), ValidationError> {
    one_of("status", "status", value, VALID_STATUSES)
}

pub fn validate_wound_type(value: &str) -> Result<(), ValidationError> {
    one_of("wound_type", "wound type", value, VALID_WOUND_TYPES)
}

pub fn validate_exudate_amount(value: &str) -> Result<(), ValidationError> {
    one_of("exudate_amount", "exudate amount", value, VALID_EXUDATE_AMOUNTS)
}

pub fn validate_tissue_type(value: &str) -> Result<(), ValidationError> {
    one_of("tissue_type", "tissue type", value, VALID_TISSUE_TYPES)
}
