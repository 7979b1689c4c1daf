//! Wound image model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use woundcare_core::types::{DbId, Timestamp};

/// A row from the `wound_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WoundImage {
    pub id: DbId,
    pub wound_id: DbId,
    /// Public URL under `/uploads`.
    pub url: String,
    /// Location on disk. Not exposed to clients.
    #[serde(skip_serializing)]
    pub file_path: String,
    /// Original client-side file name.
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub width_px: Option<i32>,
    pub height_px: Option<i32>,
    pub description: Option<String>,
    pub taken_at: Option<Timestamp>,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert for the `wound_images` table, built after the file is stored.
#[derive(Debug, Clone)]
pub struct NewWoundImage {
    pub wound_id: DbId,
    pub url: String,
    pub file_path: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub width_px: Option<i32>,
    pub height_px: Option<i32>,
    pub description: Option<String>,
    pub taken_at: Option<Timestamp>,
    pub uploaded_by: Option<DbId>,
}

/// DTO for updating image metadata. The file itself is immutable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWoundImage {
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub taken_at: Option<Timestamp>,
}
