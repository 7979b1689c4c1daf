//! Repository for the `wound_images` table.

use sqlx::PgPool;
use woundcare_core::types::DbId;

use crate::models::wound_image::{NewWoundImage, UpdateWoundImage, WoundImage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, wound_id, url, file_path, file_name, content_type, size_bytes, \
                       width_px, height_px, description, taken_at, uploaded_by, created_at, \
                       updated_at";

/// Provides CRUD operations for wound images.
pub struct WoundImageRepo;

impl WoundImageRepo {
    /// Insert a stored image's metadata, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewWoundImage) -> Result<WoundImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO wound_images (wound_id, url, file_path, file_name, content_type,
                                       size_bytes, width_px, height_px, description, taken_at,
                                       uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WoundImage>(&query)
            .bind(input.wound_id)
            .bind(&input.url)
            .bind(&input.file_path)
            .bind(&input.file_name)
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .bind(input.width_px)
            .bind(input.height_px)
            .bind(&input.description)
            .bind(input.taken_at)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Find an image by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WoundImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wound_images WHERE id = $1");
        sqlx::query_as::<_, WoundImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of images, optionally for a single wound, newest first.
    pub async fn list(
        pool: &PgPool,
        wound_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WoundImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wound_images
             WHERE ($1::BIGINT IS NULL OR wound_id = $1)
             ORDER BY COALESCE(taken_at, created_at) DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, WoundImage>(&query)
            .bind(wound_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count images, optionally for a single wound.
    pub async fn count(pool: &PgPool, wound_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM wound_images WHERE ($1::BIGINT IS NULL OR wound_id = $1)",
        )
        .bind(wound_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Update description and capture time. Returns `None` if absent.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWoundImage,
    ) -> Result<Option<WoundImage>, sqlx::Error> {
        let query = format!(
            "UPDATE wound_images SET
                description = COALESCE($2, description),
                taken_at = COALESCE($3, taken_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WoundImage>(&query)
            .bind(id)
            .bind(&input.description)
            .bind(input.taken_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete an image row, returning it so the caller can remove the file.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<WoundImage>, sqlx::Error> {
        let query = format!("DELETE FROM wound_images WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, WoundImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
