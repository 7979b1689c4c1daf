//! Handlers for the `/images` resource (wound photographs).
//!
//! Files live under `<upload_dir>/wounds/<wound_id>/` and are served
//! read-only at `/uploads`; the database row keeps the metadata.

use std::io::Cursor;
use std::path::Path as FsPath;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use image::{ImageFormat, ImageReader};
use serde::Deserialize;
use uuid::Uuid;
use woundcare_core::error::CoreError;
use woundcare_core::image::{content_type_for, image_extension, public_url, relative_storage_path};
use woundcare_core::permissions::{IMAGE_CREATE, IMAGE_DELETE, IMAGE_READ, IMAGE_UPDATE};
use woundcare_core::types::{DbId, Timestamp};
use woundcare_db::models::wound_image::{NewWoundImage, UpdateWoundImage, WoundImage};
use woundcare_db::repositories::{WoundImageRepo, WoundRepo};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::query::PageRequest;
use crate::response::Paginated;
use crate::state::AppState;

/// Longest accepted image description, in characters.
const MAX_DESCRIPTION_LEN: usize = 1000;

/// Query parameters for `GET /images`.
#[derive(Debug, Deserialize)]
pub struct ImageListParams {
    pub wound_id: Option<DbId>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Fields collected from the upload form.
#[derive(Debug, Default)]
struct UploadForm {
    wound_id: Option<String>,
    file: Option<(String, Vec<u8>)>,
    description: Option<String>,
    taken_at: Option<String>,
}

/// POST /api/images
///
/// Multipart upload with fields `wound_id` and `file` (required) plus
/// optional `description` and `taken_at` (RFC 3339).
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<WoundImage>)> {
    auth.require(IMAGE_CREATE)?;

    let form = read_upload_form(multipart).await?;

    let wound_id: DbId = form
        .wound_id
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Missing required 'wound_id' field".into()))?
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("'wound_id' must be an integer".into()))?;

    let (file_name, data) =
        form.file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let ext = image_extension(&file_name).map_err(AppError::BadRequest)?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::BadRequest(format!(
            "File exceeds the maximum size of {} bytes",
            state.config.max_upload_bytes
        )));
    }

    let description = form.description.filter(|d| !d.trim().is_empty());
    if description
        .as_ref()
        .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
    {
        return Err(AppError::BadRequest(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    let taken_at = form.taken_at.as_deref().map(parse_taken_at).transpose()?;

    let (format, width, height) = inspect_image(&data)?;
    if !format_matches_extension(format, &ext) {
        return Err(AppError::BadRequest(format!(
            "File content does not match its '.{ext}' extension"
        )));
    }

    WoundRepo::find_by_id(&state.pool, wound_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Wound", wound_id)))?;

    let stored_name = format!("{}.{ext}", Uuid::new_v4());
    let relative = relative_storage_path(wound_id, &stored_name);
    let full_path = state.config.upload_dir.join(&relative);
    write_file(&full_path, &data).await?;

    let input = NewWoundImage {
        wound_id,
        url: public_url(&relative),
        file_path: full_path.to_string_lossy().to_string(),
        file_name,
        content_type: content_type_for(&ext).to_string(),
        size_bytes: data.len() as i64,
        width_px: i32::try_from(width).ok(),
        height_px: i32::try_from(height).ok(),
        description,
        taken_at,
        uploaded_by: Some(auth.user_id),
    };

    let image = match WoundImageRepo::create(&state.pool, &input).await {
        Ok(image) => image,
        Err(err) => {
            remove_file_best_effort(&full_path).await;
            return Err(err.into());
        }
    };
    tracing::info!(
        image_id = image.id,
        wound_id,
        size_bytes = image.size_bytes,
        user_id = auth.user_id,
        "Wound image uploaded"
    );

    Ok((StatusCode::CREATED, Json(image)))
}

/// GET /api/images
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ImageListParams>,
) -> AppResult<Json<Paginated<WoundImage>>> {
    auth.require(IMAGE_READ)?;

    let page = PageRequest::new(params.page, params.limit);
    let items = WoundImageRepo::list(&state.pool, params.wound_id, page.limit, page.offset).await?;
    let total = WoundImageRepo::count(&state.pool, params.wound_id).await?;
    Ok(Json(Paginated::new(items, total, page)))
}

/// GET /api/images/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<WoundImage>> {
    auth.require(IMAGE_READ)?;

    let image = WoundImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("WoundImage", id)))?;
    Ok(Json(image))
}

/// PUT /api/images/{id}
///
/// Update description and capture time. The stored file never changes.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateWoundImage>,
) -> AppResult<Json<WoundImage>> {
    auth.require(IMAGE_UPDATE)?;

    let image = WoundImageRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("WoundImage", id)))?;
    Ok(Json(image))
}

/// DELETE /api/images/{id}
///
/// Removes the row, then the file. A file that cannot be removed is logged
/// and does not fail the request. Returns 204 No Content.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require(IMAGE_DELETE)?;

    let image = WoundImageRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("WoundImage", id)))?;

    remove_file_best_effort(FsPath::new(&image.file_path)).await;
    tracing::info!(image_id = id, wound_id = image.wound_id, user_id = auth.user_id, "Wound image deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn read_upload_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.file = Some((file_name, data.to_vec()));
            }
            "wound_id" | "description" | "taken_at" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                match name.as_str() {
                    "wound_id" => form.wound_id = Some(text),
                    "description" => form.description = Some(text),
                    _ => form.taken_at = Some(text),
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(form)
}

fn parse_taken_at(raw: &str) -> AppResult<Timestamp> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::BadRequest("'taken_at' must be an RFC 3339 timestamp".into()))
}

/// Detected format and pixel dimensions, read from the header without
/// decoding the body.
fn inspect_image(data: &[u8]) -> AppResult<(ImageFormat, u32, u32)> {
    let not_an_image = || AppError::BadRequest("File is not a valid PNG, JPEG or WebP image".into());

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| AppError::BadRequest(format!("Unreadable image: {e}")))?;
    let format = reader.format().ok_or_else(not_an_image)?;
    let (width, height) = reader.into_dimensions().map_err(|_| not_an_image())?;
    Ok((format, width, height))
}

/// Whether the sniffed format is the one the file name claims.
fn format_matches_extension(format: ImageFormat, ext: &str) -> bool {
    match format {
        ImageFormat::Png => ext == "png",
        ImageFormat::Jpeg => matches!(ext, "jpg" | "jpeg"),
        ImageFormat::WebP => ext == "webp",
        _ => false,
    }
}

async fn write_file(path: &FsPath, data: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to create upload directory: {e}")))?;
    }
    tokio::fs::write(path, data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store image: {e}")))
}

async fn remove_file_best_effort(path: &FsPath) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove stored image file");
    }
}
