//! Handlers for the `/wounds` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use woundcare_core::error::CoreError;
use woundcare_core::permissions::{WOUND_CREATE, WOUND_DELETE, WOUND_READ, WOUND_UPDATE};
use woundcare_core::types::DbId;
use woundcare_core::wound::{compute_area, resolve_area};
use woundcare_db::models::wound::{
    CreateWound, StatusCount, UpdateWound, Wound, WoundDeletion, WoundDetail, WoundFilter,
    WoundListItem,
};
use woundcare_db::repositories::{PatientRepo, WoundRepo};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::query::{non_blank, PageRequest};
use crate::response::{DeletedResponse, Paginated};
use crate::state::AppState;

/// Query parameters for `GET /wounds`.
#[derive(Debug, Deserialize)]
pub struct WoundListParams {
    pub search: Option<String>,
    pub patient_id: Option<DbId>,
    pub status: Option<String>,
    pub wound_type: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Wound list page plus the per-status breakdown.
#[derive(Debug, Serialize)]
pub struct WoundListResponse {
    #[serde(flatten)]
    pub page: Paginated<WoundListItem>,
    /// Counts by status under every filter except `status`.
    pub status_counts: Vec<StatusCount>,
}

/// GET /api/wounds
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<WoundListParams>,
) -> AppResult<Json<WoundListResponse>> {
    auth.require(WOUND_READ)?;

    let page = PageRequest::new(params.page, params.limit);
    let filter = WoundFilter {
        search: non_blank(params.search),
        patient_id: params.patient_id,
        status: non_blank(params.status),
        wound_type: non_blank(params.wound_type),
    };

    let items = WoundRepo::list(&state.pool, &filter, page.limit, page.offset).await?;
    let total = WoundRepo::count(&state.pool, &filter).await?;
    let status_counts = WoundRepo::status_counts(&state.pool, &filter).await?;

    Ok(Json(WoundListResponse {
        page: Paginated::new(items, total, page),
        status_counts,
    }))
}

/// POST /api/wounds
///
/// The patient must exist. `area_cm2` is derived from length × width when
/// omitted; status defaults to `active`.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateWound>,
) -> AppResult<(StatusCode, Json<Wound>)> {
    auth.require(WOUND_CREATE)?;

    PatientRepo::find_by_id(&state.pool, input.patient_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(
            "Patient",
            input.patient_id,
        )))?;

    let area = resolve_area(input.area_cm2, input.length_cm, input.width_cm);
    let wound = WoundRepo::create(&state.pool, &input, area, auth.user_id).await?;
    tracing::info!(
        wound_id = wound.id,
        patient_id = wound.patient_id,
        user_id = auth.user_id,
        "Wound created"
    );

    Ok((StatusCode::CREATED, Json(wound)))
}

/// GET /api/wounds/{id}
///
/// The wound plus its treatment and image counts.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<WoundDetail>> {
    auth.require(WOUND_READ)?;

    let wound = find_wound(&state, id).await?;
    let (treatment_count, image_count) = WoundRepo::dependent_counts(&state.pool, id).await?;

    Ok(Json(WoundDetail {
        wound,
        treatment_count,
        image_count,
    }))
}

/// PUT /api/wounds/{id}
///
/// Partial update. Without an explicit `area_cm2`, the area is recomputed
/// from the merged dimensions whenever length or width changes.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateWound>,
) -> AppResult<Json<Wound>> {
    auth.require(WOUND_UPDATE)?;

    let existing = find_wound(&state, id).await?;
    let area = updated_area(&existing, &input);

    let wound = WoundRepo::update(&state.pool, id, &input, area)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Wound", id)))?;
    tracing::info!(wound_id = id, user_id = auth.user_id, "Wound updated");

    Ok(Json(wound))
}

/// DELETE /api/wounds/{id}
///
/// Hard delete. Refused with 409 while treatments or images reference the
/// wound; the body's `details` carries `treatments`, `images` and
/// `blocking`.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeletedResponse>> {
    auth.require(WOUND_DELETE)?;

    match WoundRepo::delete_if_unreferenced(&state.pool, id).await? {
        WoundDeletion::Deleted => {
            tracing::info!(wound_id = id, user_id = auth.user_id, "Wound deleted");
            Ok(Json(DeletedResponse { deleted: true, id }))
        }
        WoundDeletion::NotFound => Err(AppError::Core(CoreError::not_found("Wound", id))),
        WoundDeletion::Blocked { treatments, images } => Err(AppError::Blocked {
            message: format!(
                "Wound {id} has {} dependent record(s) and cannot be deleted",
                treatments + images
            ),
            details: json!({
                "treatments": treatments,
                "images": images,
                "blocking": treatments + images,
            }),
        }),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_wound(state: &AppState, id: DbId) -> AppResult<Wound> {
    WoundRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Wound", id)))
}

/// Area to write on update, or `None` to keep the stored value.
fn updated_area(existing: &Wound, input: &UpdateWound) -> Option<f64> {
    if input.area_cm2.is_some() {
        return input.area_cm2;
    }
    if input.length_cm.is_none() && input.width_cm.is_none() {
        return None;
    }
    compute_area(
        input.length_cm.or(existing.length_cm),
        input.width_cm.or(existing.width_cm),
    )
}
