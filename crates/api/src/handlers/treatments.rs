//! Handlers for the `/treatments` resource and the dressing-change schedule.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Days, Utc};
use serde::{Deserialize, Serialize};
use woundcare_core::error::CoreError;
use woundcare_core::permissions::{
    TREATMENT_CREATE, TREATMENT_DELETE, TREATMENT_READ, TREATMENT_UPDATE,
};
use woundcare_core::treatment::{clamp_schedule_days, next_change_date, resolve_next_change_date};
use woundcare_core::types::{Date, DbId};
use woundcare_db::models::treatment::{
    CreateTreatment, NewTreatment, ScheduledChange, Treatment, TreatmentFilter, UpdateTreatment,
};
use woundcare_db::repositories::{TreatmentRepo, WoundRepo};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::query::PageRequest;
use crate::response::Paginated;
use crate::state::AppState;

/// Query parameters for `GET /treatments`.
#[derive(Debug, Deserialize)]
pub struct TreatmentListParams {
    pub wound_id: Option<DbId>,
    pub patient_id: Option<DbId>,
    pub user_id: Option<DbId>,
    /// Only treatments whose next change is on or before this date.
    pub due_before: Option<Date>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters for `GET /treatments/schedule`.
#[derive(Debug, Deserialize)]
pub struct ScheduleParams {
    /// Look-ahead window in days (default 7, max 90).
    pub days: Option<i64>,
}

/// Upcoming dressing changes between `from` and `to` inclusive.
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub from: Date,
    pub to: Date,
    pub days: i64,
    pub items: Vec<ScheduledChange>,
}

/// GET /api/treatments
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<TreatmentListParams>,
) -> AppResult<Json<Paginated<Treatment>>> {
    auth.require(TREATMENT_READ)?;

    let page = PageRequest::new(params.page, params.limit);
    let filter = TreatmentFilter {
        wound_id: params.wound_id,
        patient_id: params.patient_id,
        user_id: params.user_id,
        due_before: params.due_before,
    };

    let items = TreatmentRepo::list(&state.pool, &filter, page.limit, page.offset).await?;
    let total = TreatmentRepo::count(&state.pool, &filter).await?;
    Ok(Json(Paginated::new(items, total, page)))
}

/// GET /api/treatments/schedule?days=N
///
/// The latest treatment of each open wound whose next change falls between
/// today and today + N, earliest first.
pub async fn schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ScheduleParams>,
) -> AppResult<Json<ScheduleResponse>> {
    auth.require(TREATMENT_READ)?;

    let days = clamp_schedule_days(params.days);
    let from = Utc::now().date_naive();
    // `days` is clamped to 0..=90.
    let to = from
        .checked_add_days(Days::new(days as u64))
        .ok_or_else(|| AppError::BadRequest("Schedule window out of range".into()))?;

    let items = TreatmentRepo::scheduled_changes(&state.pool, from, to).await?;
    Ok(Json(ScheduleResponse {
        from,
        to,
        days,
        items,
    }))
}

/// POST /api/treatments
///
/// The wound must exist. `patient_id` defaults to the wound's patient and
/// must match it when given; the performer is the caller. `next_change_date`
/// is derived from `performed_at + change_frequency_days` when omitted.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateTreatment>,
) -> AppResult<(StatusCode, Json<Treatment>)> {
    auth.require(TREATMENT_CREATE)?;

    let wound = WoundRepo::find_by_id(&state.pool, input.wound_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Wound", input.wound_id)))?;

    if let Some(patient_id) = input.patient_id {
        if patient_id != wound.patient_id {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Wound {} does not belong to patient {patient_id}",
                wound.id
            ))));
        }
    }

    let performed_at = input.performed_at.unwrap_or_else(Utc::now);
    let next = resolve_next_change_date(
        input.next_change_date,
        performed_at.date_naive(),
        input.change_frequency_days,
    );

    let new_treatment = NewTreatment {
        wound_id: wound.id,
        patient_id: wound.patient_id,
        user_id: auth.user_id,
        performed_at,
        cleaning_solution: input.cleaning_solution,
        debridement: input.debridement,
        primary_dressing: input.primary_dressing,
        secondary_dressing: input.secondary_dressing,
        topical_agent: input.topical_agent,
        change_frequency_days: input.change_frequency_days,
        next_change_date: next,
        observations: input.observations,
    };

    let treatment = TreatmentRepo::create(&state.pool, &new_treatment).await?;
    tracing::info!(
        treatment_id = treatment.id,
        wound_id = treatment.wound_id,
        user_id = auth.user_id,
        "Treatment recorded"
    );

    Ok((StatusCode::CREATED, Json(treatment)))
}

/// GET /api/treatments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Treatment>> {
    auth.require(TREATMENT_READ)?;
    Ok(Json(find_treatment(&state, id).await?))
}

/// PUT /api/treatments/{id}
///
/// Partial update. Without an explicit `next_change_date`, the date is
/// re-derived when `performed_at` or `change_frequency_days` changes.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateTreatment>,
) -> AppResult<Json<Treatment>> {
    auth.require(TREATMENT_UPDATE)?;

    let existing = find_treatment(&state, id).await?;
    let next = updated_next_change(&existing, &input);

    let treatment = TreatmentRepo::update(&state.pool, id, &input, next)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Treatment", id)))?;
    tracing::info!(treatment_id = id, user_id = auth.user_id, "Treatment updated");

    Ok(Json(treatment))
}

/// DELETE /api/treatments/{id}
///
/// Hard delete. Returns 204 No Content.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require(TREATMENT_DELETE)?;

    if TreatmentRepo::delete(&state.pool, id).await? {
        tracing::info!(treatment_id = id, user_id = auth.user_id, "Treatment deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Treatment", id)))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_treatment(state: &AppState, id: DbId) -> AppResult<Treatment> {
    TreatmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Treatment", id)))
}

/// Next change date to write on update, or `None` to keep the stored value.
fn updated_next_change(existing: &Treatment, input: &UpdateTreatment) -> Option<Date> {
    if input.next_change_date.is_some() {
        return input.next_change_date;
    }
    if input.performed_at.is_none() && input.change_frequency_days.is_none() {
        return None;
    }
    let performed_at = input.performed_at.unwrap_or(existing.performed_at);
    next_change_date(
        performed_at.date_naive(),
        input.change_frequency_days.or(existing.change_frequency_days),
    )
}
