//! Handlers for the `/patients` resource.
//!
//! Patients are soft-deleted; a deleted patient disappears from every read
//! but still holds its CPF.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use woundcare_core::error::CoreError;
use woundcare_core::permissions::{
    PATIENT_CREATE, PATIENT_DELETE, PATIENT_READ, PATIENT_UPDATE, TREATMENT_READ, WOUND_READ,
};
use woundcare_core::types::DbId;
use woundcare_db::models::patient::{
    CreatePatient, Patient, PatientDetail, PatientFilter, UpdatePatient,
};
use woundcare_db::models::treatment::{Treatment, TreatmentFilter};
use woundcare_db::models::wound::{WoundFilter, WoundListItem};
use woundcare_db::repositories::{PatientRepo, TreatmentRepo, UserRepo, WoundRepo};

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::query::{non_blank, PageRequest, PaginationParams};
use crate::response::Paginated;
use crate::state::AppState;

const DUPLICATE_CPF: &str = "CPF already registered";

/// Query parameters for `GET /patients`.
#[derive(Debug, Deserialize)]
pub struct PatientListParams {
    pub search: Option<String>,
    pub responsible_user_id: Option<DbId>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// POST /api/patients
///
/// `responsible_user_id` defaults to the caller. A CPF already on file,
/// including on a deleted patient, is rejected with 400.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreatePatient>,
) -> AppResult<(StatusCode, Json<Patient>)> {
    auth.require(PATIENT_CREATE)?;

    if PatientRepo::find_by_cpf(&state.pool, &input.cpf)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Validation(DUPLICATE_CPF.into())));
    }

    let responsible = match input.responsible_user_id {
        Some(user_id) => {
            ensure_user_exists(&state, user_id).await?;
            user_id
        }
        None => auth.user_id,
    };

    let patient = PatientRepo::create(&state.pool, &input, responsible)
        .await
        .map_err(map_duplicate_cpf)?;
    tracing::info!(patient_id = patient.id, user_id = auth.user_id, "Patient created");

    Ok((StatusCode::CREATED, Json(patient)))
}

/// GET /api/patients
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PatientListParams>,
) -> AppResult<Json<Paginated<Patient>>> {
    auth.require(PATIENT_READ)?;

    let page = PageRequest::new(params.page, params.limit);
    let filter = PatientFilter {
        search: non_blank(params.search),
        responsible_user_id: params.responsible_user_id,
    };

    let items = PatientRepo::list(&state.pool, &filter, page.limit, page.offset).await?;
    let total = PatientRepo::count(&state.pool, &filter).await?;
    Ok(Json(Paginated::new(items, total, page)))
}

/// GET /api/patients/{id}
///
/// The patient plus total and open (not healed) wound counts.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<PatientDetail>> {
    auth.require(PATIENT_READ)?;

    let patient = find_patient(&state, id).await?;
    let (wound_count, open_wound_count) = PatientRepo::wound_counts(&state.pool, id).await?;

    Ok(Json(PatientDetail {
        patient,
        wound_count,
        open_wound_count,
    }))
}

/// PUT /api/patients/{id}
///
/// Partial update. A changed CPF is re-checked for format (by validation)
/// and uniqueness.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdatePatient>,
) -> AppResult<Json<Patient>> {
    auth.require(PATIENT_UPDATE)?;

    if let Some(cpf) = input.cpf.as_deref() {
        if let Some(holder) = PatientRepo::find_by_cpf(&state.pool, cpf).await? {
            if holder.id != id {
                return Err(AppError::Core(CoreError::Validation(DUPLICATE_CPF.into())));
            }
        }
    }

    if let Some(user_id) = input.responsible_user_id {
        ensure_user_exists(&state, user_id).await?;
    }

    let patient = PatientRepo::update(&state.pool, id, &input)
        .await
        .map_err(map_duplicate_cpf)?
        .ok_or(AppError::Core(CoreError::not_found("Patient", id)))?;
    tracing::info!(patient_id = id, user_id = auth.user_id, "Patient updated");

    Ok(Json(patient))
}

/// DELETE /api/patients/{id}
///
/// Soft delete. Returns 204 No Content.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require(PATIENT_DELETE)?;

    if PatientRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(patient_id = id, user_id = auth.user_id, "Patient deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::not_found("Patient", id)))
    }
}

/// GET /api/patients/{id}/wounds
pub async fn list_wounds(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<WoundListItem>>> {
    auth.require(WOUND_READ)?;
    find_patient(&state, id).await?;

    let page = PageRequest::from(&params);
    let filter = WoundFilter {
        patient_id: Some(id),
        ..Default::default()
    };

    let items = WoundRepo::list(&state.pool, &filter, page.limit, page.offset).await?;
    let total = WoundRepo::count(&state.pool, &filter).await?;
    Ok(Json(Paginated::new(items, total, page)))
}

/// GET /api/patients/{id}/treatments
pub async fn list_treatments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Treatment>>> {
    auth.require(TREATMENT_READ)?;
    find_patient(&state, id).await?;

    let page = PageRequest::from(&params);
    let filter = TreatmentFilter {
        patient_id: Some(id),
        ..Default::default()
    };

    let items = TreatmentRepo::list(&state.pool, &filter, page.limit, page.offset).await?;
    let total = TreatmentRepo::count(&state.pool, &filter).await?;
    Ok(Json(Paginated::new(items, total, page)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_patient(state: &AppState, id: DbId) -> AppResult<Patient> {
    PatientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Patient", id)))
}

async fn ensure_user_exists(state: &AppState, user_id: DbId) -> AppResult<()> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::not_found("User", user_id)))
}

/// A concurrent insert can still trip the CPF constraint after the lookup.
fn map_duplicate_cpf(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err, "uq_patients_cpf") {
        AppError::Core(CoreError::Validation(DUPLICATE_CPF.into()))
    } else {
        AppError::Database(err)
    }
}
