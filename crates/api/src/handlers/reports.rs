//! Handlers for aggregate reports.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use woundcare_core::permissions::REPORT_READ;
use woundcare_db::models::report::ReportSummary;
use woundcare_db::repositories::ReportRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/reports/summary
///
/// Clinic-wide counts. Windows are anchored on today's UTC date.
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ReportSummary>> {
    auth.require(REPORT_READ)?;

    let today = Utc::now().date_naive();
    let summary = ReportRepo::summary(&state.pool, today).await?;
    Ok(Json(summary))
}
