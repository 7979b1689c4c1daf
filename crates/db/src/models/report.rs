//! Aggregate report shapes.

use serde::Serialize;
use sqlx::FromRow;

use crate::models::wound::StatusCount;

/// Count of wounds sharing one wound type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TypeCount {
    pub wound_type: String,
    pub count: i64,
}

/// Clinic-wide summary returned by `GET /reports/summary`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub active_patients: i64,
    pub total_wounds: i64,
    pub wounds_by_status: Vec<StatusCount>,
    pub wounds_by_type: Vec<TypeCount>,
    pub treatments_last_30_days: i64,
    pub changes_due_next_7_days: i64,
    pub overdue_changes: i64,
    pub images_stored: i64,
}
