//! Shared query parameter types for API handlers.

use serde::Deserialize;
use woundcare_core::pagination::{
    clamp_limit, clamp_page, offset_for, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

/// Generic pagination parameters (`?page=&limit=`), 1-based.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Clamped pagination window ready to bind into a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageRequest {
    /// Clamp raw `page` / `limit` values: page floors at 1, limit defaults
    /// to 20 and is capped at 100.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = clamp_page(page);
        let limit = clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        Self {
            page,
            limit,
            offset: offset_for(page, limit),
        }
    }
}

impl From<&PaginationParams> for PageRequest {
    fn from(params: &PaginationParams) -> Self {
        Self::new(params.page, params.limit)
    }
}

/// Treat a blank query value (`?status=`) as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
