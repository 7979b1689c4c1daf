//! Shared response envelope types for API handlers.

use serde::Serialize;
use woundcare_core::pagination::total_pages;

use crate::query::PageRequest;

/// Paginated list envelope: `{ items, total, page, limit, pages }`.
///
/// `pages` is `ceil(total / limit)`, and `0` for an empty result. Pages past
/// the end carry an empty `items` array with the real totals.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, req: PageRequest) -> Self {
        Self {
            items,
            total,
            page: req.page,
            limit: req.limit,
            pages: total_pages(total, req.limit),
        }
    }
}

/// Body returned by hard deletes that answer with 200: `{ deleted, id }`.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
    pub id: woundcare_core::types::DbId,
}
