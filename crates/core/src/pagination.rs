//! Page/limit arithmetic for list endpoints.
//!
//! Clients send a 1-based `page` and a `limit`. Both are clamped here so the
//! repository layer can bind them directly.

/// Page size used when the client omits `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided page size into `1..=max`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Row offset for a 1-based `page`.
pub fn offset_for(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(limit)
}

/// Number of pages needed to show `total` rows, `ceil(total / limit)`.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
