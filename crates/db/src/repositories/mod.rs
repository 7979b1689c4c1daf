//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod patient_repo;
pub mod report_repo;
pub mod treatment_repo;
pub mod user_repo;
pub mod wound_image_repo;
pub mod wound_repo;

pub use patient_repo::PatientRepo;
pub use report_repo::ReportRepo;
pub use treatment_repo::TreatmentRepo;
pub use user_repo::UserRepo;
pub use wound_image_repo::WoundImageRepo;
pub use wound_repo::WoundRepo;

/// Build an `ILIKE` pattern matching `term` as a literal substring.
///
/// Returns `None` for blank input so callers can bind it straight into a
/// `$n::TEXT IS NULL OR ...` clause.
pub(crate) fn like_pattern(term: Option<&str>) -> Option<String> {
    let term = term?.trim();
    if term.is_empty() {
        return None;
    }
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn blank_search_is_no_filter() {
        assert_eq!(like_pattern(None), None);
        assert_eq!(like_pattern(Some("   ")), None);
    }

    #[test]
    fn wraps_and_escapes_wildcards() {
        assert_eq!(like_pattern(Some(" heel ")).as_deref(), Some("%heel%"));
        assert_eq!(like_pattern(Some("50%_x")).as_deref(), Some("%50\\%\\_x%"));
    }
}
