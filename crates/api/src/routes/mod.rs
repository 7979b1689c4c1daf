pub mod auth;
pub mod health;
pub mod images;
pub mod patients;
pub mod reports;
pub mod treatments;
pub mod users;
pub mod wounds;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (public, clears cookie)
/// /auth/me                             current user + permissions
/// /auth/me/password                    change own password (PUT)
///
/// /users                               list, create (admin only)
/// /users/{id}                          get, update, deactivate
/// /users/{id}/reset-password           reset password (POST)
///
/// /patients                            list, create
/// /patients/{id}                       get, update, soft delete
/// /patients/{id}/wounds                wounds of one patient
/// /patients/{id}/treatments            treatments of one patient
///
/// /wounds                              list (+ status counts), create
/// /wounds/{id}                         get, update, delete (409 if referenced)
///
/// /treatments                          list, create
/// /treatments/schedule                 upcoming dressing changes
/// /treatments/{id}                     get, update, delete
///
/// /images                              list, upload (multipart)
/// /images/{id}                         get, update metadata, delete
///
/// /reports/summary                     clinic-wide counts
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication and the caller's own account.
        .nest("/auth", auth::router())
        // User management (admin only).
        .nest("/users", users::router())
        // Clinical records.
        .nest("/patients", patients::router())
        .nest("/wounds", wounds::router())
        .nest("/treatments", treatments::router())
        .nest("/images", images::router())
        // Aggregates.
        .nest("/reports", reports::router())
}
