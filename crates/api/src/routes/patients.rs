//! Route definitions for the `/patients` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::patients;
use crate::state::AppState;

/// Routes mounted at `/patients`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete (soft)
/// GET    /{id}/wounds       -> list_wounds
/// GET    /{id}/treatments   -> list_treatments
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(patients::list).post(patients::create))
        .route(
            "/{id}",
            get(patients::get_by_id)
                .put(patients::update)
                .delete(patients::delete),
        )
        .route("/{id}/wounds", get(patients::list_wounds))
        .route("/{id}/treatments", get(patients::list_treatments))
}
