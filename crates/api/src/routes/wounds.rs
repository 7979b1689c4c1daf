//! Route definitions for the `/wounds` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::wounds;
use crate::state::AppState;

/// Routes mounted at `/wounds`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(wounds::list).post(wounds::create))
        .route(
            "/{id}",
            get(wounds::get_by_id)
                .put(wounds::update)
                .delete(wounds::delete),
        )
}
