//! Route definitions for the `/treatments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::treatments;
use crate::state::AppState;

/// Routes mounted at `/treatments`.
///
/// ```text
/// GET    /           -> list
/// POST   /           -> create
/// GET    /schedule   -> schedule
/// GET    /{id}       -> get_by_id
/// PUT    /{id}       -> update
/// DELETE /{id}       -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(treatments::list).post(treatments::create))
        .route("/schedule", get(treatments::schedule))
        .route(
            "/{id}",
            get(treatments::get_by_id)
                .put(treatments::update)
                .delete(treatments::delete),
        )
}
