//! Route definitions for the `/images` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Routes mounted at `/images`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> upload (multipart)
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(images::list).post(images::upload))
        .route(
            "/{id}",
            get(images::get_by_id)
                .put(images::update)
                .delete(images::delete),
        )
}
