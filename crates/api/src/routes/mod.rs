pub mod health;
pub mod listings;
pub mod owners;
pub mod publish;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /publish                      publish a listing (POST, multipart)
///
/// /user/listings/count          owner quota pre-flight (GET)
///
/// /properties                   search published listings (GET)
/// /properties/{id}              listing detail (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(publish::router())
        .merge(owners::router())
        .merge(listings::router())
}
