use axum::routing::get;
use axum::Router;

use crate::handlers::listings;
use crate::state::AppState;

/// Mount the read-side catalogue routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/properties", get(listings::search_listings))
        .route("/properties/{id}", get(listings::get_listing))
}
