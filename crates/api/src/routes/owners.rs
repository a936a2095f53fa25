use axum::routing::get;
use axum::Router;

use crate::handlers::owners;
use crate::state::AppState;

/// Mount the owner quota routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/user/listings/count", get(owners::listings_count))
}
