//! `GET /api/user/listings/count`: how many listings an owner holds and
//! whether they may publish another.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use kwabo_core::publish::ListingCountResponse;
use kwabo_core::quota;

use kwabo_db::repositories::{OwnerRepo, PropertyRepo};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CountParams {
    pub email: Option<String>,
}

/// The quota pre-flight the wizard runs before submitting. Degrades
/// fail-open on internal errors: the publish endpoint re-checks
/// authoritatively, so a broken count must never lock an owner out.
pub async fn listings_count(
    State(state): State<AppState>,
    Query(params): Query<CountParams>,
) -> (StatusCode, Json<ListingCountResponse>) {
    let max = state.config.max_listings_per_owner;

    let Some(email) = params.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ListingCountResponse {
                success: false,
                count: 0,
                limit: max,
                can_publish: false,
                remaining: 0,
                error: Some("Le paramètre 'email' est requis".into()),
            }),
        );
    };

    match count_for_email(&state, email).await {
        Ok(count) => (
            StatusCode::OK,
            Json(ListingCountResponse {
                success: true,
                count,
                limit: max,
                can_publish: quota::can_publish(count, max),
                remaining: quota::remaining(count, max),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Listing count failed, answering fail-open");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ListingCountResponse {
                    success: false,
                    count: 0,
                    limit: max,
                    can_publish: true,
                    remaining: max,
                    error: Some("Vérification du quota indisponible".into()),
                }),
            )
        }
    }
}

/// Count the listings held by the owner with this email; unknown owners
/// hold zero.
async fn count_for_email(state: &AppState, email: &str) -> Result<i64, sqlx::Error> {
    match OwnerRepo::find_by_email(&state.pool, email).await? {
        Some(owner) => PropertyRepo::count_by_owner(&state.pool, owner.id).await,
        None => Ok(0),
    }
}
