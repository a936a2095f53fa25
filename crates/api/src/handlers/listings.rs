//! Read-side catalogue queries: `GET /api/properties` and
//! `GET /api/properties/{id}`.
//!
//! Both endpoints return published records only and decorate the rows with
//! the derived fields the catalogue UI renders: display labels, the
//! capacity figure for the row's category, the cover image and the wifi
//! flag.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use kwabo_core::error::CoreError;
use kwabo_core::listing::{PropertyCategory, PrivacyLevel};
use kwabo_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use kwabo_core::types::{DbId, Fcfa, Timestamp};

use kwabo_db::models::property::{PropertySearchParams, PropertyWithWifi};
use kwabo_db::repositories::{AmenityRepo, DescriptionRepo, PropertyRepo};

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query and response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Substring match against city or neighborhood.
    pub location: Option<String>,
    /// Category filter (`HOUSE`, `OFFICE`, `EVENT`).
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    /// Minimum capacity for the row's category.
    pub guests: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A catalogue card: the search result row plus its derived display fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingCard {
    pub id: DbId,
    pub title: String,
    pub category: String,
    /// Renter-facing category label ("Maison", "Bureau", ...).
    pub type_label: String,
    pub sub_type: String,
    pub privacy_label: String,
    pub city: String,
    pub neighborhood: String,
    pub capacity: i32,
    pub size_sqm: i32,
    pub base_price: Fcfa,
    pub currency: String,
    pub cover_image: Option<String>,
    pub images_count: usize,
    pub has_wifi: bool,
    pub created_at: Timestamp,
}

/// Full detail payload: the card fields plus everything the listing page
/// shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetail {
    #[serde(flatten)]
    pub card: ListingCard,
    pub property: kwabo_db::models::property::Property,
    pub description: Option<kwabo_db::models::description::Description>,
    pub amenities: Vec<kwabo_db::models::amenity::Amenity>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/properties -- search published listings.
pub async fn search_listings(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ListResponse<ListingCard>>> {
    let category = params
        .property_type
        .as_deref()
        .map(|t| PropertyCategory::from_str_db(&t.trim().to_uppercase()))
        .transpose()
        .map_err(AppError::Core)?;

    let search = PropertySearchParams {
        location: params
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()),
        category,
        min_guests: params.guests.filter(|g| *g > 0),
        limit: clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        offset: clamp_offset(params.offset),
    };

    let rows = PropertyRepo::search(&state.pool, &search).await?;
    let cards = rows.into_iter().map(card_from_row).collect();
    Ok(Json(ListResponse::new(cards)))
}

/// GET /api/properties/{id} -- one published listing with description and
/// amenities.
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ListingDetail>>> {
    let row = PropertyRepo::find_published_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        }))?;

    let description = DescriptionRepo::find_for_property(&state.pool, id).await?;
    let amenities = AmenityRepo::list_for_property(&state.pool, id).await?;

    let card = card_from_row(row.clone());
    Ok(Json(DataResponse::new(ListingDetail {
        card,
        property: row.property,
        description,
        amenities,
    })))
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

fn card_from_row(row: PropertyWithWifi) -> ListingCard {
    let p = &row.property;
    // Stored enum strings always parse; fall back to the raw string for
    // rows predating the current enum set.
    let type_label = PropertyCategory::from_str_db(&p.category)
        .map(|c| c.label().to_string())
        .unwrap_or_else(|_| p.category.clone());
    let privacy_label = PrivacyLevel::from_str_db(&p.privacy)
        .map(|l| l.label().to_string())
        .unwrap_or_else(|_| p.privacy.clone());

    ListingCard {
        id: p.id,
        title: p.title.clone(),
        category: p.category.clone(),
        type_label,
        sub_type: p.sub_type.clone(),
        privacy_label,
        city: p.city.clone(),
        neighborhood: p.neighborhood.clone(),
        capacity: p.capacity(),
        size_sqm: p.size_sqm,
        base_price: p.base_price,
        currency: p.currency.clone(),
        cover_image: p.cover_image().map(str::to_string),
        images_count: p.images.len(),
        has_wifi: row.has_wifi,
        created_at: p.created_at,
    }
}
