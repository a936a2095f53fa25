//! Property (listing) row model.

use serde::Serialize;
use sqlx::FromRow;

use kwabo_core::listing::PropertyCategory;
use kwabo_core::types::{DbId, Fcfa, Timestamp};

/// A row from the `properties` table. Category-specific capacity columns
/// are nullable; only the group matching `category` is populated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub category: String,
    pub sub_type: String,
    pub privacy: String,
    pub country: String,
    pub city: String,
    pub neighborhood: String,
    pub address: String,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub size_sqm: i32,
    pub floors: i32,
    // House
    pub max_guests: Option<i32>,
    pub bedrooms: Option<i32>,
    pub beds: Option<i32>,
    pub bathrooms: Option<i32>,
    // Office
    pub employees: Option<i32>,
    pub private_offices: Option<i32>,
    pub meeting_rooms: Option<i32>,
    pub workstations: Option<i32>,
    // Event
    pub event_capacity: Option<i32>,
    pub parking_spots: Option<i32>,
    pub has_stage: Option<bool>,
    pub has_sound: Option<bool>,
    pub has_projector: Option<bool>,
    pub has_catering: Option<bool>,
    pub min_booking_hours: Option<i32>,
    // Pricing
    pub base_price: Fcfa,
    pub currency: String,
    pub weekly_discount: i32,
    pub monthly_discount: i32,
    pub cleaning_fee: Fcfa,
    pub extra_guest_fee: Fcfa,
    pub security_deposit: Fcfa,
    // Rules
    pub check_in_time: String,
    pub check_out_time: String,
    pub smoking_allowed: bool,
    pub pets_allowed: bool,
    pub parties_allowed: bool,
    pub children_allowed: bool,
    // Media
    pub images: Vec<String>,
    pub primary_photo_index: i32,
    // Lifecycle
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Property {
    /// Renter-facing capacity figure for the row's category: guests for
    /// houses, employees for offices, event capacity for venues.
    pub fn capacity(&self) -> i32 {
        match self.category.as_str() {
            "HOUSE" => self.max_guests.unwrap_or(0),
            "OFFICE" => self.employees.unwrap_or(0),
            "EVENT" => self.event_capacity.unwrap_or(0),
            _ => 0,
        }
    }

    /// Cover image honoring the explicit primary index, falling back to
    /// the first image when the index is stale.
    pub fn cover_image(&self) -> Option<&str> {
        let idx = self.primary_photo_index.max(0) as usize;
        self.images
            .get(idx)
            .or_else(|| self.images.first())
            .map(String::as_str)
    }
}

/// Search row: a property plus the wifi flag computed in SQL from the
/// attached amenity names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PropertyWithWifi {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    pub has_wifi: bool,
}

/// Filters for the published-listing search. Limit and offset are expected
/// pre-clamped by the caller.
#[derive(Debug, Clone, Default)]
pub struct PropertySearchParams {
    /// Substring match against city or neighborhood.
    pub location: Option<String>,
    pub category: Option<PropertyCategory>,
    /// Minimum capacity for the row's category.
    pub min_guests: Option<i32>,
    pub limit: i64,
    pub offset: i64,
}
