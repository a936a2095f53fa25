//! Amenity catalogue model.

use serde::Serialize;
use sqlx::FromRow;

use kwabo_core::types::DbId;

/// A row from the `amenities` table: one canonical amenity the catalogue
/// knows about. Free-text owner input resolves to these rows by code, name
/// or alias.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Amenity {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
}
