//! Listing description model.

use serde::Serialize;
use sqlx::FromRow;

use kwabo_core::types::{DbId, Timestamp};

/// A row from the `descriptions` table. At most one per property
/// (`uq_descriptions_property`); listings without one are still valid.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Description {
    pub id: DbId,
    pub property_id: DbId,
    pub summary: String,
    pub space_description: Option<String>,
    pub guest_access: Option<String>,
    pub neighborhood_info: Option<String>,
    pub created_at: Timestamp,
}
