//! Owner account model.

use serde::Serialize;
use sqlx::FromRow;

use kwabo_core::types::{DbId, Timestamp};

/// A row from the `owners` table. Emails are stored lowercased; the unique
/// constraint `uq_owners_email` keys the find-or-create upsert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Owner {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
