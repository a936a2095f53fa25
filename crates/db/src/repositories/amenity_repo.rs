//! Repository for the amenity catalogue and property-amenity links.

use sqlx::PgPool;

use kwabo_core::amenity;
use kwabo_core::types::DbId;

use crate::models::amenity::Amenity;

/// Column list for `amenities` queries.
const COLUMNS: &str = "id, code, name, category";

/// The canonical amenity catalogue.
pub struct AmenityRepo;

impl AmenityRepo {
    /// Find an amenity by exact code, case-insensitively.
    pub async fn find_by_code_ci(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Amenity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM amenities WHERE lower(code) = lower($1)");
        sqlx::query_as::<_, Amenity>(&query)
            .bind(code.trim())
            .fetch_optional(pool)
            .await
    }

    /// Find an amenity by exact name, case-insensitively.
    pub async fn find_by_name_ci(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Amenity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM amenities WHERE lower(name) = lower($1)");
        sqlx::query_as::<_, Amenity>(&query)
            .bind(name.trim())
            .fetch_optional(pool)
            .await
    }

    /// Resolve free-text owner input to a catalogue row: exact code match,
    /// then exact name match, then the static alias table. `None` means the
    /// label resolves nowhere and should be skipped.
    pub async fn resolve(pool: &PgPool, label: &str) -> Result<Option<Amenity>, sqlx::Error> {
        if let Some(found) = Self::find_by_code_ci(pool, label).await? {
            return Ok(Some(found));
        }
        if let Some(found) = Self::find_by_name_ci(pool, label).await? {
            return Ok(Some(found));
        }
        if let Some(alias_code) = amenity::alias_code(label) {
            return Self::find_by_code_ci(pool, alias_code).await;
        }
        Ok(None)
    }

    /// Link an amenity to a property. Idempotent: linking an already-linked
    /// pair is a no-op and reports `false`.
    pub async fn attach(
        pool: &PgPool,
        property_id: DbId,
        amenity_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO property_amenities (property_id, amenity_id) \
             VALUES ($1, $2) \
             ON CONFLICT (property_id, amenity_id) DO NOTHING",
        )
        .bind(property_id)
        .bind(amenity_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the amenities linked to a property, ordered by name.
    pub async fn list_for_property(
        pool: &PgPool,
        property_id: DbId,
    ) -> Result<Vec<Amenity>, sqlx::Error> {
        sqlx::query_as::<_, Amenity>(
            "SELECT a.id, a.code, a.name, a.category \
             FROM amenities a \
             JOIN property_amenities pa ON pa.amenity_id = a.id \
             WHERE pa.property_id = $1 \
             ORDER BY a.name",
        )
            .bind(property_id)
            .fetch_all(pool)
            .await
    }

    /// Count link rows for a (property, amenity) pair. Test hook for the
    /// idempotent-attach guarantee.
    pub async fn count_links(
        pool: &PgPool,
        property_id: DbId,
        amenity_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM property_amenities \
             WHERE property_id = $1 AND amenity_id = $2",
        )
        .bind(property_id)
        .bind(amenity_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
