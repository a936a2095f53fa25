//! Repository for the `descriptions` table.

use sqlx::PgPool;

use kwabo_core::types::DbId;

use crate::models::description::Description;

/// Column list for `descriptions` queries.
const COLUMNS: &str = "id, property_id, summary, space_description, \
     guest_access, neighborhood_info, created_at";

/// Zero-or-one description per property.
pub struct DescriptionRepo;

impl DescriptionRepo {
    /// Attach a description to a property. Generic over the executor so it
    /// can run inside the finalization transaction. Fails on a second
    /// insert for the same property (unique `property_id`).
    pub async fn create<'e, E>(
        executor: E,
        property_id: DbId,
        summary: &str,
        space_description: Option<&str>,
        guest_access: Option<&str>,
        neighborhood_info: Option<&str>,
    ) -> Result<Description, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let query = format!(
            "INSERT INTO descriptions \
                (property_id, summary, space_description, guest_access, neighborhood_info) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Description>(&query)
            .bind(property_id)
            .bind(summary)
            .bind(space_description)
            .bind(guest_access)
            .bind(neighborhood_info)
            .fetch_one(executor)
            .await
    }

    /// Find the description for a property, if one was attached.
    pub async fn find_for_property(
        pool: &PgPool,
        property_id: DbId,
    ) -> Result<Option<Description>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM descriptions WHERE property_id = $1");
        sqlx::query_as::<_, Description>(&query)
            .bind(property_id)
            .fetch_optional(pool)
            .await
    }
}
