//! Repository for the `owners` table.

use sqlx::PgPool;

use crate::models::owner::Owner;

/// Column list for `owners` queries.
const COLUMNS: &str = "id, name, email, phone, created_at, updated_at";

/// Owner accounts, keyed by unique email (`uq_owners_email`).
pub struct OwnerRepo;

impl OwnerRepo {
    /// Find an owner by email (case-insensitive; emails are stored
    /// lowercased but stale rows may predate that rule).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Owner>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM owners WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, Owner>(&query)
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }

    /// Find the owner with this email or create one. Name and phone are
    /// refreshed on conflict so repeat publishers keep their latest contact
    /// details.
    pub async fn find_or_create(
        pool: &PgPool,
        name: &str,
        email: &str,
        phone: &str,
    ) -> Result<Owner, sqlx::Error> {
        let query = format!(
            "INSERT INTO owners (name, email, phone) \
             VALUES ($1, lower($2), $3) \
             ON CONFLICT ON CONSTRAINT uq_owners_email \
             DO UPDATE SET name = EXCLUDED.name, phone = EXCLUDED.phone, updated_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Owner>(&query)
            .bind(name.trim())
            .bind(email.trim())
            .bind(phone.trim())
            .fetch_one(pool)
            .await
    }
}
