//! Repository for the `properties` table and the two-phase publish write.
//!
//! A record is inserted unpublished with placeholder image references, so
//! media uploads can be tagged with a stable id, then finalized together
//! with its description and amenity links in one transaction. Readers only
//! ever see `is_published = true` rows, which keeps the interim window
//! invisible.

use sqlx::{Acquire, PgPool};

use kwabo_core::draft::{Basics, DescriptionDraft};
use kwabo_core::media::placeholder_refs;
use kwabo_core::publish::PublishMetadata;
use kwabo_core::types::DbId;

use crate::models::property::{Property, PropertySearchParams, PropertyWithWifi};
use crate::repositories::description_repo::DescriptionRepo;

/// Column list for `properties` queries.
const COLUMNS: &str = "\
    id, owner_id, title, category, sub_type, privacy, \
    country, city, neighborhood, address, postal_code, latitude, longitude, \
    size_sqm, floors, \
    max_guests, bedrooms, beds, bathrooms, \
    employees, private_offices, meeting_rooms, workstations, \
    event_capacity, parking_spots, has_stage, has_sound, has_projector, \
    has_catering, min_booking_hours, \
    base_price, currency, weekly_discount, monthly_discount, \
    cleaning_fee, extra_guest_fee, security_deposit, \
    check_in_time, check_out_time, smoking_allowed, pets_allowed, \
    parties_allowed, children_allowed, \
    images, primary_photo_index, is_published, created_at, updated_at";

/// Wifi flag subquery, matched on amenity names because the catalogue
/// carries French labels ("Wi-Fi (maison)") rather than a boolean column.
const HAS_WIFI_EXPR: &str = "\
    EXISTS (\
        SELECT 1 FROM property_amenities pa \
        JOIN amenities am ON am.id = pa.amenity_id \
        WHERE pa.property_id = p.id \
          AND (am.name ILIKE '%wifi%' OR am.name ILIKE '%wi-fi%')\
    ) AS has_wifi";

/// Listings, including the placeholder/finalize lifecycle of the publish
/// pipeline.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Phase one of the publish write: insert the record unpublished with
    /// one pending image marker per expected photo.
    pub async fn create_placeholder(
        pool: &PgPool,
        owner_id: DbId,
        meta: &PublishMetadata,
        expected_photos: usize,
    ) -> Result<Property, sqlx::Error> {
        let (max_guests, bedrooms, beds, bathrooms) = match &meta.basics {
            Basics::House(b) => (
                Some(b.max_guests),
                Some(b.bedrooms),
                Some(b.beds),
                Some(b.bathrooms),
            ),
            _ => (None, None, None, None),
        };
        let (employees, private_offices, meeting_rooms, workstations) = match &meta.basics {
            Basics::Office(b) => (
                Some(b.employees),
                Some(b.private_offices),
                Some(b.meeting_rooms),
                Some(b.workstations),
            ),
            _ => (None, None, None, None),
        };
        let (
            event_capacity,
            parking_spots,
            has_stage,
            has_sound,
            has_projector,
            has_catering,
            min_booking_hours,
        ) = match &meta.basics {
            Basics::Event(b) => (
                Some(b.capacity),
                Some(b.parking_spots),
                Some(b.has_stage),
                Some(b.has_sound),
                Some(b.has_projector),
                Some(b.has_catering),
                Some(b.min_booking_hours),
            ),
            _ => (None, None, None, None, None, None, None),
        };

        let images = placeholder_refs(expected_photos);

        let query = format!(
            "INSERT INTO properties (\
                owner_id, title, category, sub_type, privacy, \
                country, city, neighborhood, address, postal_code, latitude, longitude, \
                size_sqm, floors, \
                max_guests, bedrooms, beds, bathrooms, \
                employees, private_offices, meeting_rooms, workstations, \
                event_capacity, parking_spots, has_stage, has_sound, has_projector, \
                has_catering, min_booking_hours, \
                base_price, currency, weekly_discount, monthly_discount, \
                cleaning_fee, extra_guest_fee, security_deposit, \
                check_in_time, check_out_time, smoking_allowed, pets_allowed, \
                parties_allowed, children_allowed, \
                images, primary_photo_index, is_published\
             ) VALUES (\
                $1, $2, $3, $4, $5, \
                $6, $7, $8, $9, $10, $11, $12, \
                $13, $14, \
                $15, $16, $17, $18, \
                $19, $20, $21, $22, \
                $23, $24, $25, $26, $27, \
                $28, $29, \
                $30, $31, $32, $33, \
                $34, $35, $36, \
                $37, $38, $39, $40, \
                $41, $42, \
                $43, $44, false\
             ) RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Property>(&query)
            .bind(owner_id)
            .bind(meta.title.trim())
            .bind(meta.category.as_str())
            .bind(meta.sub_type.trim())
            .bind(meta.privacy.as_str())
            .bind(&meta.location.country)
            .bind(&meta.location.city)
            .bind(&meta.location.neighborhood)
            .bind(&meta.location.address)
            .bind(meta.location.postal_code.as_deref())
            .bind(meta.location.latitude)
            .bind(meta.location.longitude)
            .bind(meta.size_sqm)
            .bind(meta.floors)
            .bind(max_guests)
            .bind(bedrooms)
            .bind(beds)
            .bind(bathrooms)
            .bind(employees)
            .bind(private_offices)
            .bind(meeting_rooms)
            .bind(workstations)
            .bind(event_capacity)
            .bind(parking_spots)
            .bind(has_stage)
            .bind(has_sound)
            .bind(has_projector)
            .bind(has_catering)
            .bind(min_booking_hours)
            .bind(meta.pricing.base_price)
            .bind(&meta.pricing.currency)
            .bind(meta.pricing.weekly_discount)
            .bind(meta.pricing.monthly_discount)
            .bind(meta.pricing.cleaning_fee)
            .bind(meta.pricing.extra_guest_fee)
            .bind(meta.pricing.security_deposit)
            .bind(&meta.rules.check_in_time)
            .bind(&meta.rules.check_out_time)
            .bind(meta.rules.smoking_allowed)
            .bind(meta.rules.pets_allowed)
            .bind(meta.rules.parties_allowed)
            .bind(meta.rules.children_allowed)
            .bind(&images)
            .bind(meta.primary_photo_index.min(i32::MAX as usize) as i32)
            .fetch_one(pool)
            .await
    }

    /// Phase two of the publish write, one transaction: swap the pending
    /// markers for resolved references and flip `is_published`, attach the
    /// description (its failure is tolerated via a savepoint -- a listing
    /// without a description row is still valid), and link the resolved
    /// amenities idempotently.
    ///
    /// Returns `None` when `id` does not exist.
    pub async fn finalize_publication(
        pool: &PgPool,
        id: DbId,
        images: &[String],
        primary_index: i32,
        description: Option<&DescriptionDraft>,
        amenity_ids: &[DbId],
    ) -> Result<Option<Property>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE properties \
             SET images = $2, primary_photo_index = $3, is_published = true, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let Some(property) = sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(images)
            .bind(primary_index)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(desc) = description {
            // Savepoint: a failed description insert must not take the
            // finalized record down with it.
            let mut sp = tx.begin().await?;
            let inserted = DescriptionRepo::create(
                &mut *sp,
                id,
                desc.summary.trim(),
                non_empty(&desc.space_description),
                non_empty(&desc.guest_access),
                non_empty(&desc.neighborhood_info),
            )
            .await;
            match inserted {
                Ok(_) => sp.commit().await?,
                Err(e) => {
                    tracing::warn!(property_id = id, error = %e, "Description attach failed, listing kept");
                    sp.rollback().await?;
                }
            }
        }

        for amenity_id in amenity_ids {
            sqlx::query(
                "INSERT INTO property_amenities (property_id, amenity_id) \
                 VALUES ($1, $2) \
                 ON CONFLICT (property_id, amenity_id) DO NOTHING",
            )
            .bind(id)
            .bind(amenity_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(property))
    }

    /// Compensating cleanup for a placeholder whose finalization failed.
    /// Cascades to any attached description or amenity links.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a property by id, published or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published property by id, with the derived wifi flag.
    pub async fn find_published_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PropertyWithWifi>, sqlx::Error> {
        let query = format!(
            "SELECT {}, {HAS_WIFI_EXPR} \
             FROM properties p \
             WHERE p.id = $1 AND p.is_published = true",
            prefixed_columns()
        );
        sqlx::query_as::<_, PropertyWithWifi>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count all records held by an owner, placeholders included: an
    /// in-flight placeholder still occupies a quota slot.
    pub async fn count_by_owner(pool: &PgPool, owner_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM properties WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Search published listings with optional filters and pagination.
    pub async fn search(
        pool: &PgPool,
        params: &PropertySearchParams,
    ) -> Result<Vec<PropertyWithWifi>, sqlx::Error> {
        // Build dynamic WHERE clauses.
        let mut conditions = vec!["p.is_published = true".to_string()];
        let mut bind_idx = 1u32;

        if params.location.is_some() {
            conditions.push(format!(
                "(p.city ILIKE ${bind_idx} OR p.neighborhood ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if params.category.is_some() {
            conditions.push(format!("p.category = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.min_guests.is_some() {
            conditions.push(format!(
                "(CASE p.category \
                    WHEN 'HOUSE' THEN p.max_guests \
                    WHEN 'OFFICE' THEN p.employees \
                    WHEN 'EVENT' THEN p.event_capacity \
                 END) >= ${bind_idx}"
            ));
            bind_idx += 1;
        }

        let query = format!(
            "SELECT {columns}, {HAS_WIFI_EXPR} \
             FROM properties p \
             WHERE {where_clause} \
             ORDER BY p.created_at DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            columns = prefixed_columns(),
            where_clause = conditions.join(" AND "),
            bind_idx = bind_idx,
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, PropertyWithWifi>(&query);

        // Bind dynamic parameters in order.
        if let Some(ref location) = params.location {
            q = q.bind(kwabo_core::search::ilike_contains_pattern(location));
        }
        if let Some(category) = params.category {
            q = q.bind(category.as_str());
        }
        if let Some(min_guests) = params.min_guests {
            q = q.bind(min_guests);
        }

        q = q.bind(params.limit).bind(params.offset);
        q.fetch_all(pool).await
    }
}

/// `COLUMNS` with each column qualified by the `p.` alias the search and
/// detail queries use.
fn prefixed_columns() -> String {
    COLUMNS
        .split(", ")
        .map(|c| format!("p.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Treat empty/whitespace strings as absent for the optional description
/// columns.
fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
