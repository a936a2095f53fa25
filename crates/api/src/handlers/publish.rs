//! `POST /api/publish`: the two-phase listing publication write.
//!
//! The request is one multipart form: a JSON `data` field carrying
//! [`PublishMetadata`] plus repeated `photos` fields that are either binary
//! files or URL strings. The pipeline is: validate, advisory quota check,
//! placeholder insert, per-photo media resolution with inline fallback,
//! then finalize + description + amenity links in one transaction. Any
//! failure after the placeholder exists deletes it again (compensating
//! cleanup), so a failed publish leaves no half-created record behind.

use axum::extract::{Multipart, State};
use axum::Json;
use validator::Validate;

use kwabo_core::media::{
    self, dedup_preserving_order, encode_data_url, is_remote_url, parse_data_url,
    placeholder_refs, sniff_image_mime,
};
use kwabo_core::publish::{PublishMetadata, PublishResponse, PublishedListing};
use kwabo_core::types::DbId;
use kwabo_core::wizard::validate_publish_metadata;
use kwabo_core::{quota, CoreError};

use kwabo_db::repositories::{AmenityRepo, OwnerRepo, PropertyRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying the JSON metadata.
const DATA_FIELD: &str = "data";

/// Multipart field shared by all media parts.
const PHOTOS_FIELD: &str = "photos";

/// One submitted media part, in original request order.
enum MediaPart {
    /// Raw photo bytes with the content type the client declared.
    Bytes {
        bytes: Vec<u8>,
        content_type: Option<String>,
    },
    /// A string part: an already-hosted URL or an inline data URL.
    Text(String),
}

pub async fn publish_listing(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<PublishResponse>> {
    let (meta, parts) = parse_request(multipart).await?;

    // Shape gate first, then the shared wizard predicates. Both map to 400.
    if let Err(e) = meta.validate() {
        return Err(AppError::Core(CoreError::Validation(first_message(&e))));
    }
    validate_publish_metadata(&meta).map_err(AppError::Core)?;

    // Advisory quota check: owner read only, never created here. A failure
    // of the check itself must not block publication.
    let max = state.config.max_listings_per_owner;
    match advisory_count(&state, &meta.owner.email).await {
        Ok(Some(current)) => quota::check_quota(current, max).map_err(AppError::Core)?,
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Quota pre-check failed, continuing with publication");
        }
    }

    // Phase one: owner upsert + placeholder insert. A unique-email race
    // surfaces as 409 through the sqlx classifier.
    let owner = OwnerRepo::find_or_create(
        &state.pool,
        &meta.owner.name,
        &meta.owner.email,
        &meta.owner.phone,
    )
    .await?;
    let placeholder = PropertyRepo::create_placeholder(&state.pool, owner.id, &meta, parts.len())
        .await?;
    tracing::info!(
        property_id = placeholder.id,
        owner_id = owner.id,
        photos = parts.len(),
        "Placeholder record created"
    );

    // Phases two and three run under compensation: on any failure the
    // placeholder is deleted and the error propagates.
    match resolve_and_finalize(&state, placeholder.id, &meta, parts).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            match PropertyRepo::delete(&state.pool, placeholder.id).await {
                Ok(_) => {
                    tracing::warn!(property_id = placeholder.id, "Placeholder deleted after failed publish")
                }
                Err(cleanup) => tracing::error!(
                    property_id = placeholder.id,
                    error = %cleanup,
                    "Compensating cleanup failed, orphan placeholder left unpublished"
                ),
            }
            Err(e)
        }
    }
}

/// Pull the metadata and media parts out of the multipart body.
async fn parse_request(
    mut multipart: Multipart,
) -> AppResult<(PublishMetadata, Vec<MediaPart>)> {
    let mut meta: Option<PublishMetadata> = None;
    let mut parts: Vec<MediaPart> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some(DATA_FIELD) => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                meta = Some(serde_json::from_str(&raw).map_err(|e| {
                    AppError::BadRequest(format!("Invalid publish metadata: {e}"))
                })?);
            }
            Some(PHOTOS_FIELD) => {
                // A filename marks a binary upload; bare strings are URLs.
                if field.file_name().is_some() {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    parts.push(MediaPart::Bytes {
                        bytes: bytes.to_vec(),
                        content_type,
                    });
                } else {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    parts.push(MediaPart::Text(text));
                }
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown multipart field");
            }
        }
    }

    let meta = meta.ok_or_else(|| {
        AppError::BadRequest(format!("Missing '{DATA_FIELD}' field in multipart body"))
    })?;
    Ok((meta, parts))
}

/// Owner listing count for the advisory pre-check. `None` when the owner
/// does not exist yet.
async fn advisory_count(state: &AppState, email: &str) -> Result<Option<i64>, sqlx::Error> {
    let Some(owner) = OwnerRepo::find_by_email(&state.pool, email).await? else {
        return Ok(None);
    };
    PropertyRepo::count_by_owner(&state.pool, owner.id)
        .await
        .map(Some)
}

/// Resolve every media part, then finalize the record with its description
/// and amenity links.
async fn resolve_and_finalize(
    state: &AppState,
    property_id: DbId,
    meta: &PublishMetadata,
    parts: Vec<MediaPart>,
) -> AppResult<PublishResponse> {
    let expected = parts.len();
    let (mut images, external_host_used) = resolve_media(state, property_id, parts).await;

    if images.len() < expected {
        tracing::warn!(
            property_id,
            expected,
            resolved = images.len(),
            "Some photos failed media resolution"
        );
    }
    let (deduped, dropped) = dedup_preserving_order(images);
    if dropped > 0 {
        tracing::warn!(property_id, dropped, "Duplicate photo references submitted");
    }
    images = deduped;
    let images_count = images.len();
    if images.is_empty() {
        // Zero surviving photos: keep the generic pending marker so the
        // record still has a displayable slot.
        images = placeholder_refs(0);
    }

    let amenity_ids = resolve_amenities(state, property_id, &meta.amenities).await?;

    let primary_index = meta.primary_photo_index.min(images.len().saturating_sub(1)) as i32;
    let description = (!meta.description.summary.trim().is_empty()).then_some(&meta.description);

    let property = PropertyRepo::finalize_publication(
        &state.pool,
        property_id,
        &images,
        primary_index,
        description,
        &amenity_ids,
    )
    .await?
    .ok_or_else(|| AppError::InternalError("Placeholder vanished before finalization".into()))?;

    tracing::info!(
        property_id = property.id,
        images = images_count,
        amenities = amenity_ids.len(),
        external_host_used,
        "Listing published"
    );

    Ok(PublishResponse {
        success: true,
        message: "Annonce publiée avec succès".into(),
        data: PublishedListing {
            id: property.id,
            title: property.title,
            images_count,
            category: meta.category,
            external_host_used,
        },
    })
}

/// Run every media part through the resolution chain, in parallel, keeping
/// original order. Individual failures drop the slot, never the request.
/// Returns the surviving references and whether the external host stored at
/// least one of them.
async fn resolve_media(
    state: &AppState,
    property_id: DbId,
    parts: Vec<MediaPart>,
) -> (Vec<String>, bool) {
    let resolutions = parts
        .into_iter()
        .enumerate()
        .map(|(index, part)| resolve_one(state, property_id, index, part));
    let resolved = futures::future::join_all(resolutions).await;

    let mut external_host_used = false;
    let mut images = Vec::new();
    for (url, uploaded) in resolved.into_iter().flatten() {
        external_host_used |= uploaded;
        images.push(url);
    }
    (images, external_host_used)
}

/// Resolve one media part to a stable reference. The bool is true when the
/// external host stored the bytes.
async fn resolve_one(
    state: &AppState,
    property_id: DbId,
    index: usize,
    part: MediaPart,
) -> Option<(String, bool)> {
    match part {
        MediaPart::Text(text) => {
            let trimmed = text.trim();
            if is_remote_url(trimmed) {
                // Already hosted, keep verbatim.
                return Some((trimmed.to_string(), false));
            }
            if trimmed.starts_with("data:") {
                match parse_data_url(trimmed) {
                    Ok(decoded) => {
                        return Some(
                            upload_with_fallback(state, property_id, index, &decoded.bytes, &decoded.mime)
                                .await,
                        );
                    }
                    Err(e) => {
                        tracing::warn!(property_id, index, error = %e, "Dropping undecodable data URL");
                        return None;
                    }
                }
            }
            if media::is_placeholder_ref(trimmed) {
                // A pending marker echoed back by a retry; nothing to store.
                tracing::warn!(property_id, index, "Dropping pending placeholder reference");
                return None;
            }
            tracing::warn!(property_id, index, "Dropping photo reference with unknown scheme");
            None
        }
        MediaPart::Bytes { bytes, content_type } => {
            if bytes.is_empty() {
                tracing::warn!(property_id, index, "Dropping empty photo upload");
                return None;
            }
            let mime = sniff_image_mime(&bytes)
                .map(str::to_string)
                .or(content_type)
                .unwrap_or_else(|| "application/octet-stream".to_string());
            Some(upload_with_fallback(state, property_id, index, &bytes, &mime).await)
        }
    }
}

/// Upload bytes to the external host, degrading to inline data-URL storage
/// when the host is unavailable or misconfigured.
async fn upload_with_fallback(
    state: &AppState,
    property_id: DbId,
    index: usize,
    bytes: &[u8],
    mime: &str,
) -> (String, bool) {
    match state.image_host.upload(property_id, index, bytes, mime).await {
        Ok(url) => (url, true),
        Err(e) => {
            tracing::warn!(
                property_id,
                index,
                error = %e,
                "Image host upload failed, storing photo inline"
            );
            (encode_data_url(mime, bytes), false)
        }
    }
}

/// Resolve free-text amenity labels to catalogue ids: code, then name, then
/// alias table. Unresolvable labels are logged and skipped.
async fn resolve_amenities(
    state: &AppState,
    property_id: DbId,
    labels: &[String],
) -> Result<Vec<DbId>, sqlx::Error> {
    let mut ids = Vec::with_capacity(labels.len());
    for label in labels {
        match AmenityRepo::resolve(&state.pool, label).await? {
            Some(amenity) => {
                if !ids.contains(&amenity.id) {
                    ids.push(amenity.id);
                }
            }
            None => {
                tracing::info!(property_id, label = %label, "Amenity label resolved nowhere, skipped");
            }
        }
    }
    Ok(ids)
}

/// Flatten a `validator` report (nested structs included) into its first
/// human-readable message.
fn first_message(errors: &validator::ValidationErrors) -> String {
    fn walk(errors: &validator::ValidationErrors) -> Option<String> {
        for kind in errors.errors().values() {
            match kind {
                validator::ValidationErrorsKind::Field(errs) => {
                    if let Some(msg) = errs.iter().find_map(|e| e.message.as_ref()) {
                        return Some(msg.to_string());
                    }
                }
                validator::ValidationErrorsKind::Struct(nested) => {
                    if let Some(msg) = walk(nested) {
                        return Some(msg);
                    }
                }
                validator::ValidationErrorsKind::List(map) => {
                    for nested in map.values() {
                        if let Some(msg) = walk(nested) {
                            return Some(msg);
                        }
                    }
                }
            }
        }
        None
    }
    walk(errors).unwrap_or_else(|| "Données de publication invalides".to_string())
}
