//! Wire contracts for the publish protocol.
//!
//! [`PublishMetadata`] is the JSON `data` part of the multipart publish
//! request; the response envelopes are shared between `kwabo-api` (which
//! serializes them) and `kwabo-client` (which parses them).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::draft::{
    Basics, DescriptionDraft, HouseRules, ListingDraft, Location, OwnerContact, Pricing,
};
use crate::error::CoreError;
use crate::listing::{PropertyCategory, PrivacyLevel};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Request metadata
// ---------------------------------------------------------------------------

/// JSON metadata part of a publish request. Category and privacy are
/// mandatory; everything else coerces through defaults so validation can
/// report precise field errors instead of a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PublishMetadata {
    #[serde(default)]
    #[validate(nested)]
    pub owner: OwnerContact,
    pub category: PropertyCategory,
    #[serde(default)]
    pub sub_type: String,
    pub privacy: PrivacyLevel,
    #[serde(default)]
    #[validate(nested)]
    pub location: Location,
    #[serde(default)]
    #[validate(range(min = 1, message = "La superficie doit être supérieure à zéro"))]
    pub size_sqm: i32,
    #[serde(default)]
    pub floors: i32,
    #[serde(default)]
    pub basics: Basics,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    #[validate(length(min = 10, message = "Le titre doit contenir au moins 10 caractères"))]
    pub title: String,
    #[serde(default)]
    #[validate(nested)]
    pub description: DescriptionDraft,
    #[serde(default)]
    #[validate(nested)]
    pub pricing: Pricing,
    #[serde(default)]
    pub rules: HouseRules,
    #[serde(default)]
    pub primary_photo_index: usize,
}

impl ListingDraft {
    /// Freeze the draft into submission metadata. Fails when the category
    /// or privacy level was never chosen, or when the basics union does not
    /// match the chosen category.
    pub fn to_publish_metadata(&self) -> Result<PublishMetadata, CoreError> {
        let category = self.kind.category.ok_or_else(|| {
            CoreError::Validation("Le type de bien n'est pas renseigné".to_string())
        })?;
        let privacy = self.kind.privacy.ok_or_else(|| {
            CoreError::Validation("Le niveau de confidentialité n'est pas renseigné".to_string())
        })?;
        if self.basics.category() != category {
            return Err(CoreError::Validation(format!(
                "Les caractéristiques saisies ne correspondent pas au type {}",
                category.as_str()
            )));
        }
        Ok(PublishMetadata {
            owner: self.owner.clone(),
            category,
            sub_type: self.kind.sub_type.clone(),
            privacy,
            location: self.location.clone(),
            size_sqm: self.size_sqm,
            floors: self.floors,
            basics: self.basics.clone(),
            amenities: self.amenities.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            pricing: self.pricing.clone(),
            rules: self.rules.clone(),
            primary_photo_index: self.primary_photo_index(),
        })
    }
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// The published record as reported back to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedListing {
    pub id: DbId,
    pub title: String,
    pub images_count: usize,
    pub category: PropertyCategory,
    pub external_host_used: bool,
}

/// Success envelope of `POST /api/publish`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResponse {
    pub success: bool,
    pub message: String,
    pub data: PublishedListing,
}

/// Failure envelope shared by all endpoints. The quota fields are only
/// present on limit rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_reached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_limit: Option<i64>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            ..Default::default()
        }
    }

    pub fn quota(error: impl Into<String>, current: i64, max: i64) -> Self {
        Self {
            success: false,
            error: error.into(),
            limit_reached: Some(true),
            current_count: Some(current),
            max_limit: Some(max),
        }
    }
}

/// Body of `GET /api/user/listings/count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingCountResponse {
    pub success: bool,
    pub count: i64,
    pub limit: i64,
    pub can_publish: bool,
    pub remaining: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::HouseBasics;
    use validator::Validate;

    fn ready_draft() -> ListingDraft {
        let mut draft = ListingDraft::default();
        draft.owner = OwnerContact {
            name: "Ayélé Hounsou".into(),
            phone: "+22997000001".into(),
            email: "ayele@example.bj".into(),
        };
        draft.set_category(PropertyCategory::House);
        draft.kind.sub_type = "villa".into();
        draft.kind.privacy = Some(PrivacyLevel::Entire);
        draft.location.city = "Cotonou".into();
        draft.location.neighborhood = "Fidjrossè".into();
        draft.location.address = "Rue 12.080, Fidjrossè Plage".into();
        draft.size_sqm = 180;
        draft.basics = Basics::House(HouseBasics {
            max_guests: 6,
            bedrooms: 3,
            beds: 4,
            bathrooms: 2,
        });
        draft.amenities = vec!["Wi-Fi".into(), "climatisation".into()];
        draft.title = "Villa lumineuse à Fidjrossè".into();
        draft.description.summary =
            "Grande villa avec jardin à deux minutes de la plage, idéale pour les familles."
                .into();
        draft.pricing.base_price = 45_000;
        draft
    }

    #[test]
    fn to_metadata_carries_draft_fields() {
        let draft = ready_draft();
        let meta = draft.to_publish_metadata().unwrap();
        assert_eq!(meta.category, PropertyCategory::House);
        assert_eq!(meta.privacy, PrivacyLevel::Entire);
        assert_eq!(meta.title, draft.title);
        assert_eq!(meta.amenities.len(), 2);
        assert_eq!(meta.primary_photo_index, 0);
    }

    #[test]
    fn to_metadata_requires_category_and_privacy() {
        let mut draft = ready_draft();
        draft.kind.category = None;
        assert!(draft.to_publish_metadata().is_err());

        let mut draft = ready_draft();
        draft.kind.privacy = None;
        assert!(draft.to_publish_metadata().is_err());
    }

    #[test]
    fn to_metadata_rejects_mismatched_basics() {
        let mut draft = ready_draft();
        draft.basics = Basics::Office(Default::default());
        assert!(draft.to_publish_metadata().is_err());
    }

    #[test]
    fn metadata_validate_passes_for_ready_draft() {
        let meta = ready_draft().to_publish_metadata().unwrap();
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn metadata_validate_flags_short_title() {
        let mut meta = ready_draft().to_publish_metadata().unwrap();
        meta.title = "Villa".into();
        assert!(meta.validate().is_err());
    }

    #[test]
    fn metadata_parses_with_missing_optional_blocks() {
        let meta: PublishMetadata = serde_json::from_str(
            r#"{"category":"HOUSE","privacy":"ENTIRE","title":"Villa lumineuse"}"#,
        )
        .unwrap();
        assert_eq!(meta.pricing.currency, "XOF");
        assert!(meta.amenities.is_empty());
        // Shape gate still catches what the defaults left empty.
        assert!(meta.validate().is_err());
    }

    #[test]
    fn metadata_rejects_missing_category() {
        let parsed: Result<PublishMetadata, _> =
            serde_json::from_str(r#"{"privacy":"ENTIRE","title":"Villa lumineuse"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn published_listing_wire_field_names() {
        let listing = PublishedListing {
            id: 7,
            title: "Villa".into(),
            images_count: 3,
            category: PropertyCategory::House,
            external_host_used: true,
        };
        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["imagesCount"], 3);
        assert_eq!(value["externalHostUsed"], true);
        assert_eq!(value["category"], "HOUSE");
    }

    #[test]
    fn error_body_quota_fields_serialize_camel_case() {
        let body = ErrorBody::quota("Limite atteinte", 5, 5);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["limitReached"], true);
        assert_eq!(value["currentCount"], 5);
        assert_eq!(value["maxLimit"], 5);
    }

    #[test]
    fn error_body_omits_absent_quota_fields() {
        let value = serde_json::to_value(ErrorBody::new("boom")).unwrap();
        assert!(value.get("limitReached").is_none());
        assert!(value.get("currentCount").is_none());
    }

    #[test]
    fn count_response_roundtrip() {
        let json = r#"{"success":true,"count":2,"limit":5,"canPublish":true,"remaining":3}"#;
        let parsed: ListingCountResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.can_publish);
        assert_eq!(parsed.remaining, 3);
        assert!(parsed.error.is_none());
    }
}
