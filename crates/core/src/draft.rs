//! Listing draft carried through the publication wizard.
//!
//! The draft is owned by the client, persisted between sessions and only
//! turned into a [`crate::publish::PublishMetadata`] at submission time.
//! Every struct here deserializes defensively: `#[serde(default)]` lets a
//! draft saved by an older build load with missing fields coerced to
//! harmless defaults instead of failing the restore.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::listing::{PropertyCategory, PrivacyLevel};
use crate::media::PhotoSource;
use crate::types::Fcfa;

// ---------------------------------------------------------------------------
// Draft components
// ---------------------------------------------------------------------------

/// Contact details of the would-be owner (wizard step 0).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct OwnerContact {
    #[validate(length(min = 2, message = "Le nom doit contenir au moins 2 caractères"))]
    pub name: String,
    #[validate(length(min = 8, message = "Le numéro de téléphone doit contenir au moins 8 chiffres"))]
    pub phone: String,
    pub email: String,
}

/// What kind of property is being listed (wizard step 1). Category and
/// privacy start unset; the wizard cannot pass step 1 until both are chosen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyKind {
    pub category: Option<PropertyCategory>,
    pub sub_type: String,
    pub privacy: Option<PrivacyLevel>,
}

/// Where the property is (wizard step 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    pub country: String,
    #[validate(length(min = 1, message = "La ville est requise"))]
    pub city: String,
    pub neighborhood: String,
    #[validate(length(min = 1, message = "L'adresse est requise"))]
    pub address: String,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            country: "Bénin".to_string(),
            city: String::new(),
            neighborhood: String::new(),
            address: String::new(),
            postal_code: None,
            latitude: None,
            longitude: None,
        }
    }
}

/// Category-specific capacity figures (wizard step 3), selected by the
/// chosen category. The wire form carries its own `category` tag so a
/// mismatched union never parses silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "UPPERCASE")]
pub enum Basics {
    House(HouseBasics),
    Office(OfficeBasics),
    Event(EventBasics),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HouseBasics {
    pub max_guests: i32,
    pub bedrooms: i32,
    pub beds: i32,
    pub bathrooms: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OfficeBasics {
    pub employees: i32,
    pub private_offices: i32,
    pub meeting_rooms: i32,
    pub workstations: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventBasics {
    pub capacity: i32,
    pub parking_spots: i32,
    pub has_stage: bool,
    pub has_sound: bool,
    pub has_projector: bool,
    pub has_catering: bool,
    pub min_booking_hours: i32,
}

impl Basics {
    /// Category this union variant belongs to.
    pub fn category(&self) -> PropertyCategory {
        match self {
            Self::House(_) => PropertyCategory::House,
            Self::Office(_) => PropertyCategory::Office,
            Self::Event(_) => PropertyCategory::Event,
        }
    }

    /// Zeroed basics for a category, used when the owner switches category
    /// mid-wizard.
    pub fn for_category(category: PropertyCategory) -> Self {
        match category {
            PropertyCategory::House => Self::House(HouseBasics::default()),
            PropertyCategory::Office => Self::Office(OfficeBasics::default()),
            PropertyCategory::Event => Self::Event(EventBasics::default()),
        }
    }
}

impl Default for Basics {
    fn default() -> Self {
        Self::House(HouseBasics::default())
    }
}

/// A photo slot in the draft (wizard step 5). The cover photo is the one
/// with `is_primary` set, never inferred from position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftPhoto {
    pub id: Uuid,
    pub source: PhotoSource,
    pub is_primary: bool,
}

/// Free-text description blocks (wizard step 7). Empty strings mean
/// "not provided"; only `summary` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct DescriptionDraft {
    #[validate(length(min = 50, message = "La description doit contenir au moins 50 caractères"))]
    pub summary: String,
    pub space_description: String,
    pub guest_access: String,
    pub neighborhood_info: String,
}

/// Pricing in whole CFA francs (wizard step 8). Discounts are percents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Pricing {
    #[validate(range(min = 1, message = "Le prix par nuit doit être supérieur à zéro"))]
    pub base_price: Fcfa,
    pub currency: String,
    #[validate(range(min = 0, max = 100))]
    pub weekly_discount: i32,
    #[validate(range(min = 0, max = 100))]
    pub monthly_discount: i32,
    pub cleaning_fee: Fcfa,
    pub extra_guest_fee: Fcfa,
    pub security_deposit: Fcfa,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            base_price: 0,
            currency: "XOF".to_string(),
            weekly_discount: 0,
            monthly_discount: 0,
            cleaning_fee: 0,
            extra_guest_fee: 0,
            security_deposit: 0,
        }
    }
}

/// House rules shown on the listing page. Not gated by any step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HouseRules {
    pub check_in_time: String,
    pub check_out_time: String,
    pub smoking_allowed: bool,
    pub pets_allowed: bool,
    pub parties_allowed: bool,
    pub children_allowed: bool,
}

impl Default for HouseRules {
    fn default() -> Self {
        Self {
            check_in_time: "14:00".to_string(),
            check_out_time: "11:00".to_string(),
            smoking_allowed: false,
            pets_allowed: false,
            parties_allowed: false,
            children_allowed: true,
        }
    }
}

/// The two review-step affirmations (wizard step 9).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Confirmation {
    pub terms_accepted: bool,
    pub info_certified: bool,
}

// ---------------------------------------------------------------------------
// The draft itself
// ---------------------------------------------------------------------------

/// Full wizard state for one in-progress listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingDraft {
    pub owner: OwnerContact,
    pub kind: PropertyKind,
    pub location: Location,
    pub size_sqm: i32,
    pub floors: i32,
    pub basics: Basics,
    pub amenities: Vec<String>,
    pub photos: Vec<DraftPhoto>,
    pub title: String,
    pub description: DescriptionDraft,
    pub pricing: Pricing,
    pub rules: HouseRules,
    pub confirmation: Confirmation,
}

impl ListingDraft {
    /// Set the category, resetting the basics union when the variant no
    /// longer matches. Re-selecting the same category keeps entered values.
    pub fn set_category(&mut self, category: PropertyCategory) {
        self.kind.category = Some(category);
        if self.basics.category() != category {
            self.basics = Basics::for_category(category);
        }
    }

    /// Index of the cover photo. Falls back to 0 when no flag is set.
    pub fn primary_photo_index(&self) -> usize {
        self.photos
            .iter()
            .position(|p| p.is_primary)
            .unwrap_or(0)
    }

    /// Make the photo with `id` the cover, clearing the flag everywhere
    /// else. Returns false if no photo has that id.
    pub fn mark_primary(&mut self, id: Uuid) -> bool {
        if !self.photos.iter().any(|p| p.id == id) {
            return false;
        }
        for photo in &mut self.photos {
            photo.is_primary = photo.id == id;
        }
        true
    }

    /// Restore the single-cover invariant after adds and removals: first
    /// photo becomes the cover when no flag survives.
    pub fn ensure_primary_flag(&mut self) {
        if self.photos.is_empty() {
            return;
        }
        let flagged = self.photos.iter().filter(|p| p.is_primary).count();
        if flagged != 1 {
            let keep = self.photos.iter().position(|p| p.is_primary).unwrap_or(0);
            for (i, photo) in self.photos.iter_mut().enumerate() {
                photo.is_primary = i == keep;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
