//! Publication wizard steps and validation.
//!
//! Ten 0-indexed steps take an owner from contact details to the review
//! screen. All predicates are pure functions over [`ListingDraft`]; the
//! interactive controller in `kwabo-client` and the publish endpoint in
//! `kwabo-api` both validate through this module so the two sides can
//! never disagree on what a complete listing is.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::draft::{Basics, ListingDraft, Location, OwnerContact, Pricing};
use crate::error::CoreError;
use crate::listing::PropertyCategory;
use crate::publish::PublishMetadata;

// ---------------------------------------------------------------------------
// Wizard steps
// ---------------------------------------------------------------------------

/// The ten steps of the publication wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Contact,
    Kind,
    Location,
    Basics,
    Amenities,
    Photos,
    Title,
    Description,
    Pricing,
    Review,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 10;

/// First step index (0-based).
pub const MIN_STEP: u8 = 0;

/// Last step index (0-based).
pub const MAX_STEP: u8 = 9;

impl WizardStep {
    pub const ALL: [WizardStep; 10] = [
        Self::Contact,
        Self::Kind,
        Self::Location,
        Self::Basics,
        Self::Amenities,
        Self::Photos,
        Self::Title,
        Self::Description,
        Self::Pricing,
        Self::Review,
    ];

    /// Convert a 0-based step index to a `WizardStep`.
    pub fn from_index(n: u8) -> Result<Self, CoreError> {
        match n {
            0 => Ok(Self::Contact),
            1 => Ok(Self::Kind),
            2 => Ok(Self::Location),
            3 => Ok(Self::Basics),
            4 => Ok(Self::Amenities),
            5 => Ok(Self::Photos),
            6 => Ok(Self::Title),
            7 => Ok(Self::Description),
            8 => Ok(Self::Pricing),
            9 => Ok(Self::Review),
            _ => Err(CoreError::Validation(format!(
                "Invalid step index {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 0-based step index.
    pub fn index(self) -> u8 {
        match self {
            Self::Contact => 0,
            Self::Kind => 1,
            Self::Location => 2,
            Self::Basics => 3,
            Self::Amenities => 4,
            Self::Photos => 5,
            Self::Title => 6,
            Self::Description => 7,
            Self::Pricing => 8,
            Self::Review => 9,
        }
    }

    /// Wizard header label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::Contact => "Contact",
            Self::Kind => "Type de bien",
            Self::Location => "Localisation",
            Self::Basics => "Caractéristiques",
            Self::Amenities => "Équipements",
            Self::Photos => "Photos",
            Self::Title => "Titre",
            Self::Description => "Description",
            Self::Pricing => "Tarification",
            Self::Review => "Récapitulatif",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation floors
// ---------------------------------------------------------------------------

/// Minimum phone number length (step 0).
pub const MIN_PHONE_LEN: usize = 8;

/// Minimum owner name length (step 0).
pub const MIN_NAME_LEN: usize = 2;

/// Minimum photo count to pass the photo step (step 5).
pub const MIN_PHOTOS: usize = 3;

/// Minimum title length in characters (step 6).
pub const MIN_TITLE_LEN: usize = 10;

/// Minimum description summary length in characters (step 7).
pub const MIN_SUMMARY_LEN: usize = 50;

/// Cheap structural email check: one `@` plus a dot somewhere. Deliverability
/// is proven later by actually contacting the owner, not here.
pub fn email_looks_valid(email: &str) -> bool {
    let e = email.trim();
    e.contains('@') && e.contains('.')
}

/// Trimmed length in characters, not bytes. Titles and descriptions are
/// French text, so byte length would overcount accented letters.
fn char_len(s: &str) -> usize {
    s.trim().chars().count()
}

// ---------------------------------------------------------------------------
// Step predicates
// ---------------------------------------------------------------------------

fn check_contact(owner: &OwnerContact) -> Result<(), CoreError> {
    if char_len(&owner.phone) < MIN_PHONE_LEN {
        return Err(CoreError::Validation(format!(
            "Le numéro de téléphone doit contenir au moins {MIN_PHONE_LEN} caractères"
        )));
    }
    if !email_looks_valid(&owner.email) {
        return Err(CoreError::Validation(
            "Adresse e-mail invalide".to_string(),
        ));
    }
    if char_len(&owner.name) < MIN_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Le nom doit contenir au moins {MIN_NAME_LEN} caractères"
        )));
    }
    Ok(())
}

fn check_location(location: &Location) -> Result<(), CoreError> {
    if location.city.trim().is_empty() {
        return Err(CoreError::Validation("La ville est requise".to_string()));
    }
    if location.address.trim().is_empty() {
        return Err(CoreError::Validation("L'adresse est requise".to_string()));
    }
    Ok(())
}

fn check_basics(
    category: PropertyCategory,
    basics: &Basics,
    size_sqm: i32,
) -> Result<(), CoreError> {
    if basics.category() != category {
        return Err(CoreError::Validation(
            "Les caractéristiques saisies ne correspondent pas au type de bien".to_string(),
        ));
    }
    if size_sqm <= 0 {
        return Err(CoreError::Validation(
            "La superficie doit être supérieure à zéro".to_string(),
        ));
    }
    match basics {
        Basics::House(b) => {
            if b.max_guests <= 0 {
                return Err(CoreError::Validation(
                    "Indiquez le nombre de voyageurs".to_string(),
                ));
            }
            if b.beds <= 0 {
                return Err(CoreError::Validation(
                    "Indiquez le nombre de lits".to_string(),
                ));
            }
        }
        Basics::Office(b) => {
            if b.employees <= 0 {
                return Err(CoreError::Validation(
                    "Indiquez la capacité en employés".to_string(),
                ));
            }
        }
        Basics::Event(b) => {
            if b.capacity <= 0 {
                return Err(CoreError::Validation(
                    "Indiquez la capacité d'accueil".to_string(),
                ));
            }
        }
    }
    Ok(())
}

fn check_title(title: &str) -> Result<(), CoreError> {
    if char_len(title) < MIN_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Le titre doit contenir au moins {MIN_TITLE_LEN} caractères"
        )));
    }
    Ok(())
}

fn check_summary(summary: &str) -> Result<(), CoreError> {
    if char_len(summary) < MIN_SUMMARY_LEN {
        return Err(CoreError::Validation(format!(
            "La description doit contenir au moins {MIN_SUMMARY_LEN} caractères"
        )));
    }
    Ok(())
}

fn check_pricing(pricing: &Pricing) -> Result<(), CoreError> {
    if pricing.base_price <= 0 {
        return Err(CoreError::Validation(
            "Le prix par nuit doit être supérieur à zéro".to_string(),
        ));
    }
    Ok(())
}

/// Validate the draft against one step's entry requirements.
///
/// The review step is the conjunction of every earlier step plus the two
/// affirmations; its error is the first failing step's message so the
/// caller can point the owner at the right screen.
pub fn validate_step(step: WizardStep, draft: &ListingDraft) -> Result<(), CoreError> {
    match step {
        WizardStep::Contact => check_contact(&draft.owner),
        WizardStep::Kind => {
            if draft.kind.category.is_none() {
                return Err(CoreError::Validation(
                    "Choisissez un type de bien".to_string(),
                ));
            }
            if draft.kind.sub_type.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Précisez le sous-type de bien".to_string(),
                ));
            }
            if draft.kind.privacy.is_none() {
                return Err(CoreError::Validation(
                    "Choisissez un niveau de confidentialité".to_string(),
                ));
            }
            Ok(())
        }
        WizardStep::Location => check_location(&draft.location),
        WizardStep::Basics => {
            let Some(category) = draft.kind.category else {
                return Err(CoreError::Validation(
                    "Choisissez d'abord un type de bien".to_string(),
                ));
            };
            check_basics(category, &draft.basics, draft.size_sqm)
        }
        WizardStep::Amenities => {
            if draft.amenities.is_empty() {
                return Err(CoreError::Validation(
                    "Sélectionnez au moins un équipement".to_string(),
                ));
            }
            Ok(())
        }
        WizardStep::Photos => {
            if draft.photos.len() < MIN_PHOTOS {
                return Err(CoreError::Validation(format!(
                    "Ajoutez au moins {MIN_PHOTOS} photos"
                )));
            }
            Ok(())
        }
        WizardStep::Title => check_title(&draft.title),
        WizardStep::Description => check_summary(&draft.description.summary),
        WizardStep::Pricing => check_pricing(&draft.pricing),
        WizardStep::Review => {
            for earlier in &WizardStep::ALL[..MAX_STEP as usize] {
                validate_step(*earlier, draft)?;
            }
            if !draft.confirmation.terms_accepted {
                return Err(CoreError::Validation(
                    "Vous devez accepter les conditions d'utilisation".to_string(),
                ));
            }
            if !draft.confirmation.info_certified {
                return Err(CoreError::Validation(
                    "Vous devez certifier l'exactitude des informations".to_string(),
                ));
            }
            Ok(())
        }
    }
}

/// Boolean form of [`validate_step`].
pub fn is_step_valid(step: WizardStep, draft: &ListingDraft) -> bool {
    validate_step(step, draft).is_ok()
}

/// Validate a step transition.
///
/// A transition is valid if the next step is exactly one step forward or
/// one step backward. Jumping further is only possible through the review
/// screen's explicit edit links, which bypass this check by design.
pub fn validate_step_transition(current: u8, next: u8) -> Result<(), CoreError> {
    if current > MAX_STEP {
        return Err(CoreError::Validation(format!(
            "Current step {current} is out of range ({MIN_STEP}..{MAX_STEP})"
        )));
    }
    if next > MAX_STEP {
        return Err(CoreError::Validation(format!(
            "Next step {next} is out of range ({MIN_STEP}..{MAX_STEP})"
        )));
    }

    let diff = (next as i16) - (current as i16);
    if diff != 1 && diff != -1 {
        return Err(CoreError::Validation(format!(
            "Cannot transition from step {current} to step {next}. \
             Must advance or go back exactly one step."
        )));
    }

    Ok(())
}

/// Bound a persisted step index into the valid range. Restores from drafts
/// saved by other builds must never land outside the wizard.
pub fn clamp_step(step: u8) -> u8 {
    step.min(MAX_STEP)
}

/// Server-side gate over submitted metadata: the same predicates as steps
/// 0 through 8, minus the photo floor (the endpoint accepts any photo
/// count; placeholder handling covers zero) and minus the review
/// affirmations, which never travel over the wire.
pub fn validate_publish_metadata(meta: &PublishMetadata) -> Result<(), CoreError> {
    check_contact(&meta.owner)?;
    if meta.sub_type.trim().is_empty() {
        return Err(CoreError::Validation(
            "Précisez le sous-type de bien".to_string(),
        ));
    }
    check_location(&meta.location)?;
    check_basics(meta.category, &meta.basics, meta.size_sqm)?;
    if meta.amenities.is_empty() {
        return Err(CoreError::Validation(
            "Sélectionnez au moins un équipement".to_string(),
        ));
    }
    check_title(&meta.title)?;
    check_summary(&meta.description.summary)?;
    check_pricing(&meta.pricing)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Error notification dedup
// ---------------------------------------------------------------------------

/// Suppression window for repeated step-validation error toasts.
pub const ERROR_DEDUP_WINDOW: Duration = Duration::from_millis(4500);

/// Deduplicates validation error toasts: a blocked advance on the same step
/// stays silent while the previous toast is still on screen. A different
/// step, or the same step after the window, notifies again.
#[derive(Debug, Default)]
pub struct ErrorNotifier {
    last: Option<(u8, Instant)>,
}

impl ErrorNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an error for `step` should be surfaced now. Records the
    /// notification when it answers true.
    pub fn should_notify(&mut self, step: u8) -> bool {
        self.should_notify_at(step, Instant::now())
    }

    /// Clock-injectable form of [`Self::should_notify`].
    pub fn should_notify_at(&mut self, step: u8, now: Instant) -> bool {
        let suppressed = self
            .last
            .is_some_and(|(s, at)| s == step && now.duration_since(at) < ERROR_DEDUP_WINDOW);
        if suppressed {
            return false;
        }
        self.last = Some((step, now));
        true
    }

    /// Forget the last notification (used when the owner leaves the step).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
