//! The wizard controller: one in-progress draft, its current step and the
//! session photo cache.
//!
//! Every mutation persists through the injected [`DraftStore`], so the
//! wizard can be killed at any point and resume. Step movement is gated
//! by the shared predicates in `kwabo_core::wizard`; a blocked advance
//! surfaces its message at most once per dedup window.

use std::time::{Duration, Instant};

use uuid::Uuid;

use kwabo_core::draft::{DraftPhoto, ListingDraft};
use kwabo_core::error::CoreError;
use kwabo_core::media::PhotoSource;
use kwabo_core::publish::PublishedListing;
use kwabo_core::wizard::{validate_step, ErrorNotifier, WizardStep, MAX_STEP};

use crate::session::SessionMediaCache;
use crate::store::DraftStore;
use crate::submit::{PublishSubmitter, SubmitError};

/// Minimum delay between two successful advances. Absorbs double-taps on
/// the "next" control.
pub const ADVANCE_DEBOUNCE: Duration = Duration::from_millis(300);

/// Why an advance did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceBlock {
    /// A successful advance happened too recently.
    Debounced,
    /// Already on the review step; the only way forward is `submit`.
    AtReview,
    /// The current step's requirements are not met. `notify` is false when
    /// the same message was already surfaced within the dedup window.
    Invalid { message: String, notify: bool },
}

/// Result of stepping backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    MovedTo(u8),
    /// Backed out of step 0; the caller leaves the wizard (draft kept).
    Exited,
}

/// One owner's trip through the publication wizard.
pub struct PublishFlow<S: DraftStore> {
    store: S,
    draft: ListingDraft,
    step: u8,
    session: SessionMediaCache,
    notifier: ErrorNotifier,
    last_advance: Option<Instant>,
    restore_notice: bool,
    submitting: bool,
}

impl<S: DraftStore> PublishFlow<S> {
    /// Mount the wizard, restoring any stored draft. Session photo
    /// references in a restored draft are stale by construction; the
    /// submitter drops them.
    pub fn new(store: S) -> Self {
        let mut flow = Self {
            store,
            draft: ListingDraft::default(),
            step: 0,
            session: SessionMediaCache::new(),
            notifier: ErrorNotifier::new(),
            last_advance: None,
            restore_notice: false,
            submitting: false,
        };
        match flow.store.load() {
            Ok(Some((draft, step))) => {
                tracing::info!(step, "Restored in-progress draft");
                flow.draft = draft;
                flow.step = step;
                flow.restore_notice = true;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Draft restore failed, starting fresh");
            }
        }
        flow
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn current_step(&self) -> WizardStep {
        // The step is bounded on every path that sets it.
        WizardStep::from_index(self.step).unwrap_or(WizardStep::Review)
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    pub fn session(&self) -> &SessionMediaCache {
        &self.session
    }

    /// One-shot "draft restored" notice for the UI.
    pub fn take_restore_notice(&mut self) -> bool {
        std::mem::take(&mut self.restore_notice)
    }

    /// Mutate the draft and persist. The single-cover invariant is
    /// restored after the mutation.
    pub fn update(&mut self, f: impl FnOnce(&mut ListingDraft)) {
        f(&mut self.draft);
        self.draft.ensure_primary_flag();
        self.persist();
    }

    /// Cache picked photo bytes for this session and add the photo to the
    /// draft. Returns the new photo's id.
    pub fn attach_photo_bytes(&mut self, bytes: Vec<u8>, mime: &str) -> Uuid {
        let reference = self.session.insert(bytes, mime);
        let id = Uuid::new_v4();
        self.draft.photos.push(DraftPhoto {
            id,
            source: PhotoSource::Session(reference),
            is_primary: false,
        });
        self.draft.ensure_primary_flag();
        self.persist();
        id
    }

    /// Try to advance one step.
    pub fn try_next(&mut self) -> Result<u8, AdvanceBlock> {
        self.try_next_at(Instant::now())
    }

    /// Clock-injectable form of [`Self::try_next`].
    pub fn try_next_at(&mut self, now: Instant) -> Result<u8, AdvanceBlock> {
        if let Some(at) = self.last_advance {
            if now.duration_since(at) < ADVANCE_DEBOUNCE {
                return Err(AdvanceBlock::Debounced);
            }
        }
        if self.step >= MAX_STEP {
            return Err(AdvanceBlock::AtReview);
        }
        if let Err(e) = validate_step(self.current_step(), &self.draft) {
            let message = match e {
                CoreError::Validation(msg) => msg,
                other => other.to_string(),
            };
            let notify = self.notifier.should_notify_at(self.step, now);
            return Err(AdvanceBlock::Invalid { message, notify });
        }

        self.step += 1;
        self.last_advance = Some(now);
        self.notifier.reset();
        self.persist();
        Ok(self.step)
    }

    /// Step back. Never validates; entered data stays in the draft.
    pub fn back(&mut self) -> BackOutcome {
        if self.step == 0 {
            return BackOutcome::Exited;
        }
        self.step -= 1;
        self.notifier.reset();
        self.persist();
        BackOutcome::MovedTo(self.step)
    }

    /// Jump from the review screen straight to an earlier step. The review
    /// step re-validates everything, so no intermediate checks run here.
    pub fn edit_from_review(&mut self, target: WizardStep) -> Result<(), CoreError> {
        if self.step != MAX_STEP {
            return Err(CoreError::Validation(
                "La modification directe n'est possible que depuis le récapitulatif".to_string(),
            ));
        }
        if target == WizardStep::Review {
            return Err(CoreError::Validation(
                "Choisissez une étape à modifier".to_string(),
            ));
        }
        self.step = target.index();
        self.notifier.reset();
        self.persist();
        Ok(())
    }

    /// Submit the reviewed draft. The draft is cleared only after the
    /// server confirms; any failure keeps it intact for a retry.
    pub async fn submit(
        &mut self,
        submitter: &PublishSubmitter,
    ) -> Result<PublishedListing, SubmitError> {
        if !self.begin_submit() {
            return Err(SubmitError::InFlight);
        }
        let result = self.submit_inner(submitter).await;
        self.submitting = false;
        result
    }

    async fn submit_inner(
        &mut self,
        submitter: &PublishSubmitter,
    ) -> Result<PublishedListing, SubmitError> {
        validate_step(WizardStep::Review, &self.draft)
            .map_err(|e| SubmitError::ValidationRejected(e.to_string()))?;

        let published = submitter.submit(&self.draft, &self.session).await?;

        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Stored draft could not be removed after publish");
        }
        self.draft = ListingDraft::default();
        self.session.clear();
        self.step = 0;
        self.last_advance = None;
        self.notifier.reset();
        Ok(published)
    }

    /// Set the in-flight flag; false when a submission is already running.
    fn begin_submit(&mut self) -> bool {
        if self.submitting {
            tracing::warn!("Submission already in flight, ignoring");
            return false;
        }
        self.submitting = true;
        true
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.draft, self.step) {
            tracing::warn!(error = %e, "Draft save failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
