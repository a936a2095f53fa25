//! End-to-end wizard session tests: fill a draft over one "session",
//! restart, and verify the restore path against the file-backed store.

use std::time::Instant;

use kwabo_client::flow::{AdvanceBlock, PublishFlow, ADVANCE_DEBOUNCE};
use kwabo_client::store::{DraftStore, FileDraftStore, DRAFT_FILE_NAME};
use kwabo_core::draft::{Basics, HouseBasics, OwnerContact};
use kwabo_core::listing::{PropertyCategory, PrivacyLevel};

#[test]
fn interrupted_session_resumes_at_saved_step_with_data() {
    let dir = tempfile::tempdir().unwrap();

    // Session one: contact, kind, location, basics, amenities.
    {
        let mut flow = PublishFlow::new(FileDraftStore::new(dir.path()));
        flow.update(|d| {
            d.owner = OwnerContact {
                name: "Ayélé Hounsou".into(),
                phone: "+22997000001".into(),
                email: "ayele@example.bj".into(),
            };
        });
        let mut now = Instant::now();
        assert_eq!(flow.try_next_at(now), Ok(1));

        flow.update(|d| {
            d.set_category(PropertyCategory::House);
            d.kind.sub_type = "villa".into();
            d.kind.privacy = Some(PrivacyLevel::Entire);
        });
        now += ADVANCE_DEBOUNCE;
        assert_eq!(flow.try_next_at(now), Ok(2));

        flow.update(|d| {
            d.location.city = "Cotonou".into();
            d.location.address = "Rue 12.080, Fidjrossè Plage".into();
        });
        now += ADVANCE_DEBOUNCE;
        assert_eq!(flow.try_next_at(now), Ok(3));

        flow.update(|d| {
            d.size_sqm = 180;
            d.basics = Basics::House(HouseBasics {
                max_guests: 6,
                bedrooms: 3,
                beds: 4,
                bathrooms: 2,
            });
        });
        now += ADVANCE_DEBOUNCE;
        assert_eq!(flow.try_next_at(now), Ok(4));

        flow.update(|d| d.amenities = vec!["Wi-Fi".into(), "climatisation".into()]);
        flow.attach_photo_bytes(vec![0xff, 0xd8, 0xff], "image/jpeg");
        // Process dies here.
    }

    // Session two: everything except the session photo bytes survives.
    let mut flow = PublishFlow::new(FileDraftStore::new(dir.path()));
    assert!(flow.take_restore_notice());
    assert_eq!(flow.step(), 4);
    assert_eq!(
        flow.draft().amenities,
        vec!["Wi-Fi".to_string(), "climatisation".to_string()]
    );
    assert_eq!(flow.draft().kind.category, Some(PropertyCategory::House));
    assert_eq!(flow.draft().photos.len(), 1);
    assert!(flow.session().is_empty());

    // The wizard keeps working from where it stopped.
    assert_eq!(flow.try_next_at(Instant::now()), Ok(5));
}

#[test]
fn blocked_advance_keeps_the_step_and_reports_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut flow = PublishFlow::new(FileDraftStore::new(dir.path()));

    let t0 = Instant::now();
    match flow.try_next_at(t0) {
        Err(AdvanceBlock::Invalid { notify: true, .. }) => {}
        other => panic!("expected a notified validation block, got {other:?}"),
    }
    match flow.try_next_at(t0 + ADVANCE_DEBOUNCE) {
        Err(AdvanceBlock::Invalid { notify: false, .. }) => {}
        other => panic!("expected a silent validation block, got {other:?}"),
    }
    assert_eq!(flow.step(), 0);
}

#[test]
fn foreign_schema_version_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileDraftStore::new(dir.path());
    store
        .save(&kwabo_core::draft::ListingDraft::default(), 7)
        .unwrap();

    // Rewrite the envelope with a future schema version.
    let path = dir.path().join(DRAFT_FILE_NAME);
    let mut value: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    value["schemaVersion"] = serde_json::json!(99);
    std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

    let mut flow = PublishFlow::new(FileDraftStore::new(dir.path()));
    assert!(!flow.take_restore_notice());
    assert_eq!(flow.step(), 0);
}
