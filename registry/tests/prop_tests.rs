use proptest::prelude::*;

use estate_registry::{NewRecord, PropertyRegistry, RegistryError, SubmissionStatus};
use estate_types::{EstateEvent, Identity, Timestamp, WorkflowParams};

fn listing(address: &str) -> NewRecord {
    NewRecord {
        address: address.to_string(),
        owner_name: "Owner".into(),
        property_type: "Condo".into(),
        renovation_date: "2020-01-01".into(),
        image_reference: "img://1".into(),
        location: None,
    }
}

proptest! {
    /// A second submission of the same address fails whoever submits it.
    #[test]
    fn duplicate_address_always_fails(
        address in "[A-Za-z0-9 ]{1,24}",
        first in "[a-z]{1,8}",
        second in "[a-z]{1,8}",
    ) {
        let mut reg = PropertyRegistry::new(Identity::from("admin"), WorkflowParams::default());
        reg.submit(listing(&address), &Identity::new(first), Timestamp::new(1)).unwrap();
        let err = reg.submit(listing(&address), &Identity::new(second), Timestamp::new(2)).unwrap_err();
        prop_assert_eq!(err, RegistryError::DuplicateAddress(address));
        prop_assert_eq!(reg.record_count(), 1);
    }

    /// Counters never decrease, only move on fresh non-owner identities, and
    /// the record is verified exactly when approvals first reach the threshold.
    #[test]
    fn submission_votes_are_monotonic(
        ballots in prop::collection::vec((0u8..6, any::<bool>()), 0..40),
    ) {
        let mut reg = PropertyRegistry::new(Identity::from("admin"), WorkflowParams::default());
        let owner = Identity::from("voter-0");
        let rid = reg.submit(listing("1 Prop Way"), &owner, Timestamp::new(1)).unwrap();
        reg.drain_events();

        let mut seen_verified = false;
        for (voter, approve) in ballots {
            let before = reg.get(rid).unwrap().clone();
            let caller = Identity::new(format!("voter-{voter}"));
            let result = reg.vote_on_submission(rid, approve, &caller);
            let after = reg.get(rid).unwrap();

            prop_assert!(after.approve_votes() >= before.approve_votes());
            prop_assert!(after.reject_votes() >= before.reject_votes());
            if before.is_verified() {
                prop_assert!(after.is_verified(), "verification never reverts");
            }

            match result {
                Ok(_) => {
                    prop_assert!(caller != owner);
                    prop_assert!(!before.tally.has_voted(&caller));
                    prop_assert_eq!(
                        after.approve_votes() + after.reject_votes(),
                        before.approve_votes() + before.reject_votes() + 1
                    );
                }
                Err(_) => {
                    prop_assert_eq!(after.approve_votes(), before.approve_votes());
                    prop_assert_eq!(after.reject_votes(), before.reject_votes());
                }
            }

            if after.is_verified() && !before.is_verified() {
                prop_assert_eq!(after.approve_votes(), 3);
                seen_verified = true;
            }
            if after.status == SubmissionStatus::Rejected {
                prop_assert_eq!(after.reject_votes(), 2);
            }
        }

        let verified_events = reg
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, EstateEvent::RecordVerified { .. }))
            .count();
        prop_assert_eq!(verified_events, usize::from(seen_verified));
    }
}
