use proptest::prelude::*;

use estate_types::{Identity, Scores, VoteChoice, VoteTally, MAX_SCORE};

proptest! {
    /// Scores validate exactly when every field is within bounds.
    #[test]
    fn scores_validate_iff_all_in_range(values in prop::array::uniform5(0u32..200)) {
        let scores = Scores::from_array(values);
        let in_range = values.iter().all(|v| *v <= MAX_SCORE);
        prop_assert_eq!(scores.validate().is_ok(), in_range);
    }

    /// Counters always equal the number of distinct voters, whatever the
    /// sequence of (possibly repeated) ballots.
    #[test]
    fn tally_counts_distinct_voters_only(
        ballots in prop::collection::vec((0u8..8, any::<bool>()), 0..64),
    ) {
        let mut tally = VoteTally::new();
        let mut previous = (0, 0);
        for (voter, approve) in &ballots {
            tally.record(Identity::new(format!("voter-{voter}")), VoteChoice::from_approve(*approve));
            let now = (tally.approve_votes(), tally.reject_votes());
            prop_assert!(now.0 >= previous.0 && now.1 >= previous.1, "counters must never decrease");
            previous = now;
        }
        let distinct: std::collections::HashSet<_> = ballots.iter().map(|(v, _)| *v).collect();
        prop_assert_eq!((tally.approve_votes() + tally.reject_votes()) as usize, distinct.len());
        prop_assert_eq!(tally.voter_count(), distinct.len());
    }

    /// Scores survive the snapshot encoding unchanged.
    #[test]
    fn scores_bincode_roundtrip(values in prop::array::uniform5(0u32..=MAX_SCORE)) {
        let scores = Scores::from_array(values);
        let encoded = bincode::serialize(&scores).unwrap();
        let decoded: Scores = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, scores);
    }
}
