//! Per-instance vote tallies.

use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A single approve/reject ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteChoice {
    Approve,
    Reject,
}

impl VoteChoice {
    pub fn from_approve(approve: bool) -> Self {
        if approve {
            Self::Approve
        } else {
            Self::Reject
        }
    }

    pub fn is_approve(&self) -> bool {
        matches!(self, Self::Approve)
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Counters plus the set of identities that already voted.
///
/// Owned by exactly one record or proposal instance. Replacing the instance
/// means allocating a new tally; the voter set is never cleared in place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    approve_votes: u32,
    reject_votes: u32,
    voters: HashSet<Identity>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn approve_votes(&self) -> u32 {
        self.approve_votes
    }

    pub fn reject_votes(&self) -> u32 {
        self.reject_votes
    }

    pub fn has_voted(&self, voter: &Identity) -> bool {
        self.voters.contains(voter)
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Record a ballot. Returns `false` (and changes nothing) if `voter` already
    /// voted on this instance.
    pub fn record(&mut self, voter: Identity, choice: VoteChoice) -> bool {
        if !self.voters.insert(voter) {
            return false;
        }
        match choice {
            VoteChoice::Approve => self.approve_votes += 1,
            VoteChoice::Reject => self.reject_votes += 1,
        }
        true
    }

    /// The count for `choice` after the latest ballot.
    pub fn count(&self, choice: VoteChoice) -> u32 {
        match choice {
            VoteChoice::Approve => self.approve_votes,
            VoteChoice::Reject => self.reject_votes,
        }
    }
}
