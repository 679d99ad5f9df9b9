//! Valuation proposals.

use estate_types::{Identity, RecordId, Timestamp, Valuation, VoteTally};
use serde::{Deserialize, Serialize};

/// A pending candidate update to a record's value fields.
///
/// One live instance per record. A new proposal replaces the old one
/// wholesale, including its tally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationProposal {
    pub record_id: RecordId,
    pub proposer: Identity,
    pub proposed_at: Timestamp,
    pub valuation: Valuation,
    pub tally: VoteTally,
    /// Set once approvals reach the threshold; the proposal then waits for
    /// the owner to confirm it.
    pub is_verified: bool,
}

impl ValuationProposal {
    pub fn new(
        record_id: RecordId,
        proposer: Identity,
        valuation: Valuation,
        proposed_at: Timestamp,
    ) -> Self {
        Self {
            record_id,
            proposer,
            proposed_at,
            valuation,
            tally: VoteTally::new(),
            is_verified: false,
        }
    }

    pub fn estimated_value(&self) -> u128 {
        self.valuation.estimated_value
    }

    pub fn approve_votes(&self) -> u32 {
        self.tally.approve_votes()
    }

    pub fn reject_votes(&self) -> u32 {
        self.tally.reject_votes()
    }
}

/// What a valuation vote did to the proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalOutcome {
    /// Counted; no threshold reached.
    Pending,
    /// Approval threshold reached; awaiting confirmation.
    Verified,
    /// Rejection threshold reached; the proposal was deleted.
    Rejected,
}
