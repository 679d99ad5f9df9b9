//! Notifications emitted by successful mutating operations.
//!
//! This is the only externally observable event stream. Components buffer
//! events while an operation runs and hand them out via `drain_events`; a
//! failed operation never leaves events behind.

use crate::identity::Identity;
use crate::record_id::RecordId;
use crate::tally::VoteChoice;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstateEvent {
    // ── Registry ─────────────────────────────────────────────────────────
    /// A new record was created (unverified).
    RecordSubmitted {
        id: RecordId,
        address: String,
        submitter: Identity,
    },
    /// A submission vote was counted.
    SubmissionVoteCast {
        id: RecordId,
        voter: Identity,
        choice: VoteChoice,
    },
    /// The record reached the approval threshold.
    RecordVerified { id: RecordId },
    /// The record reached the rejection threshold while pending.
    SubmissionRejected { id: RecordId },
    /// Ownership moved to another identity.
    OwnershipTransferred {
        id: RecordId,
        from: Identity,
        to: Identity,
    },
    /// The authorized writer overwrote the record's value fields.
    ValuationApplied { id: RecordId, estimated_value: u128 },
    /// A writer was designated for valuation commits.
    WriterDesignated { writer: Identity },
    /// The writer designation was cleared.
    WriterRevoked,
    /// Registry administration changed hands.
    AdministrationTransferred { from: Identity, to: Identity },

    // ── Valuation workflow ──────────────────────────────────────────────
    /// A fresh proposal replaced whatever was pending for the record.
    ValuationProposed {
        id: RecordId,
        proposer: Identity,
        estimated_value: u128,
    },
    /// A valuation vote was counted.
    ValuationVoteCast {
        id: RecordId,
        voter: Identity,
        choice: VoteChoice,
    },
    /// The proposal reached the approval threshold and awaits confirmation.
    ValuationVerified { id: RecordId },
    /// The proposal reached the rejection threshold and was deleted.
    ValuationRejected { id: RecordId },
    /// A verified proposal was confirmed, applied and logged.
    ValuationCommitted { id: RecordId, estimated_value: u128 },
}

impl EstateEvent {
    /// The record this event refers to, if any.
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            Self::RecordSubmitted { id, .. }
            | Self::SubmissionVoteCast { id, .. }
            | Self::RecordVerified { id }
            | Self::SubmissionRejected { id }
            | Self::OwnershipTransferred { id, .. }
            | Self::ValuationApplied { id, .. }
            | Self::ValuationProposed { id, .. }
            | Self::ValuationVoteCast { id, .. }
            | Self::ValuationVerified { id }
            | Self::ValuationRejected { id }
            | Self::ValuationCommitted { id, .. } => Some(*id),
            Self::WriterDesignated { .. }
            | Self::WriterRevoked
            | Self::AdministrationTransferred { .. } => None,
        }
    }
}
