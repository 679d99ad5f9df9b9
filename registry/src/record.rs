//! Property records and their submission state.

use estate_types::{GeoPoint, Identity, RecordId, Scores, Timestamp, Valuation, VoteTally};
use serde::{Deserialize, Serialize};

/// Where a record stands in submission voting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Accepting votes.
    Pending,
    /// Reached the approval threshold. Terminal.
    Verified,
    /// Reached the rejection threshold before verification. Terminal; the
    /// address stays reserved.
    Rejected,
}

/// Caller-supplied fields for a new submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub address: String,
    pub owner_name: String,
    pub property_type: String,
    pub renovation_date: String,
    /// Reference to an already-uploaded image; opaque to the registry.
    pub image_reference: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

/// A registered property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: RecordId,
    /// Unique across the registry, exact match.
    pub address: String,
    pub owner_name: String,
    pub property_type: String,
    pub renovation_date: String,
    pub image_reference: String,
    pub location: Option<GeoPoint>,
    pub submitted_at: Timestamp,
    pub current_owner: Identity,
    /// Value fields; zero until the first committed valuation.
    pub valuation: Valuation,
    pub status: SubmissionStatus,
    /// Submission votes. Append-only for the lifetime of the record.
    pub tally: VoteTally,
}

impl PropertyRecord {
    pub(crate) fn new(id: RecordId, fields: NewRecord, owner: Identity, now: Timestamp) -> Self {
        Self {
            id,
            address: fields.address,
            owner_name: fields.owner_name,
            property_type: fields.property_type,
            renovation_date: fields.renovation_date,
            image_reference: fields.image_reference,
            location: fields.location,
            submitted_at: now,
            current_owner: owner,
            valuation: Valuation::default(),
            status: SubmissionStatus::Pending,
            tally: VoteTally::new(),
        }
    }

    pub fn is_verified(&self) -> bool {
        self.status == SubmissionStatus::Verified
    }

    pub fn estimated_value(&self) -> u128 {
        self.valuation.estimated_value
    }

    pub fn comparable_value(&self) -> u128 {
        self.valuation.comparable_value
    }

    pub fn scores(&self) -> &Scores {
        &self.valuation.scores
    }

    pub fn approve_votes(&self) -> u32 {
        self.tally.approve_votes()
    }

    pub fn reject_votes(&self) -> u32 {
        self.tally.reject_votes()
    }
}
