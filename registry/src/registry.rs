//! The record table and every operation that mutates it.

use crate::authorization::{AuthorizationGate, AuthorizationState};
use crate::error::RegistryError;
use crate::record::{NewRecord, PropertyRecord, SubmissionStatus};
use estate_types::{EstateEvent, Identity, RecordId, Timestamp, Valuation, VoteChoice, WorkflowParams};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Registry of uniquely addressed property records.
///
/// Records live in an id-indexed table and are never removed. Every mutating
/// operation validates completely before touching state, so a failed call
/// leaves the registry and its event buffer exactly as they were.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertyRegistry {
    params: WorkflowParams,
    records: Vec<PropertyRecord>,
    /// address -> id, covering every record ever submitted.
    address_index: HashMap<String, RecordId>,
    authorization: AuthorizationState,
    #[serde(skip)]
    pending_events: Vec<EstateEvent>,
}

impl PropertyRegistry {
    pub fn new(administrator: Identity, params: WorkflowParams) -> Self {
        Self {
            params,
            records: Vec::new(),
            address_index: HashMap::new(),
            authorization: AuthorizationState::new(administrator),
            pending_events: Vec::new(),
        }
    }

    pub fn params(&self) -> &WorkflowParams {
        &self.params
    }

    /// Submit a new record owned by `caller`.
    ///
    /// Addresses are never reused, whatever happened to the earlier record.
    pub fn submit(
        &mut self,
        fields: NewRecord,
        caller: &Identity,
        now: Timestamp,
    ) -> Result<RecordId, RegistryError> {
        require_identity(caller)?;
        if fields.address.is_empty() {
            return Err(RegistryError::InvalidInput("address must not be empty".into()));
        }
        if self.address_index.contains_key(&fields.address) {
            return Err(RegistryError::DuplicateAddress(fields.address));
        }

        let id = RecordId::new(self.records.len() as u64);
        let address = fields.address.clone();
        self.records
            .push(PropertyRecord::new(id, fields, caller.clone(), now));
        self.address_index.insert(address.clone(), id);

        info!(%id, %address, submitter = %caller, "record submitted");
        self.pending_events.push(EstateEvent::RecordSubmitted {
            id,
            address,
            submitter: caller.clone(),
        });
        Ok(id)
    }

    /// Cast a submission vote on record `id`.
    ///
    /// The owner cannot vote and every other identity votes at most once.
    /// The first time approvals reach the approval threshold the record is
    /// verified; the first time rejections reach the rejection threshold while
    /// still pending it is rejected. Either outcome closes voting.
    ///
    /// Returns the record's status after the vote.
    pub fn vote_on_submission(
        &mut self,
        id: RecordId,
        approve: bool,
        caller: &Identity,
    ) -> Result<SubmissionStatus, RegistryError> {
        require_identity(caller)?;
        let record = self
            .records
            .get_mut(id.index())
            .ok_or(RegistryError::NotFound(id))?;

        if &record.current_owner == caller {
            return Err(RegistryError::SelfVote);
        }
        if record.tally.has_voted(caller) {
            return Err(RegistryError::AlreadyVoted(caller.to_string()));
        }
        if record.status != SubmissionStatus::Pending {
            return Err(RegistryError::AlreadyFinalized {
                id,
                status: record.status,
            });
        }

        let choice = VoteChoice::from_approve(approve);
        record.tally.record(caller.clone(), choice);
        debug!(
            %id,
            voter = %caller,
            %choice,
            approve_votes = record.tally.approve_votes(),
            reject_votes = record.tally.reject_votes(),
            "submission vote cast"
        );
        self.pending_events.push(EstateEvent::SubmissionVoteCast {
            id,
            voter: caller.clone(),
            choice,
        });

        if record.tally.approve_votes() >= self.params.submission_approval_threshold {
            record.status = SubmissionStatus::Verified;
            info!(%id, "record verified");
            self.pending_events.push(EstateEvent::RecordVerified { id });
        } else if record.tally.reject_votes() >= self.params.submission_rejection_threshold {
            record.status = SubmissionStatus::Rejected;
            info!(%id, "submission rejected");
            self.pending_events
                .push(EstateEvent::SubmissionRejected { id });
        }

        Ok(record.status)
    }

    pub fn get(&self, id: RecordId) -> Result<&PropertyRecord, RegistryError> {
        self.records
            .get(id.index())
            .ok_or(RegistryError::NotFound(id))
    }

    pub fn owner_of(&self, id: RecordId) -> Result<&Identity, RegistryError> {
        self.get(id).map(|record| &record.current_owner)
    }

    /// Overwrite the value fields of record `id`.
    ///
    /// Only the designated writer may call this. Verification status and vote
    /// state are untouched.
    pub fn commit_valuation(
        &mut self,
        id: RecordId,
        valuation: Valuation,
        caller: &Identity,
    ) -> Result<(), RegistryError> {
        if !self.authorization.is_authorized(caller) {
            return Err(RegistryError::Unauthorized(caller.to_string()));
        }
        valuation.validate()?;
        let record = self
            .records
            .get_mut(id.index())
            .ok_or(RegistryError::NotFound(id))?;

        record.valuation = valuation;
        info!(
            %id,
            estimated_value = valuation.estimated_value,
            comparable_value = valuation.comparable_value,
            "valuation applied"
        );
        self.pending_events.push(EstateEvent::ValuationApplied {
            id,
            estimated_value: valuation.estimated_value,
        });
        Ok(())
    }

    /// Hand record `id` to `new_owner`. Only the current owner may do this.
    pub fn transfer_ownership(
        &mut self,
        id: RecordId,
        new_owner: Identity,
        caller: &Identity,
    ) -> Result<(), RegistryError> {
        require_identity(&new_owner)?;
        let record = self
            .records
            .get_mut(id.index())
            .ok_or(RegistryError::NotFound(id))?;
        if &record.current_owner != caller {
            return Err(RegistryError::NotOwner(caller.to_string()));
        }

        let from = std::mem::replace(&mut record.current_owner, new_owner.clone());
        info!(%id, %from, to = %new_owner, "ownership transferred");
        self.pending_events.push(EstateEvent::OwnershipTransferred {
            id,
            from,
            to: new_owner,
        });
        Ok(())
    }

    // ── Administration ──────────────────────────────────────────────────

    pub fn authorization(&self) -> &AuthorizationState {
        &self.authorization
    }

    /// Designate the single identity allowed to commit valuations.
    pub fn designate_writer(
        &mut self,
        writer: Identity,
        caller: &Identity,
    ) -> Result<(), RegistryError> {
        self.require_administrator(caller)?;
        require_identity(&writer)?;
        let previous = self.authorization.designate(writer.clone());
        info!(writer = %writer, previous = ?previous, "valuation writer designated");
        self.pending_events
            .push(EstateEvent::WriterDesignated { writer });
        Ok(())
    }

    /// Remove the writer designation; commits fail until a new one is made.
    pub fn revoke_writer(&mut self, caller: &Identity) -> Result<(), RegistryError> {
        self.require_administrator(caller)?;
        if let Some(previous) = self.authorization.revoke() {
            info!(writer = %previous, "valuation writer revoked");
            self.pending_events.push(EstateEvent::WriterRevoked);
        }
        Ok(())
    }

    pub fn transfer_administration(
        &mut self,
        new_administrator: Identity,
        caller: &Identity,
    ) -> Result<(), RegistryError> {
        self.require_administrator(caller)?;
        require_identity(&new_administrator)?;
        let from = self
            .authorization
            .set_administrator(new_administrator.clone());
        info!(%from, to = %new_administrator, "registry administration transferred");
        self.pending_events
            .push(EstateEvent::AdministrationTransferred {
                from,
                to: new_administrator,
            });
        Ok(())
    }

    fn require_administrator(&self, caller: &Identity) -> Result<(), RegistryError> {
        if self.authorization.is_administrator(caller) {
            Ok(())
        } else {
            Err(RegistryError::NotAdministrator(caller.to_string()))
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// All records in id order.
    pub fn records(&self) -> impl Iterator<Item = &PropertyRecord> {
        self.records.iter()
    }

    pub fn records_owned_by<'a>(
        &'a self,
        owner: &'a Identity,
    ) -> impl Iterator<Item = &'a PropertyRecord> + 'a {
        self.records
            .iter()
            .filter(move |record| &record.current_owner == owner)
    }

    pub fn find_by_address(&self, address: &str) -> Option<&PropertyRecord> {
        self.address_index
            .get(address)
            .and_then(|id| self.records.get(id.index()))
    }

    pub fn has_voted(&self, id: RecordId, voter: &Identity) -> Result<bool, RegistryError> {
        self.get(id).map(|record| record.tally.has_voted(voter))
    }

    /// Take the notifications produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<EstateEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

impl AuthorizationGate for PropertyRegistry {
    fn is_authorized(&self, writer: &Identity) -> bool {
        self.authorization.is_authorized(writer)
    }
}

fn require_identity(identity: &Identity) -> Result<(), RegistryError> {
    if identity.is_valid() {
        Ok(())
    } else {
        Err(RegistryError::InvalidInput("identity must not be empty".into()))
    }
}
