//! The valuation workflow engine.

use crate::error::ValuationError;
use crate::history::HistoricalValueLog;
use crate::proposal::{ProposalOutcome, ValuationProposal};
use estate_registry::PropertyRegistry;
use estate_types::{EstateEvent, Identity, RecordId, Timestamp, Valuation, VoteChoice, WorkflowParams};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Owns valuation proposals and the committed value history.
///
/// The workflow commits into the registry under its own `writer` identity, so
/// a confirm only succeeds while the registry designates that identity as
/// its writer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValuationWorkflow {
    writer: Identity,
    params: WorkflowParams,
    proposals: BTreeMap<RecordId, ValuationProposal>,
    history: HistoricalValueLog,
    #[serde(skip)]
    pending_events: Vec<EstateEvent>,
}

impl ValuationWorkflow {
    pub fn new(writer: Identity, params: WorkflowParams) -> Self {
        Self {
            writer,
            params,
            proposals: BTreeMap::new(),
            history: HistoricalValueLog::new(),
            pending_events: Vec::new(),
        }
    }

    /// The identity this workflow presents to the registry when committing.
    pub fn writer(&self) -> &Identity {
        &self.writer
    }

    pub fn params(&self) -> &WorkflowParams {
        &self.params
    }

    /// Propose new value fields for record `id`, replacing any live proposal.
    ///
    /// Only the record's current owner or the registry's current
    /// administrator may propose. The fresh proposal starts unverified with an empty tally.
    pub fn propose_valuation(
        &mut self,
        registry: &PropertyRegistry,
        id: RecordId,
        valuation: Valuation,
        caller: &Identity,
        now: Timestamp,
    ) -> Result<(), ValuationError> {
        require_identity(caller)?;
        let owner = owner_of(registry, id)?;
        if owner != caller && !registry.authorization().is_administrator(caller) {
            return Err(ValuationError::Unauthorized(caller.to_string()));
        }
        valuation.validate()?;

        let proposal = ValuationProposal::new(id, caller.clone(), valuation, now);
        let replaced = self.proposals.insert(id, proposal).is_some();
        debug!(
            %id,
            proposer = %caller,
            estimated_value = valuation.estimated_value,
            replaced,
            "valuation proposed"
        );
        self.pending_events.push(EstateEvent::ValuationProposed {
            id,
            proposer: caller.clone(),
            estimated_value: valuation.estimated_value,
        });
        Ok(())
    }

    /// Vote on the live proposal for record `id`.
    ///
    /// Reaching the approval threshold verifies the proposal, which stays in
    /// place until confirmed. Reaching the rejection threshold deletes it
    /// without touching the history.
    pub fn vote_on_valuation(
        &mut self,
        registry: &PropertyRegistry,
        id: RecordId,
        approve: bool,
        caller: &Identity,
    ) -> Result<ProposalOutcome, ValuationError> {
        require_identity(caller)?;
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(ValuationError::NoProposal(id))?;
        if proposal.is_verified {
            return Err(ValuationError::AlreadyFinalized(id));
        }
        if owner_of(registry, id)? == caller {
            return Err(ValuationError::SelfVote);
        }
        if proposal.tally.has_voted(caller) {
            return Err(ValuationError::AlreadyVoted(caller.to_string()));
        }

        let choice = VoteChoice::from_approve(approve);
        proposal.tally.record(caller.clone(), choice);
        debug!(
            %id,
            voter = %caller,
            %choice,
            approve_votes = proposal.tally.approve_votes(),
            reject_votes = proposal.tally.reject_votes(),
            "valuation vote cast"
        );
        self.pending_events.push(EstateEvent::ValuationVoteCast {
            id,
            voter: caller.clone(),
            choice,
        });

        if proposal.tally.approve_votes() >= self.params.valuation_approval_threshold {
            proposal.is_verified = true;
            info!(%id, "valuation proposal verified, awaiting confirmation");
            self.pending_events
                .push(EstateEvent::ValuationVerified { id });
            return Ok(ProposalOutcome::Verified);
        }
        if proposal.tally.reject_votes() >= self.params.valuation_rejection_threshold {
            self.proposals.remove(&id);
            info!(%id, "valuation proposal rejected");
            self.pending_events
                .push(EstateEvent::ValuationRejected { id });
            return Ok(ProposalOutcome::Rejected);
        }
        Ok(ProposalOutcome::Pending)
    }

    /// Confirm the verified proposal for record `id` and commit it.
    ///
    /// Either the registry values are updated, the history grows by one entry
    /// and the proposal is cleared, or nothing changes. A failed registry
    /// commit leaves the proposal verified so the owner can retry.
    ///
    /// Returns the committed estimated value.
    pub fn confirm_valuation_update(
        &mut self,
        registry: &mut PropertyRegistry,
        id: RecordId,
        caller: &Identity,
        now: Timestamp,
    ) -> Result<u128, ValuationError> {
        require_identity(caller)?;
        if owner_of(registry, id)? != caller {
            return Err(ValuationError::NotOwner(caller.to_string()));
        }
        let proposal = self
            .proposals
            .get(&id)
            .ok_or(ValuationError::NoProposal(id))?;
        if !proposal.is_verified {
            return Err(ValuationError::NotYetVerified(id));
        }
        let valuation = proposal.valuation;

        // Everything after this call must be infallible.
        if let Err(source) = registry.commit_valuation(id, valuation, &self.writer) {
            warn!(%id, writer = %self.writer, error = %source, "valuation commit refused by registry");
            return Err(ValuationError::CommitFailed { id, source });
        }

        self.history.append(id, valuation.estimated_value, now);
        self.proposals.remove(&id);
        info!(
            %id,
            estimated_value = valuation.estimated_value,
            history_len = self.history.len(id),
            "valuation committed"
        );
        self.pending_events.push(EstateEvent::ValuationCommitted {
            id,
            estimated_value: valuation.estimated_value,
        });
        Ok(valuation.estimated_value)
    }

    pub fn get_proposal(&self, id: RecordId) -> Option<&ValuationProposal> {
        self.proposals.get(&id)
    }

    /// Committed estimated values for `id`, in confirm order.
    pub fn get_history(&self, id: RecordId) -> Vec<u128> {
        self.history.values(id)
    }

    pub fn history(&self) -> &HistoricalValueLog {
        &self.history
    }

    /// Live proposals in record id order.
    pub fn pending_proposals(&self) -> impl Iterator<Item = &ValuationProposal> {
        self.proposals.values()
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// Take the notifications produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<EstateEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

fn owner_of(registry: &PropertyRegistry, id: RecordId) -> Result<&Identity, ValuationError> {
    registry
        .owner_of(id)
        .map_err(|_| ValuationError::NotFound(id))
}

fn require_identity(identity: &Identity) -> Result<(), ValuationError> {
    if identity.is_valid() {
        Ok(())
    } else {
        Err(ValuationError::InvalidInput("identity must not be empty".into()))
    }
}
