//! The estate node: one serialized entry point for every operation.

use std::sync::Arc;

use estate_registry::{AuthorizationGate, NewRecord, PropertyRecord, SubmissionStatus};
use estate_types::{Clock, EstateEvent, Identity, RecordId, Timestamp, Valuation};
use estate_valuation::{ProposalOutcome, ValuationError, ValuationProposal};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::command::{Command, CommandReply};
use crate::config::NodeConfig;
use crate::event_bus::{EventBus, EventEnvelope, EventListener};
use crate::metrics::NodeMetrics;
use crate::snapshot;
use crate::state::EstateState;
use crate::tracing_spans::{command_span, mutation_span};
use crate::NodeError;

struct Inner {
    state: EstateState,
    bus: EventBus,
}

/// Serializes every mutating operation behind a single write lock.
///
/// A mutation holds the lock from validation through event publication, so
/// operations apply in one global order and nobody observes a partially
/// applied effect. Queries share the read lock and return owned copies of the
/// latest committed state.
pub struct EstateNode {
    config: NodeConfig,
    inner: RwLock<Inner>,
    metrics: NodeMetrics,
    clock: Arc<dyn Clock>,
}

impl EstateNode {
    /// Start from fresh state built from `config`.
    pub fn new(config: NodeConfig, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        let state = EstateState::new(&config)?;
        Self::with_state(config, clock, state)
    }

    /// Start from the snapshot in `config.data_dir`, or fresh state if there
    /// is none.
    ///
    /// A restored snapshot keeps its own administrator, workflow writer and
    /// thresholds; each config entry it disagrees with is logged at `warn`.
    pub fn open(config: NodeConfig, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        match snapshot::load_snapshot(&config.snapshot_path())? {
            Some(state) => {
                for field in state.config_overrides(&config) {
                    warn!(field, "snapshot value overrides configured {field}");
                }
                Self::with_state(config, clock, state)
            }
            None => Self::new(config, clock),
        }
    }

    pub fn with_state(
        config: NodeConfig,
        clock: Arc<dyn Clock>,
        mut state: EstateState,
    ) -> Result<Self, NodeError> {
        config.validate()?;
        let metrics = NodeMetrics::new();
        let mut bus = EventBus::new(config.recent_events_capacity);
        let events = state.drain_events();
        for event in &events {
            metrics.observe(event);
        }
        bus.publish(events, clock.now());
        metrics
            .record_count
            .set(state.registry.record_count() as i64);
        metrics
            .pending_proposals
            .set(state.workflow.proposal_count() as i64);

        Ok(Self {
            config,
            inner: RwLock::new(Inner { state, bus }),
            metrics,
            clock,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }

    /// Register a listener for every event published from now on.
    pub async fn subscribe(&self, listener: EventListener) {
        self.inner.write().await.bus.subscribe(listener);
    }

    /// Run `op` under the write lock, then publish whatever it emitted.
    async fn mutate<T, E>(
        &self,
        name: &'static str,
        op: impl FnOnce(&mut EstateState, Timestamp) -> Result<T, E>,
    ) -> Result<T, NodeError>
    where
        NodeError: From<E>,
    {
        let mut inner = self.inner.write().await;
        let _span = mutation_span(name).entered();
        let now = self.clock.now();

        let result = op(&mut inner.state, now);
        let events: Vec<EstateEvent> = inner.state.drain_events();
        for event in &events {
            self.metrics.observe(event);
        }
        inner.bus.publish(events, now);
        self.metrics
            .record_count
            .set(inner.state.registry.record_count() as i64);
        self.metrics
            .pending_proposals
            .set(inner.state.workflow.proposal_count() as i64);

        result.map_err(NodeError::from)
    }

    async fn read<T>(&self, op: impl FnOnce(&EstateState) -> T) -> T {
        let inner = self.inner.read().await;
        op(&inner.state)
    }

    // ── Registry ────────────────────────────────────────────────────────

    pub async fn submit(&self, record: NewRecord, caller: &Identity) -> Result<RecordId, NodeError> {
        self.mutate("submit", |state, now| state.registry.submit(record, caller, now))
            .await
    }

    pub async fn vote_on_submission(
        &self,
        id: RecordId,
        approve: bool,
        caller: &Identity,
    ) -> Result<SubmissionStatus, NodeError> {
        self.mutate("vote_on_submission", |state, _| {
            state.registry.vote_on_submission(id, approve, caller)
        })
        .await
    }

    pub async fn transfer_ownership(
        &self,
        id: RecordId,
        new_owner: Identity,
        caller: &Identity,
    ) -> Result<(), NodeError> {
        self.mutate("transfer_ownership", |state, _| {
            state.registry.transfer_ownership(id, new_owner, caller)
        })
        .await
    }

    pub async fn designate_writer(&self, writer: Identity, caller: &Identity) -> Result<(), NodeError> {
        self.mutate("designate_writer", |state, _| {
            state.registry.designate_writer(writer, caller)
        })
        .await
    }

    pub async fn revoke_writer(&self, caller: &Identity) -> Result<(), NodeError> {
        self.mutate("revoke_writer", |state, _| state.registry.revoke_writer(caller))
            .await
    }

    pub async fn transfer_administration(
        &self,
        new_administrator: Identity,
        caller: &Identity,
    ) -> Result<(), NodeError> {
        self.mutate("transfer_administration", |state, _| {
            state
                .registry
                .transfer_administration(new_administrator, caller)
        })
        .await
    }

    // ── Valuation ───────────────────────────────────────────────────────

    pub async fn propose_valuation(
        &self,
        id: RecordId,
        valuation: Valuation,
        caller: &Identity,
    ) -> Result<(), NodeError> {
        self.mutate("propose_valuation", |state, now| {
            state
                .workflow
                .propose_valuation(&state.registry, id, valuation, caller, now)
        })
        .await
    }

    pub async fn vote_on_valuation(
        &self,
        id: RecordId,
        approve: bool,
        caller: &Identity,
    ) -> Result<ProposalOutcome, NodeError> {
        self.mutate("vote_on_valuation", |state, _| {
            state
                .workflow
                .vote_on_valuation(&state.registry, id, approve, caller)
        })
        .await
    }

    pub async fn confirm_valuation_update(
        &self,
        id: RecordId,
        caller: &Identity,
    ) -> Result<u128, NodeError> {
        let result = self
            .mutate("confirm_valuation_update", |state, now| {
                state
                    .workflow
                    .confirm_valuation_update(&mut state.registry, id, caller, now)
            })
            .await;
        if let Err(NodeError::Valuation(ValuationError::CommitFailed { .. })) = &result {
            self.metrics.confirm_failures.inc();
        }
        result
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub async fn get_record(&self, id: RecordId) -> Result<PropertyRecord, NodeError> {
        self.read(|state| state.registry.get(id).cloned())
            .await
            .map_err(NodeError::from)
    }

    pub async fn records(&self) -> Vec<PropertyRecord> {
        self.read(|state| state.registry.records().cloned().collect())
            .await
    }

    pub async fn records_owned_by(&self, owner: &Identity) -> Vec<PropertyRecord> {
        self.read(|state| state.registry.records_owned_by(owner).cloned().collect())
            .await
    }

    pub async fn find_by_address(&self, address: &str) -> Option<PropertyRecord> {
        self.read(|state| state.registry.find_by_address(address).cloned())
            .await
    }

    /// Whether `voter` has cast a submission vote on record `id`.
    pub async fn has_voted(&self, id: RecordId, voter: &Identity) -> Result<bool, NodeError> {
        self.read(|state| state.registry.has_voted(id, voter))
            .await
            .map_err(NodeError::from)
    }

    pub async fn get_proposal(&self, id: RecordId) -> Option<ValuationProposal> {
        self.read(|state| state.workflow.get_proposal(id).cloned())
            .await
    }

    pub async fn get_history(&self, id: RecordId) -> Vec<u128> {
        self.read(|state| state.workflow.get_history(id)).await
    }

    /// Live proposals in record id order.
    pub async fn pending_proposals(&self) -> Vec<ValuationProposal> {
        self.read(|state| state.workflow.pending_proposals().cloned().collect())
            .await
    }

    /// Whether `writer` is the registry's designated writer.
    pub async fn is_authorized(&self, writer: &Identity) -> bool {
        self.read(|state| state.registry.is_authorized(writer)).await
    }

    /// Whether the workflow's writer identity may currently commit values.
    pub async fn is_writer_authorized(&self) -> bool {
        self.read(|state| state.registry.is_authorized(state.workflow.writer()))
            .await
    }

    pub async fn recent_events(&self, limit: usize) -> Vec<EventEnvelope> {
        self.inner.read().await.bus.recent(limit)
    }

    /// Owned copy of the whole state.
    pub async fn state(&self) -> EstateState {
        self.read(EstateState::clone).await
    }

    /// Write the current state to the configured snapshot path.
    pub async fn save_snapshot(&self) -> Result<(), NodeError> {
        let inner = self.inner.read().await;
        snapshot::save_snapshot(&self.config.snapshot_path(), &inner.state, self.clock.now())
    }

    // ── Command dispatch ────────────────────────────────────────────────

    /// Execute a command, folding any failure into [`CommandReply::Error`].
    pub async fn execute(&self, command: Command) -> CommandReply {
        let name = command.name();
        let span = command_span(name);
        span.in_scope(|| debug!("executing command"));

        let reply = match command {
            Command::Submit { caller, record } => self
                .submit(record, &caller)
                .await
                .map(|id| CommandReply::Submitted { id }),
            Command::VoteOnSubmission {
                caller,
                id,
                approve,
            } => self
                .vote_on_submission(id, approve, &caller)
                .await
                .map(|status| CommandReply::SubmissionVoted { status }),
            Command::TransferOwnership {
                caller,
                id,
                new_owner,
            } => self
                .transfer_ownership(id, new_owner, &caller)
                .await
                .map(|()| CommandReply::Done),
            Command::DesignateWriter { caller, writer } => self
                .designate_writer(writer, &caller)
                .await
                .map(|()| CommandReply::Done),
            Command::RevokeWriter { caller } => self
                .revoke_writer(&caller)
                .await
                .map(|()| CommandReply::Done),
            Command::TransferAdministration {
                caller,
                new_administrator,
            } => self
                .transfer_administration(new_administrator, &caller)
                .await
                .map(|()| CommandReply::Done),
            Command::ProposeValuation {
                caller,
                id,
                valuation,
            } => self
                .propose_valuation(id, valuation, &caller)
                .await
                .map(|()| CommandReply::Done),
            Command::VoteOnValuation {
                caller,
                id,
                approve,
            } => self
                .vote_on_valuation(id, approve, &caller)
                .await
                .map(|outcome| CommandReply::ValuationVoted { outcome }),
            Command::ConfirmValuationUpdate { caller, id } => self
                .confirm_valuation_update(id, &caller)
                .await
                .map(|estimated_value| CommandReply::Committed { estimated_value }),
            Command::GetRecord { id } => self
                .get_record(id)
                .await
                .map(|record| CommandReply::Record {
                    record: Box::new(record),
                }),
            Command::ListRecords => Ok(CommandReply::Records {
                records: self.records().await,
            }),
            Command::RecordsOwnedBy { owner } => Ok(CommandReply::Records {
                records: self.records_owned_by(&owner).await,
            }),
            Command::FindByAddress { address } => Ok(CommandReply::Lookup {
                record: self.find_by_address(&address).await.map(Box::new),
            }),
            Command::HasVoted { id, voter } => self
                .has_voted(id, &voter)
                .await
                .map(|voted| CommandReply::Voted { voted }),
            Command::GetProposal { id } => Ok(CommandReply::Proposal {
                proposal: self.get_proposal(id).await,
            }),
            Command::PendingProposals => Ok(CommandReply::Proposals {
                proposals: self.pending_proposals().await,
            }),
            Command::IsAuthorized { writer } => Ok(CommandReply::Authorized {
                authorized: self.is_authorized(&writer).await,
            }),
            Command::GetHistory { id } => Ok(CommandReply::History {
                values: self.get_history(id).await,
            }),
            Command::RecentEvents { limit } => Ok(CommandReply::Events {
                events: self.recent_events(limit).await,
            }),
        };

        reply.unwrap_or_else(|err| {
            span.in_scope(|| warn!(kind = %err.kind(), error = %err, "command failed"));
            CommandReply::Error {
                kind: err.kind(),
                message: err.to_string(),
            }
        })
    }
}
