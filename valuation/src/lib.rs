//! Valuation workflow.
//!
//! Two steps separate a proposed valuation from the registry:
//! 1. **Voting**: independent identities approve or reject the proposal.
//!    Approval verifies it; rejection deletes it.
//! 2. **Confirmation**: the record owner confirms a verified proposal, which
//!    commits the values into the registry, appends to the value history and
//!    clears the proposal, all or nothing.
//!
//! The workflow holds record ids only and re-validates them against the
//! [`estate_registry::PropertyRegistry`] it is handed on every call.

pub mod error;
pub mod history;
pub mod proposal;
pub mod workflow;

pub use error::ValuationError;
pub use history::{HistoricalValueLog, HistoryEntry};
pub use proposal::{ProposalOutcome, ValuationProposal};
pub use workflow::ValuationWorkflow;
