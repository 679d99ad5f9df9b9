//! Operations by value, for queue- or stream-driven callers.
//!
//! The daemon reads one JSON [`Command`] per line and writes one JSON
//! [`CommandReply`] back. Every core operation and query has a variant;
//! both enums use serde's external tagging, e.g.
//! `{"confirm_valuation_update":{"caller":"0xowner","id":0}}`.

use estate_registry::{NewRecord, PropertyRecord, SubmissionStatus};
use estate_types::{ErrorKind, Identity, RecordId, Valuation};
use estate_valuation::{ProposalOutcome, ValuationProposal};
use serde::{Deserialize, Serialize};

use crate::event_bus::EventEnvelope;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Submit {
        caller: Identity,
        record: NewRecord,
    },
    VoteOnSubmission {
        caller: Identity,
        id: RecordId,
        approve: bool,
    },
    TransferOwnership {
        caller: Identity,
        id: RecordId,
        new_owner: Identity,
    },
    DesignateWriter {
        caller: Identity,
        writer: Identity,
    },
    RevokeWriter {
        caller: Identity,
    },
    TransferAdministration {
        caller: Identity,
        new_administrator: Identity,
    },
    ProposeValuation {
        caller: Identity,
        id: RecordId,
        valuation: Valuation,
    },
    VoteOnValuation {
        caller: Identity,
        id: RecordId,
        approve: bool,
    },
    ConfirmValuationUpdate {
        caller: Identity,
        id: RecordId,
    },
    GetRecord {
        id: RecordId,
    },
    ListRecords,
    RecordsOwnedBy {
        owner: Identity,
    },
    FindByAddress {
        address: String,
    },
    HasVoted {
        id: RecordId,
        voter: Identity,
    },
    GetProposal {
        id: RecordId,
    },
    PendingProposals,
    IsAuthorized {
        writer: Identity,
    },
    GetHistory {
        id: RecordId,
    },
    RecentEvents {
        #[serde(default = "default_event_limit")]
        limit: usize,
    },
}

fn default_event_limit() -> usize {
    50
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::VoteOnSubmission { .. } => "vote_on_submission",
            Self::TransferOwnership { .. } => "transfer_ownership",
            Self::DesignateWriter { .. } => "designate_writer",
            Self::RevokeWriter { .. } => "revoke_writer",
            Self::TransferAdministration { .. } => "transfer_administration",
            Self::ProposeValuation { .. } => "propose_valuation",
            Self::VoteOnValuation { .. } => "vote_on_valuation",
            Self::ConfirmValuationUpdate { .. } => "confirm_valuation_update",
            Self::GetRecord { .. } => "get_record",
            Self::ListRecords => "list_records",
            Self::RecordsOwnedBy { .. } => "records_owned_by",
            Self::FindByAddress { .. } => "find_by_address",
            Self::HasVoted { .. } => "has_voted",
            Self::GetProposal { .. } => "get_proposal",
            Self::PendingProposals => "pending_proposals",
            Self::IsAuthorized { .. } => "is_authorized",
            Self::GetHistory { .. } => "get_history",
            Self::RecentEvents { .. } => "recent_events",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandReply {
    Submitted { id: RecordId },
    SubmissionVoted { status: SubmissionStatus },
    ValuationVoted { outcome: ProposalOutcome },
    Committed { estimated_value: u128 },
    Done,
    Record { record: Box<PropertyRecord> },
    Records { records: Vec<PropertyRecord> },
    /// Result of an address lookup; `None` when no record has that address.
    Lookup { record: Option<Box<PropertyRecord>> },
    Voted { voted: bool },
    Proposal { proposal: Option<ValuationProposal> },
    Proposals { proposals: Vec<ValuationProposal> },
    Authorized { authorized: bool },
    History { values: Vec<u128> },
    Events { events: Vec<EventEnvelope> },
    Error { kind: ErrorKind, message: String },
}

impl CommandReply {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_snake_case_ops() {
        let cmd: Command = serde_json::from_str(
            r#"{"vote_on_valuation":{"caller":"0xbob","id":0,"approve":true}}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::VoteOnValuation {
                caller: Identity::from("0xbob"),
                id: RecordId::new(0),
                approve: true
            }
        );
        assert_eq!(cmd.name(), "vote_on_valuation");
    }

    #[test]
    fn decodes_submit_with_nested_record() {
        let cmd: Command = serde_json::from_str(
            r#"{"submit":{"caller":"0xalice","record":{
                "address":"123 Main St","owner_name":"Alice","property_type":"House",
                "renovation_date":"2020-02-02","image_reference":"ipfs://x",
                "location":{"latitude":1.5,"longitude":-2.25}}}}"#,
        )
        .unwrap();
        match cmd {
            Command::Submit { caller, record } => {
                assert_eq!(caller, Identity::from("0xalice"));
                assert_eq!(record.address, "123 Main St");
                assert_eq!(record.location.map(|p| p.longitude), Some(-2.25));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn recent_events_limit_defaults() {
        let cmd: Command = serde_json::from_str(r#"{"recent_events":{}}"#).unwrap();
        assert_eq!(cmd, Command::RecentEvents { limit: 50 });
        let cmd: Command = serde_json::from_str(r#""list_records""#).unwrap();
        assert_eq!(cmd, Command::ListRecords);
    }

    #[test]
    fn decodes_administration_and_lookup_ops() {
        let cmd: Command = serde_json::from_str(
            r#"{"transfer_administration":{"caller":"admin","new_administrator":"admin2"}}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::TransferAdministration {
                caller: Identity::from("admin"),
                new_administrator: Identity::from("admin2"),
            }
        );
        assert_eq!(cmd.name(), "transfer_administration");

        let cmd: Command =
            serde_json::from_str(r#"{"has_voted":{"id":3,"voter":"0xv"}}"#).unwrap();
        assert_eq!(cmd.name(), "has_voted");
        let cmd: Command = serde_json::from_str(r#""pending_proposals""#).unwrap();
        assert_eq!(cmd, Command::PendingProposals);
    }

    #[test]
    fn error_reply_encodes_kind() {
        let reply = CommandReply::Error {
            kind: ErrorKind::Integration,
            message: "nope".into(),
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(json, r#"{"error":{"kind":"integration","message":"nope"}}"#);
        assert!(reply.is_error());
    }
}
