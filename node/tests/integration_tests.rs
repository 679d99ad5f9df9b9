//! Integration tests exercising the full node:
//! submission → verification → valuation proposal → voting → confirm.
//!
//! These tests drive the registry and the valuation workflow only through
//! [`EstateNode`], the same way the daemon does, verifying the components
//! cooperate end-to-end and not just in isolation.

use std::sync::{Arc, Mutex};

use estate_node::{Command, CommandReply, EstateNode, EventEnvelope, NodeConfig};
use estate_nullables::NullClock;
use estate_registry::{NewRecord, SubmissionStatus};
use estate_types::{ErrorKind, EstateEvent, Identity, RecordId, Scores, Valuation};
use estate_valuation::ProposalOutcome;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const OWNER: &str = "0xowner";
const ADMIN: &str = "admin";

fn id(s: &str) -> Identity {
    Identity::from(s)
}

fn new_node() -> (EstateNode, Arc<NullClock>) {
    let clock = Arc::new(NullClock::new(1_700_000_000));
    let node = EstateNode::new(NodeConfig::default(), clock.clone()).expect("node");
    (node, clock)
}

fn main_street() -> NewRecord {
    NewRecord {
        address: "123 Main St".into(),
        owner_name: "Alice Owner".into(),
        property_type: "Single family".into(),
        renovation_date: "2019-05-01".into(),
        image_reference: "ipfs://main-st".into(),
        location: None,
    }
}

fn proposed_valuation() -> Valuation {
    Valuation::new(
        1_250_000,
        1_200_000,
        Scores::from_array([85, 72, 90, 65, 88]),
    )
}

/// Submit "123 Main St" and verify it with three approvals.
async fn verified_record(node: &EstateNode) -> RecordId {
    let rid = node.submit(main_street(), &id(OWNER)).await.expect("submit");
    for voter in ["v1", "v2", "v3"] {
        node.vote_on_submission(rid, true, &id(voter))
            .await
            .expect("vote");
    }
    rid
}

/// Propose [`proposed_valuation`] and approve it with three votes.
async fn verified_proposal(node: &EstateNode, rid: RecordId) {
    node.propose_valuation(rid, proposed_valuation(), &id(OWNER))
        .await
        .expect("propose");
    for voter in ["r1", "r2", "r3"] {
        node.vote_on_valuation(rid, true, &id(voter))
            .await
            .expect("vote");
    }
}

fn recorder(node_events: &Arc<Mutex<Vec<EventEnvelope>>>) -> estate_node::EventListener {
    let sink = Arc::clone(node_events);
    Box::new(move |envelope| {
        sink.lock().expect("sink lock").push(envelope.clone());
    })
}

// ---------------------------------------------------------------------------
// 1. Submission and verification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_then_three_approvals_verifies() {
    let (node, _) = new_node();

    let rid = node.submit(main_street(), &id(OWNER)).await.unwrap();
    assert_eq!(rid, RecordId::new(0));

    let record = node.get_record(rid).await.unwrap();
    assert!(!record.is_verified());
    assert_eq!((record.approve_votes(), record.reject_votes()), (0, 0));
    assert_eq!(record.current_owner, id(OWNER));
    assert_eq!(record.estimated_value(), 0);

    let mut statuses = Vec::new();
    for voter in ["v1", "v2", "v3"] {
        statuses.push(node.vote_on_submission(rid, true, &id(voter)).await.unwrap());
    }
    assert_eq!(
        statuses,
        vec![
            SubmissionStatus::Pending,
            SubmissionStatus::Pending,
            SubmissionStatus::Verified
        ]
    );
    assert!(node.get_record(rid).await.unwrap().is_verified());
}

#[tokio::test]
async fn second_submission_of_same_address_is_rejected() {
    let (node, _) = new_node();
    node.submit(main_street(), &id(OWNER)).await.unwrap();

    let err = node.submit(main_street(), &id("someone-else")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(node.records().await.len(), 1);

    let next = node
        .submit(
            NewRecord {
                address: "124 Main St".into(),
                ..main_street()
            },
            &id("someone-else"),
        )
        .await
        .unwrap();
    assert_eq!(next, RecordId::new(1));
}

#[tokio::test]
async fn submission_rejection_closes_voting() {
    let (node, _) = new_node();
    let rid = node.submit(main_street(), &id(OWNER)).await.unwrap();

    node.vote_on_submission(rid, false, &id("v1")).await.unwrap();
    let status = node.vote_on_submission(rid, false, &id("v2")).await.unwrap();
    assert_eq!(status, SubmissionStatus::Rejected);

    let err = node.vote_on_submission(rid, true, &id("v3")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);
    assert_eq!(node.get_record(rid).await.unwrap().reject_votes(), 2);
}

// ---------------------------------------------------------------------------
// 2. Valuation commit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn approved_proposal_commits_on_confirm() {
    let (node, _) = new_node();
    let rid = verified_record(&node).await;

    node.propose_valuation(rid, proposed_valuation(), &id(OWNER))
        .await
        .unwrap();
    let proposal = node.get_proposal(rid).await.expect("pending proposal");
    assert!(!proposal.is_verified);
    assert_eq!((proposal.approve_votes(), proposal.reject_votes()), (0, 0));

    let mut outcomes = Vec::new();
    for voter in ["r1", "r2", "r3"] {
        outcomes.push(node.vote_on_valuation(rid, true, &id(voter)).await.unwrap());
    }
    assert_eq!(outcomes.last(), Some(&ProposalOutcome::Verified));
    assert!(node.get_proposal(rid).await.unwrap().is_verified);

    // Voting only verifies; values move on confirm.
    assert_eq!(node.get_record(rid).await.unwrap().estimated_value(), 0);

    let committed = node.confirm_valuation_update(rid, &id(OWNER)).await.unwrap();
    assert_eq!(committed, 1_250_000);

    let record = node.get_record(rid).await.unwrap();
    assert_eq!(record.estimated_value(), 1_250_000);
    assert_eq!(record.comparable_value(), 1_200_000);
    assert_eq!(record.scores().as_array(), [85, 72, 90, 65, 88]);
    assert_eq!(node.get_history(rid).await, vec![1_250_000]);
    assert!(node.get_proposal(rid).await.is_none());
}

#[tokio::test]
async fn rejected_proposal_leaves_history_untouched() {
    let (node, _) = new_node();
    let rid = verified_record(&node).await;

    node.propose_valuation(rid, proposed_valuation(), &id(OWNER))
        .await
        .unwrap();
    node.vote_on_valuation(rid, false, &id("r1")).await.unwrap();
    let outcome = node.vote_on_valuation(rid, false, &id("r2")).await.unwrap();

    assert_eq!(outcome, ProposalOutcome::Rejected);
    assert!(node.get_proposal(rid).await.is_none());
    assert!(node.get_history(rid).await.is_empty());
    assert_eq!(node.get_record(rid).await.unwrap().estimated_value(), 0);

    // A fresh proposal starts over with an empty voter set.
    node.propose_valuation(rid, proposed_valuation(), &id(OWNER))
        .await
        .unwrap();
    let outcome = node.vote_on_valuation(rid, false, &id("r1")).await.unwrap();
    assert_eq!(outcome, ProposalOutcome::Pending);
}

#[tokio::test]
async fn unauthorized_confirm_keeps_proposal_then_retry_succeeds() {
    let (node, _) = new_node();
    let rid = verified_record(&node).await;
    verified_proposal(&node, rid).await;

    node.revoke_writer(&id(ADMIN)).await.unwrap();

    let err = node.confirm_valuation_update(rid, &id(OWNER)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integration);
    let proposal = node.get_proposal(rid).await.expect("still present");
    assert!(proposal.is_verified);
    assert!(node.get_history(rid).await.is_empty());
    assert_eq!(node.get_record(rid).await.unwrap().estimated_value(), 0);

    node.designate_writer(id("valuation-workflow"), &id(ADMIN))
        .await
        .unwrap();
    let committed = node.confirm_valuation_update(rid, &id(OWNER)).await.unwrap();
    assert_eq!(committed, 1_250_000);
    assert_eq!(node.get_history(rid).await, vec![1_250_000]);
    assert!(node.get_proposal(rid).await.is_none());
}

#[tokio::test]
async fn repeated_commits_grow_history_in_order() {
    let (node, clock) = new_node();
    let rid = verified_record(&node).await;

    verified_proposal(&node, rid).await;
    node.confirm_valuation_update(rid, &id(OWNER)).await.unwrap();

    clock.advance(86_400);
    let second = Valuation::new(1_300_000, 1_280_000, Scores::from_array([90; 5]));
    node.propose_valuation(rid, second, &id(ADMIN)).await.unwrap();
    for voter in ["r4", "r5", "r6"] {
        node.vote_on_valuation(rid, true, &id(voter)).await.unwrap();
    }
    node.confirm_valuation_update(rid, &id(OWNER)).await.unwrap();

    assert_eq!(node.get_history(rid).await, vec![1_250_000, 1_300_000]);
    let state = node.state().await;
    let latest = state.workflow.history().latest(rid).expect("latest entry");
    assert_eq!(latest.committed_at.as_secs(), 1_700_000_000 + 86_400);
}

#[tokio::test]
async fn ownership_transfer_moves_confirm_rights() {
    let (node, _) = new_node();
    let rid = verified_record(&node).await;
    verified_proposal(&node, rid).await;

    node.transfer_ownership(rid, id("0xbuyer"), &id(OWNER))
        .await
        .unwrap();

    let err = node.confirm_valuation_update(rid, &id(OWNER)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    node.confirm_valuation_update(rid, &id("0xbuyer")).await.unwrap();

    assert_eq!(node.records_owned_by(&id("0xbuyer")).await.len(), 1);
    assert!(node.records_owned_by(&id(OWNER)).await.is_empty());
}

// ---------------------------------------------------------------------------
// 3. Event stream
// ---------------------------------------------------------------------------

#[tokio::test]
async fn events_arrive_in_commit_order() {
    let (node, _) = new_node();
    let seen = Arc::new(Mutex::new(Vec::new()));
    node.subscribe(recorder(&seen)).await;

    let rid = verified_record(&node).await;
    verified_proposal(&node, rid).await;
    node.confirm_valuation_update(rid, &id(OWNER)).await.unwrap();

    let seen = seen.lock().unwrap();
    let sequences: Vec<u64> = seen.iter().map(|e| e.sequence).collect();
    let expected: Vec<u64> = (1..=seen.len() as u64).collect();
    assert_eq!(sequences, expected);

    let tail: Vec<&EstateEvent> = seen.iter().rev().take(2).map(|e| &e.event).collect();
    assert_eq!(
        tail,
        vec![
            &EstateEvent::ValuationCommitted {
                id: rid,
                estimated_value: 1_250_000
            },
            &EstateEvent::ValuationApplied {
                id: rid,
                estimated_value: 1_250_000
            },
        ]
    );
    assert!(seen
        .iter()
        .any(|e| e.event == EstateEvent::RecordVerified { id: rid }));
    assert!(seen
        .iter()
        .any(|e| e.event == EstateEvent::ValuationVerified { id: rid }));
}

// ---------------------------------------------------------------------------
// 4. Command interface and persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn json_commands_drive_the_full_flow() {
    let (node, _) = new_node();
    let lines = [
        r#"{"submit":{"caller":"0xowner","record":{"address":"123 Main St","owner_name":"Alice","property_type":"House","renovation_date":"2019","image_reference":"img"}}}"#,
        r#"{"vote_on_submission":{"caller":"v1","id":0,"approve":true}}"#,
        r#"{"propose_valuation":{"caller":"0xowner","id":0,"valuation":{"estimated_value":1250000,"comparable_value":1200000,"scores":{"location":85,"size":72,"condition":90,"age":65,"renovation":88}}}}"#,
        r#"{"vote_on_valuation":{"caller":"r1","id":0,"approve":true}}"#,
        r#"{"vote_on_valuation":{"caller":"r2","id":0,"approve":true}}"#,
        r#"{"vote_on_valuation":{"caller":"r3","id":0,"approve":true}}"#,
        r#"{"confirm_valuation_update":{"caller":"0xowner","id":0}}"#,
        r#"{"get_history":{"id":0}}"#,
        r#"{"find_by_address":{"address":"123 Main St"}}"#,
        r#"{"has_voted":{"id":0,"voter":"v1"}}"#,
        r#""pending_proposals""#,
        r#"{"is_authorized":{"writer":"valuation-workflow"}}"#,
        r#"{"transfer_administration":{"caller":"admin","new_administrator":"admin2"}}"#,
        r#"{"revoke_writer":{"caller":"admin2"}}"#,
        r#"{"is_authorized":{"writer":"valuation-workflow"}}"#,
        r#"{"find_by_address":{"address":"9 Nowhere Rd"}}"#,
    ];

    let mut replies = Vec::new();
    for line in lines {
        let command: Command = serde_json::from_str(line).expect("valid command");
        replies.push(node.execute(command).await);
    }

    assert!(replies.iter().all(|reply| !reply.is_error()), "{replies:?}");
    assert_eq!(replies[0], CommandReply::Submitted { id: RecordId::new(0) });
    assert_eq!(
        replies[5],
        CommandReply::ValuationVoted {
            outcome: ProposalOutcome::Verified
        }
    );
    assert_eq!(
        replies[6],
        CommandReply::Committed {
            estimated_value: 1_250_000
        }
    );
    assert_eq!(
        replies[7],
        CommandReply::History {
            values: vec![1_250_000]
        }
    );
    match &replies[8] {
        CommandReply::Lookup {
            record: Some(record),
        } => {
            assert_eq!(record.id, RecordId::new(0));
            assert_eq!(record.estimated_value(), 1_250_000);
        }
        other => panic!("expected a found record, got {other:?}"),
    }
    assert_eq!(replies[9], CommandReply::Voted { voted: true });
    assert_eq!(replies[10], CommandReply::Proposals { proposals: vec![] });
    assert_eq!(replies[11], CommandReply::Authorized { authorized: true });
    assert_eq!(replies[12], CommandReply::Done);
    assert_eq!(replies[13], CommandReply::Done);
    assert_eq!(replies[14], CommandReply::Authorized { authorized: false });
    assert_eq!(replies[15], CommandReply::Lookup { record: None });
}

#[tokio::test]
async fn state_survives_snapshot_and_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = NodeConfig {
        data_dir: dir.path().join("data"),
        ..NodeConfig::default()
    };
    let clock = Arc::new(NullClock::new(10));

    let node = EstateNode::open(config.clone(), clock.clone()).unwrap();
    let rid = verified_record(&node).await;
    verified_proposal(&node, rid).await;
    node.save_snapshot().await.unwrap();
    drop(node);

    let node = EstateNode::open(config, clock).unwrap();
    let proposal = node.get_proposal(rid).await.expect("proposal restored");
    assert!(proposal.is_verified);
    node.confirm_valuation_update(rid, &id(OWNER)).await.unwrap();
    assert_eq!(node.get_history(rid).await, vec![1_250_000]);
}
