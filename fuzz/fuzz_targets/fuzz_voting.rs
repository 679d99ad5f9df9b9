#![no_main]

use arbitrary::Arbitrary;
use estate_registry::{NewRecord, PropertyRegistry};
use estate_types::{Identity, RecordId, Scores, Timestamp, Valuation, WorkflowParams};
use estate_valuation::ValuationWorkflow;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Submit { address: u8, caller: u8 },
    VoteOnSubmission { id: u8, approve: bool, caller: u8 },
    Propose { id: u8, value: u64, scores: [u8; 5], caller: u8 },
    VoteOnValuation { id: u8, approve: bool, caller: u8 },
    Confirm { id: u8, caller: u8 },
    Transfer { id: u8, to: u8, caller: u8 },
    ToggleWriter,
}

fn who(n: u8) -> Identity {
    Identity::new(format!("0x{:02x}", n % 8))
}

// Arbitrary operation sequences must keep the registry and the history in
// step: a record's estimated value is always the last committed value.
fuzz_target!(|ops: Vec<Op>| {
    let admin = Identity::from("admin");
    let writer = Identity::from("workflow");
    let params = WorkflowParams::default();
    let mut registry = PropertyRegistry::new(admin.clone(), params.clone());
    let mut workflow = ValuationWorkflow::new(writer.clone(), params);
    let _ = registry.designate_writer(writer.clone(), &admin);

    for (step, op) in ops.into_iter().enumerate() {
        let now = Timestamp::new(step as u64);
        match op {
            Op::Submit { address, caller } => {
                let fields = NewRecord {
                    address: format!("{} Fuzz St", address % 16),
                    owner_name: "fuzz".into(),
                    property_type: "lot".into(),
                    renovation_date: "-".into(),
                    image_reference: "-".into(),
                    location: None,
                };
                let _ = registry.submit(fields, &who(caller), now);
            }
            Op::VoteOnSubmission { id, approve, caller } => {
                let _ = registry.vote_on_submission(RecordId::new(u64::from(id % 16)), approve, &who(caller));
            }
            Op::Propose { id, value, scores, caller } => {
                let scores = Scores::from_array(scores.map(u32::from));
                let valuation = Valuation::new(u128::from(value), u128::from(value), scores);
                let _ = workflow.propose_valuation(&registry, RecordId::new(u64::from(id % 16)), valuation, &who(caller), now);
            }
            Op::VoteOnValuation { id, approve, caller } => {
                let _ = workflow.vote_on_valuation(&registry, RecordId::new(u64::from(id % 16)), approve, &who(caller));
            }
            Op::Confirm { id, caller } => {
                let _ = workflow.confirm_valuation_update(&mut registry, RecordId::new(u64::from(id % 16)), &who(caller), now);
            }
            Op::Transfer { id, to, caller } => {
                let _ = registry.transfer_ownership(RecordId::new(u64::from(id % 16)), who(to), &who(caller));
            }
            Op::ToggleWriter => {
                if registry.authorization().writer().is_some() {
                    let _ = registry.revoke_writer(&admin);
                } else {
                    let _ = registry.designate_writer(writer.clone(), &admin);
                }
            }
        }
    }

    for record in registry.records() {
        let latest = workflow.history().latest(record.id).map(|e| e.estimated_value);
        assert_eq!(latest.unwrap_or(0), record.estimated_value());
        assert!(record.approve_votes() as usize + record.reject_votes() as usize == record.tally.voter_count());
    }
});
