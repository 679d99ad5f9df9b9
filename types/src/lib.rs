//! Fundamental types for the estate registry.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! caller identities, record ids, valuation scores, vote tallies, workflow
//! thresholds, notifications, and the error taxonomy.

pub mod error;
pub mod event;
pub mod geo;
pub mod identity;
pub mod params;
pub mod record_id;
pub mod scores;
pub mod tally;
pub mod time;
pub mod valuation;

pub use error::ErrorKind;
pub use event::EstateEvent;
pub use geo::GeoPoint;
pub use identity::Identity;
pub use params::WorkflowParams;
pub use record_id::RecordId;
pub use scores::{ScoreError, Scores, MAX_SCORE};
pub use tally::{VoteChoice, VoteTally};
pub use time::{Clock, SystemClock, Timestamp};
pub use valuation::Valuation;
