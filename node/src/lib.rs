//! Estate node: the service layer around the property registry and the
//! valuation workflow.
//!
//! The node is the single coordinator that:
//! - Serializes every mutating operation behind one lock
//! - Publishes registry and workflow notifications in commit order
//! - Tracks Prometheus metrics derived from those notifications
//! - Persists and restores state through bincode snapshots
//! - Dispatches JSON [`Command`]s for the daemon front end

pub mod command;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod shutdown;
pub mod snapshot;
pub mod state;
pub mod tracing_spans;

pub use command::{Command, CommandReply};
pub use config::NodeConfig;
pub use error::NodeError;
pub use event_bus::{EventBus, EventEnvelope, EventListener};
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use node::EstateNode;
pub use shutdown::ShutdownController;
pub use snapshot::{load_snapshot, save_snapshot};
pub use state::EstateState;
