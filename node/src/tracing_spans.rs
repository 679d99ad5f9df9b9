//! Pre-built [`tracing::Span`] constructors for node operations.
//!
//! Consistent span names and fields make it easy to correlate the log lines
//! the registry and workflow emit with the operation that caused them.

use tracing::{info_span, Span};

/// Span covering one serialized mutating operation.
pub fn mutation_span(op: &'static str) -> Span {
    info_span!("mutation", op)
}

/// Span covering one command handled by [`crate::EstateNode::execute`].
pub fn command_span(op: &'static str) -> Span {
    info_span!("command", op)
}
